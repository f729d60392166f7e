// Compound synthesis: diphthongs, clusters and affricate folding
//
// Rules are tried in order; the first that accepts a pair wins.
//
// 1. vowel + vowel: diphthong.
// 2. nasal + consonant at the same place, or + stop/implosive/affricate/
//    fricative: cluster.
// 3. stop/implosive + fricative at the same place with the same phonation:
//    one affricate, if the registry can spell it. Otherwise fall through.
// 4. stop/implosive/click/nasal + stop/implosive/affricate/fricative: cluster.
// 5. anything else is rejected.

use clts_core::{Compound, CompoundKind, Feature, SegmentKind, Segment, Sound};

use crate::system::TranscriptionSystem;

const NASAL: &str = "nasal";
const FRICATIVE: &str = "fricative";
const AFFRICATE: &str = "affricate";

const CLUSTER_ONSETS: &[&str] = &["stop", "implosive", "click", "nasal"];
const CLUSTER_CODAS: &[&str] = &["stop", "implosive", "affricate", "fricative"];
const AFFRICATE_ONSETS: &[&str] = &["stop", "implosive"];

/// How a pair of adjacent sounds is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRule {
    Diphthong,
    /// Prenasalized cluster.
    NasalCluster,
    /// Stop and fricative folded into one affricate.
    Affricate,
    Cluster,
}

fn manner(segment: &Segment) -> &str {
    segment.get(Feature::Manner).unwrap_or_default()
}

fn is_one_of(value: &str, set: &[&str]) -> bool {
    set.contains(&value)
}

/// Candidate rules for a pair, in precedence order. Empty if the pair can
/// never combine.
pub fn classify(first: &Sound, second: &Sound) -> Vec<PairRule> {
    match (first, second) {
        (Sound::Vowel(_), Sound::Vowel(_)) => vec![PairRule::Diphthong],
        (Sound::Consonant(a), Sound::Consonant(b)) => {
            let (m1, m2) = (manner(a), manner(b));
            let same_place = a.get(Feature::Place) == b.get(Feature::Place);
            if m1 == NASAL && (same_place || is_one_of(m2, CLUSTER_CODAS)) {
                return vec![PairRule::NasalCluster];
            }
            let mut rules = Vec::new();
            if is_one_of(m1, AFFRICATE_ONSETS)
                && m2 == FRICATIVE
                && same_place
                && a.get(Feature::Phonation) == b.get(Feature::Phonation)
            {
                rules.push(PairRule::Affricate);
            }
            if is_one_of(m1, CLUSTER_ONSETS) && is_one_of(m2, CLUSTER_CODAS) {
                rules.push(PairRule::Cluster);
            }
            rules
        }
        _ => Vec::new(),
    }
}

impl TranscriptionSystem {
    /// Combine two adjacent resolved sounds into one, or `None` if no rule
    /// accepts the pair. `source` is the text the pair was parsed from.
    pub fn combine(&self, first: Sound, second: Sound, source: &str) -> Option<Sound> {
        for rule in classify(&first, &second) {
            let combined = match rule {
                PairRule::Affricate => self.fold_affricate(&first, &second, source),
                PairRule::Diphthong => Some(compound(CompoundKind::Diphthong, &first, &second, source)),
                PairRule::NasalCluster | PairRule::Cluster => {
                    Some(compound(CompoundKind::Cluster, &first, &second, source))
                }
            };
            if combined.is_some() {
                return combined;
            }
        }
        None
    }

    /// Fold a stop and a fricative into one affricate consonant named after
    /// the stop, with the fricative's airstream.
    fn fold_affricate(&self, stop: &Sound, fricative: &Sound, source: &str) -> Option<Sound> {
        let (_, stop) = stop.segment()?;
        let (_, fricative) = fricative.segment()?;

        let mut affricate = Segment::default();
        for feature in stop.slots() {
            if let Some(value) = stop.get(feature) {
                affricate.set(feature, value);
            }
        }
        affricate.set(Feature::Manner, AFFRICATE);
        match fricative.get(Feature::Airstream) {
            Some(airstream) => affricate.set(Feature::Airstream, airstream),
            None => {
                affricate.remove(Feature::Airstream);
            }
        }

        let name = affricate.name(SegmentKind::Consonant);
        let mut sound = self.from_name(&name).ok()?;
        if sound.is_generated() && self.base_for(SegmentKind::Consonant, sound.segment()?.1).is_none() {
            return None;
        }

        let canonical = self.canonical(&sound);
        let (_, segment) = sound.segment_mut()?;
        segment.source = Some(source.to_string());
        segment.stress = stop.stress.clone().or_else(|| fricative.stress.clone());
        let literal = format!("{}{}", stop.grapheme, fricative.grapheme);
        if literal != canonical {
            segment.grapheme = literal;
            segment.generated = true;
            segment.alias = true;
        }
        Some(sound)
    }
}

fn compound(kind: CompoundKind, first: &Sound, second: &Sound, source: &str) -> Sound {
    let segment = |sound: &Sound| sound.segment().map(|(_, s)| s.clone()).unwrap_or_default();
    let compound = Compound::from_segments(Some(source.to_string()), segment(first), segment(second));
    Sound::from_compound(kind, compound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bipa;

    #[test]
    fn classify_pairs() {
        let ts = bipa::bipa().unwrap();
        let s = |g: &str| ts.resolve(g);
        assert_eq!(classify(&s("a"), &s("o")), vec![PairRule::Diphthong]);
        assert_eq!(classify(&s("n"), &s("d")), vec![PairRule::NasalCluster]);
        assert_eq!(classify(&s("m"), &s("b")), vec![PairRule::NasalCluster]);
        assert_eq!(classify(&s("t"), &s("k")), vec![PairRule::Cluster]);
        assert_eq!(classify(&s("\u{01C3}"), &s("x")), vec![PairRule::Cluster]);
        assert_eq!(
            classify(&s("p"), &s("\u{0278}")),
            vec![PairRule::Affricate, PairRule::Cluster]
        );
        assert!(classify(&s("l"), &s("k")).is_empty());
        assert!(classify(&s("t"), &s("a")).is_empty());
        assert!(classify(&s("_"), &s("_")).is_empty());
    }

    #[test]
    fn diphthong_and_cluster() {
        let ts = bipa::bipa().unwrap();
        let ao = ts.resolve("ao");
        assert_eq!(ao.sound_type(), clts_core::SoundType::Diphthong);
        assert_eq!(ao.grapheme(), "ao");
        let tk = ts.resolve("tk");
        assert_eq!(tk.sound_type(), clts_core::SoundType::Cluster);
        assert_eq!(
            tk.name().as_deref(),
            Some("from voiceless alveolar stop to voiceless velar stop cluster")
        );
    }

    #[test]
    fn stop_fricative_folds_when_spellable() {
        let ts = bipa::bipa().unwrap();
        // t + s: voiceless alveolar, spelled ts
        let first = ts.resolve("t\u{02B0}");
        let second = ts.resolve("s");
        let folded = ts.combine(first, second, "t\u{02B0}s").unwrap();
        assert_eq!(folded.sound_type(), clts_core::SoundType::Consonant);
        assert_eq!(folded.feature(Feature::Manner), Some("affricate"));
        assert_eq!(folded.feature(Feature::Airstream), Some("sibilant"));
        assert_eq!(folded.feature(Feature::Aspiration), Some("aspirated"));
        assert!(folded.is_alias());
        assert_eq!(ts.canonical(&folded), "ts\u{02B0}");
    }

    #[test]
    fn unspellable_affricate_stays_cluster() {
        let ts = bipa::bipa().unwrap();
        let s = ts.resolve("p\u{0278}");
        assert_eq!(s.sound_type(), clts_core::SoundType::Cluster);
    }

    #[test]
    fn rejected_pair() {
        let ts = bipa::bipa().unwrap();
        assert!(ts.combine(ts.resolve("l"), ts.resolve("k"), "lk").is_none());
        assert!(ts.resolve("lk").is_unknown());
        assert!(ts.resolve("ta").is_unknown());
    }

    #[test]
    fn compound_stress_comes_from_constituents() {
        let ts = bipa::bipa().unwrap();
        let s = ts.resolve("\u{02C8}ai");
        assert_eq!(s.sound_type(), clts_core::SoundType::Diphthong);
        assert_eq!(s.stress(), Some("primary-stress"));
    }
}
