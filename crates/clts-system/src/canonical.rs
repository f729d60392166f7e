// Canonicalizer: canonical spelling of a sound, and sounds from their names
//
// A generated sound is spelled around a registered sound whose feature bundle
// it contains (its base): the one left over after stripping the leading
// name-order values. Features the base already encodes are not written again;
// the rest become diacritics in the type's fixed write order. Stress, which
// is outside the feature bundle, is written first.

use clts_core::character::{self, UNKNOWN_BASE, UNRESOLVED};
use clts_core::feature::EXCLUDED_FROM_BASE;
use clts_core::{Compound, CompoundKind, Feature, FeatureSet, SegmentKind, Segment, Sound, SoundType};

use crate::NameError;
use crate::system::TranscriptionSystem;

const COMPLEX_PREFIX: &str = "from ";
const COMPLEX_SEPARATOR: &str = " to ";

impl TranscriptionSystem {
    /// Canonical spelling of a sound in this system.
    pub fn canonical(&self, sound: &Sound) -> String {
        match sound {
            Sound::Consonant(_) | Sound::Vowel(_) | Sound::Tone(_) => match sound.segment() {
                Some((kind, segment)) => self.canonical_segment(kind, segment),
                None => sound.grapheme().to_string(),
            },
            Sound::Diphthong(c) => self.canonical_compound(CompoundKind::Diphthong, c),
            Sound::Cluster(c) => self.canonical_compound(CompoundKind::Cluster, c),
            Sound::Marker(m) => {
                if m.alias {
                    if let Some(canonical) = self.canonical_sound(&m.featureset()) {
                        return canonical.grapheme().to_string();
                    }
                }
                m.grapheme.clone()
            }
            Sound::Unknown(u) => u.grapheme.clone(),
        }
    }

    fn canonical_compound(&self, kind: CompoundKind, compound: &Compound) -> String {
        let constituent = kind.constituent();
        let mut out = self.canonical_segment(constituent, &compound.from);
        out.push_str(&self.canonical_segment(constituent, &compound.to));
        out
    }

    fn canonical_segment(&self, kind: SegmentKind, segment: &Segment) -> String {
        if !segment.generated {
            if segment.alias {
                if let Some(canonical) = self.canonical_sound(&segment.featureset(kind)) {
                    return canonical.grapheme().to_string();
                }
            }
            return segment.grapheme.clone();
        }

        let base = self.base_for(kind, segment);
        let base_grapheme = match base {
            Some(base) => base.grapheme(),
            None => segment.base.as_deref().unwrap_or(UNKNOWN_BASE),
        };
        let encoded = |feature: Feature| {
            base.and_then(Sound::segment)
                .is_some_and(|(_, b)| b.get(feature).is_some())
        };

        let mut out = String::new();
        if let Some(stress) = &segment.stress {
            out.push_str(&self.render(kind, stress));
        }
        for &feature in kind.write_pre() {
            if let Some(value) = segment.get(feature).filter(|_| !encoded(feature)) {
                out.push_str(&self.render(kind, value));
            }
        }
        out.push_str(base_grapheme);
        for &feature in kind.write_post() {
            if let Some(value) = segment.get(feature).filter(|_| !encoded(feature)) {
                out.push_str(&self.render(kind, value));
            }
        }
        out
    }

    fn render(&self, kind: SegmentKind, value: &str) -> String {
        match self.diacritics.render(kind, value) {
            Some(fragment) => character::strip_placeholder(fragment),
            None => UNRESOLVED.to_string(),
        }
    }

    /// Base of a generated segment. Leading name-order values are dropped one
    /// at a time and the last registered bundle met on the way wins, so the
    /// base is the registered sound built from the trailing identity slots.
    /// Values in [`EXCLUDED_FROM_BASE`] never take part.
    pub(crate) fn base_for(&self, kind: SegmentKind, segment: &Segment) -> Option<&Sound> {
        let elements: Vec<&str> = segment
            .values(kind)
            .into_iter()
            .filter(|v| !EXCLUDED_FROM_BASE.contains(v))
            .chain([kind.as_str()])
            .collect();
        (0..elements.len())
            .filter_map(|start| self.canonical_sound(&FeatureSet::from_tokens(elements[start..].iter().copied())))
            .last()
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// Build a sound from its canonical name.
    ///
    /// Registered feature bundles return the registered sound. Other simple
    /// sounds are generated and spelled canonically. Compound names have the
    /// form `from <a> to <b> diphthong|cluster`.
    pub fn from_name(&self, name: &str) -> Result<Sound, NameError> {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        let Some((&class, values)) = tokens.split_last() else {
            return Err(NameError::Empty);
        };
        let sound_type = SoundType::from_tag(class)
            .filter(|t| *t != SoundType::Unknown)
            .ok_or_else(|| NameError::UnknownClass {
                name: name.to_string(),
            })?;

        if let Some(sound) = self.canonical_sound(&FeatureSet::from_tokens(tokens.iter().copied())) {
            return Ok(sound.clone());
        }

        if let Some(kind) = sound_type.compound_kind() {
            return self.compound_from_name(name, kind, values);
        }
        let Some(kind) = sound_type.segment_kind() else {
            return Err(NameError::UnknownMarker {
                name: name.to_string(),
            });
        };

        let mut segment = Segment::default();
        for &token in values {
            let feature = self
                .taxonomy
                .slot_of(kind, token)
                .ok_or_else(|| NameError::UnknownFeature {
                    name: name.to_string(),
                    token: token.to_string(),
                })?;
            let occupied = if feature == Feature::Stress {
                segment.stress.replace(token.to_string()).is_some()
            } else {
                segment.get(feature).is_some()
            };
            if occupied {
                return Err(NameError::ConflictingFeatures {
                    name: name.to_string(),
                    feature,
                });
            }
            if feature != Feature::Stress {
                segment.set(feature, token);
            }
        }

        if segment.stress.is_none() {
            if let Some(sound) = self.canonical_sound(&segment.featureset(kind)) {
                return Ok(sound.clone());
            }
        }

        segment.generated = true;
        segment.base = self.base_for(kind, &segment).map(|b| b.grapheme().to_string());
        segment.grapheme = self.canonical_segment(kind, &segment);
        Ok(Sound::from_segment(kind, segment))
    }

    fn compound_from_name(&self, name: &str, kind: CompoundKind, values: &[&str]) -> Result<Sound, NameError> {
        let malformed = || NameError::MalformedComplex {
            name: name.to_string(),
            class: kind.as_str(),
        };
        let body = values.join(" ");
        let (from, to) = body
            .strip_prefix(COMPLEX_PREFIX)
            .and_then(|rest| rest.split_once(COMPLEX_SEPARATOR))
            .ok_or_else(malformed)?;

        let constituent = kind.constituent();
        let part = |description: &str| -> Result<Segment, NameError> {
            let sound = self
                .from_name(&format!("{description} {}", constituent.as_str()))
                .map_err(|_| NameError::ComponentsNotFound {
                    name: name.to_string(),
                })?;
            let canonical = self.canonical(&sound);
            let (_, mut segment) = sound.into_segment().ok_or_else(|| NameError::ComponentsNotFound {
                name: name.to_string(),
            })?;
            segment.grapheme = canonical;
            Ok(segment)
        };
        let compound = Compound::from_segments(None, part(from)?, part(to)?);
        Ok(Sound::from_compound(kind, compound))
    }
}
