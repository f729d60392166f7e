// Sound model: the tagged union of parsed and canonical sounds
//
// Simple sounds (consonants, vowels, tones) carry an ordered set of feature
// slots. Compound sounds own their two constituents. Markers and unknown
// sounds carry only a grapheme.

use std::collections::{BTreeMap, BTreeSet};

use crate::character;
use crate::enums::{CompoundKind, SegmentKind, SoundType};
use crate::feature::Feature;

// ---------------------------------------------------------------------------
// FeatureSet
// ---------------------------------------------------------------------------

/// Unordered feature bundle of a sound: its non-empty feature values plus
/// its type tag. This is the identity key of a sound, independent of
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FeatureSet(BTreeSet<String>);

impl FeatureSet {
    /// Build a feature set from value tokens (type tag included by the caller).
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tokens in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Jaccard index `|a ∩ b| / |a ∪ b|`. Two empty sets are identical.
    pub fn jaccard(&self, other: &FeatureSet) -> f64 {
        let union = self.0.union(&other.0).count();
        if union == 0 {
            return 1.0;
        }
        let intersection = self.0.intersection(&other.0).count();
        intersection as f64 / union as f64
    }
}

// ---------------------------------------------------------------------------
// Segment (simple sound payload)
// ---------------------------------------------------------------------------

/// Payload of a consonant, vowel or tone.
///
/// The slot values are stored by slot; order is imposed by the kind's name
/// order whenever the segment is serialized.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    /// Surface spelling. For generated sounds this is the literal input
    /// spelling, which may differ from the canonical one.
    pub grapheme: String,
    features: BTreeMap<Feature, String>,
    /// The grapheme is a non-canonical spelling of a registered bundle.
    pub alias: bool,
    /// Synthesized by the parser or canonicalizer rather than loaded.
    pub generated: bool,
    /// The input required character-level normalization.
    pub normalized: bool,
    pub stress: Option<String>,
    /// Input before normalization.
    pub source: Option<String>,
    /// Root grapheme a generated sound was built on.
    pub base: Option<String>,
    pub note: Option<String>,
}

impl Segment {
    pub fn new(grapheme: impl Into<String>) -> Self {
        Self {
            grapheme: grapheme.into(),
            ..Self::default()
        }
    }

    /// Value of a slot.
    pub fn get(&self, feature: Feature) -> Option<&str> {
        self.features.get(&feature).map(String::as_str)
    }

    /// Set a slot, replacing any previous value.
    pub fn set(&mut self, feature: Feature, value: impl Into<String>) {
        self.features.insert(feature, value.into());
    }

    /// Clear a slot.
    pub fn remove(&mut self, feature: Feature) -> Option<String> {
        self.features.remove(&feature)
    }

    /// Slots that carry a value.
    pub fn slots(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.keys().copied()
    }

    /// Present `(slot, value)` pairs in the kind's name order.
    pub fn features(&self, kind: SegmentKind) -> Vec<(Feature, &str)> {
        kind.name_order()
            .iter()
            .filter_map(|&f| self.get(f).map(|v| (f, v)))
            .collect()
    }

    /// Present values in the kind's name order.
    pub fn values(&self, kind: SegmentKind) -> Vec<&str> {
        self.features(kind).into_iter().map(|(_, v)| v).collect()
    }

    /// Name without the trailing type tag (`"voiceless alveolar stop"`).
    pub fn description(&self, kind: SegmentKind) -> String {
        self.values(kind).join(" ")
    }

    pub fn name(&self, kind: SegmentKind) -> String {
        let mut tokens = self.values(kind);
        tokens.push(kind.as_str());
        tokens.join(" ")
    }

    pub fn featureset(&self, kind: SegmentKind) -> FeatureSet {
        FeatureSet::from_tokens(self.values(kind).into_iter().chain([kind.as_str()]))
    }
}

// ---------------------------------------------------------------------------
// Compound, Marker, Unknown payloads
// ---------------------------------------------------------------------------

/// Payload of a diphthong or cluster: two owned constituents of the same
/// simple kind. Always synthesized, never loaded.
#[derive(Debug, Clone)]
pub struct Compound {
    pub grapheme: String,
    pub source: Option<String>,
    pub from: Box<Segment>,
    pub to: Box<Segment>,
    pub stress: Option<String>,
}

impl Compound {
    /// Combine two constituents. The grapheme is the concatenation of
    /// theirs and stress is inherited from the first stressed one.
    pub fn from_segments(source: Option<String>, from: Segment, to: Segment) -> Self {
        let grapheme = format!("{}{}", from.grapheme, to.grapheme);
        let stress = from.stress.clone().or_else(|| to.stress.clone());
        Self {
            grapheme,
            source,
            from: Box::new(from),
            to: Box::new(to),
            stress,
        }
    }

    pub fn name(&self, kind: CompoundKind) -> String {
        let constituent = kind.constituent();
        format!(
            "from {} to {} {}",
            self.from.description(constituent),
            self.to.description(constituent),
            kind.as_str()
        )
    }

    /// `from_<value>` and `to_<value>` tokens plus the compound tag.
    pub fn featureset(&self, kind: CompoundKind) -> FeatureSet {
        let constituent = kind.constituent();
        let from = self.from.values(constituent).into_iter().map(|v| format!("from_{v}"));
        let to = self.to.values(constituent).into_iter().map(|v| format!("to_{v}"));
        FeatureSet::from_tokens(from.chain(to).chain([kind.as_str().to_string()]))
    }
}

/// Payload of a boundary marker.
#[derive(Debug, Clone, Default)]
pub struct Marker {
    pub grapheme: String,
    pub alias: bool,
    pub source: Option<String>,
    pub note: Option<String>,
}

impl Marker {
    pub fn new(grapheme: impl Into<String>) -> Self {
        Self {
            grapheme: grapheme.into(),
            ..Self::default()
        }
    }

    pub fn featureset(&self) -> FeatureSet {
        FeatureSet::from_tokens([self.grapheme.as_str(), SoundType::Marker.as_str()])
    }
}

/// Payload of a failed parse.
#[derive(Debug, Clone, Default)]
pub struct UnknownSound {
    /// Normalized form of the input.
    pub grapheme: String,
    pub source: Option<String>,
}

// ---------------------------------------------------------------------------
// Sound
// ---------------------------------------------------------------------------

/// A parsed or canonical sound.
#[derive(Debug, Clone)]
pub enum Sound {
    Consonant(Segment),
    Vowel(Segment),
    Tone(Segment),
    Marker(Marker),
    Diphthong(Compound),
    Cluster(Compound),
    Unknown(UnknownSound),
}

impl Sound {
    pub fn from_segment(kind: SegmentKind, segment: Segment) -> Self {
        match kind {
            SegmentKind::Consonant => Sound::Consonant(segment),
            SegmentKind::Vowel => Sound::Vowel(segment),
            SegmentKind::Tone => Sound::Tone(segment),
        }
    }

    pub fn from_compound(kind: CompoundKind, compound: Compound) -> Self {
        match kind {
            CompoundKind::Diphthong => Sound::Diphthong(compound),
            CompoundKind::Cluster => Sound::Cluster(compound),
        }
    }

    /// An unknown sound for the given normalized grapheme.
    pub fn unknown(grapheme: impl Into<String>, source: impl Into<String>) -> Self {
        Sound::Unknown(UnknownSound {
            grapheme: grapheme.into(),
            source: Some(source.into()),
        })
    }

    pub fn sound_type(&self) -> SoundType {
        match self {
            Sound::Consonant(_) => SoundType::Consonant,
            Sound::Vowel(_) => SoundType::Vowel,
            Sound::Tone(_) => SoundType::Tone,
            Sound::Marker(_) => SoundType::Marker,
            Sound::Diphthong(_) => SoundType::Diphthong,
            Sound::Cluster(_) => SoundType::Cluster,
            Sound::Unknown(_) => SoundType::Unknown,
        }
    }

    /// The simple payload and its kind.
    pub fn segment(&self) -> Option<(SegmentKind, &Segment)> {
        match self {
            Sound::Consonant(s) => Some((SegmentKind::Consonant, s)),
            Sound::Vowel(s) => Some((SegmentKind::Vowel, s)),
            Sound::Tone(s) => Some((SegmentKind::Tone, s)),
            _ => None,
        }
    }

    pub fn segment_mut(&mut self) -> Option<(SegmentKind, &mut Segment)> {
        match self {
            Sound::Consonant(s) => Some((SegmentKind::Consonant, s)),
            Sound::Vowel(s) => Some((SegmentKind::Vowel, s)),
            Sound::Tone(s) => Some((SegmentKind::Tone, s)),
            _ => None,
        }
    }

    /// The compound payload and its kind.
    pub fn compound(&self) -> Option<(CompoundKind, &Compound)> {
        match self {
            Sound::Diphthong(c) => Some((CompoundKind::Diphthong, c)),
            Sound::Cluster(c) => Some((CompoundKind::Cluster, c)),
            _ => None,
        }
    }

    /// Consume the sound, returning its simple payload if it has one.
    pub fn into_segment(self) -> Option<(SegmentKind, Segment)> {
        match self {
            Sound::Consonant(s) => Some((SegmentKind::Consonant, s)),
            Sound::Vowel(s) => Some((SegmentKind::Vowel, s)),
            Sound::Tone(s) => Some((SegmentKind::Tone, s)),
            _ => None,
        }
    }

    /// Stored surface spelling.
    pub fn grapheme(&self) -> &str {
        match self {
            Sound::Consonant(s) | Sound::Vowel(s) | Sound::Tone(s) => &s.grapheme,
            Sound::Marker(m) => &m.grapheme,
            Sound::Diphthong(c) | Sound::Cluster(c) => &c.grapheme,
            Sound::Unknown(u) => &u.grapheme,
        }
    }

    /// Input text this sound was resolved from, as given.
    pub fn source(&self) -> Option<&str> {
        match self {
            Sound::Consonant(s) | Sound::Vowel(s) | Sound::Tone(s) => s.source.as_deref(),
            Sound::Marker(m) => m.source.as_deref(),
            Sound::Diphthong(c) | Sound::Cluster(c) => c.source.as_deref(),
            Sound::Unknown(u) => u.source.as_deref(),
        }
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = Some(source.into());
        match self {
            Sound::Consonant(s) | Sound::Vowel(s) | Sound::Tone(s) => s.source = source,
            Sound::Marker(m) => m.source = source,
            Sound::Diphthong(c) | Sound::Cluster(c) => c.source = source,
            Sound::Unknown(u) => u.source = source,
        }
    }

    /// Canonical name. Markers are named by their grapheme; unknown sounds
    /// have no name.
    pub fn name(&self) -> Option<String> {
        match self {
            Sound::Consonant(_) | Sound::Vowel(_) | Sound::Tone(_) => {
                self.segment().map(|(kind, s)| s.name(kind))
            }
            Sound::Marker(m) => Some(m.grapheme.clone()),
            Sound::Diphthong(c) => Some(c.name(CompoundKind::Diphthong)),
            Sound::Cluster(c) => Some(c.name(CompoundKind::Cluster)),
            Sound::Unknown(_) => None,
        }
    }

    /// Feature bundle. Unknown sounds have none.
    pub fn featureset(&self) -> Option<FeatureSet> {
        match self {
            Sound::Consonant(_) | Sound::Vowel(_) | Sound::Tone(_) => {
                self.segment().map(|(kind, s)| s.featureset(kind))
            }
            Sound::Marker(m) => Some(m.featureset()),
            Sound::Diphthong(c) => Some(c.featureset(CompoundKind::Diphthong)),
            Sound::Cluster(c) => Some(c.featureset(CompoundKind::Cluster)),
            Sound::Unknown(_) => None,
        }
    }

    /// Value of a slot of a simple sound.
    pub fn feature(&self, feature: Feature) -> Option<&str> {
        self.segment().and_then(|(_, s)| s.get(feature))
    }

    /// Present `(slot, value)` pairs of a simple sound in name order. Empty
    /// for every other sound.
    pub fn features(&self) -> Vec<(Feature, &str)> {
        self.segment()
            .map(|(kind, s)| s.features(kind))
            .unwrap_or_default()
    }

    /// Compound sounds are always generated; markers and unknowns never are.
    pub fn is_generated(&self) -> bool {
        match self {
            Sound::Consonant(s) | Sound::Vowel(s) | Sound::Tone(s) => s.generated,
            Sound::Diphthong(_) | Sound::Cluster(_) => true,
            Sound::Marker(_) | Sound::Unknown(_) => false,
        }
    }

    pub fn is_alias(&self) -> bool {
        match self {
            Sound::Consonant(s) | Sound::Vowel(s) | Sound::Tone(s) => s.alias,
            Sound::Marker(m) => m.alias,
            _ => false,
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.segment().is_some_and(|(_, s)| s.normalized)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Sound::Unknown(_))
    }

    pub fn stress(&self) -> Option<&str> {
        match self {
            Sound::Consonant(s) | Sound::Vowel(s) | Sound::Tone(s) => s.stress.as_deref(),
            Sound::Diphthong(c) | Sound::Cluster(c) => c.stress.as_deref(),
            _ => None,
        }
    }

    /// Jaccard similarity of the feature bundles.
    ///
    /// Markers and unknown sounds have no phonetic content and compare by
    /// type and grapheme only: 1.0 if both match, 0.0 otherwise.
    pub fn similarity(&self, other: &Sound) -> f64 {
        match (self, other) {
            (Sound::Marker(_) | Sound::Unknown(_), _) | (_, Sound::Marker(_) | Sound::Unknown(_)) => {
                let same = self.sound_type() == other.sound_type() && self.grapheme() == other.grapheme();
                if same { 1.0 } else { 0.0 }
            }
            _ => match (self.featureset(), other.featureset()) {
                (Some(a), Some(b)) => a.jaccard(&b),
                _ => 0.0,
            },
        }
    }

    /// Code points of the stored grapheme.
    pub fn codepoints(&self) -> String {
        character::codepoints(self.grapheme())
    }

    /// Characters of the stored grapheme attached to the base placeholder.
    pub fn symbols(&self) -> String {
        character::symbols(self.grapheme())
    }
}

/// Sounds with phonetic content are equal when their feature bundles are;
/// markers and unknown sounds when type and grapheme match.
impl PartialEq for Sound {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Sound::Marker(_) | Sound::Unknown(_), _) | (_, Sound::Marker(_) | Sound::Unknown(_)) => {
                self.sound_type() == other.sound_type() && self.grapheme() == other.grapheme()
            }
            _ => self.featureset() == other.featureset(),
        }
    }
}

impl Eq for Sound {}
