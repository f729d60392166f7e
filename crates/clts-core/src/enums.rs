// Sound-type tags: the closed set of sound classes and its simple/compound subsets

/// Type tag of a sound. The set is closed.
///
/// The lower-case tag string (see [`SoundType::as_str`]) is the last word of
/// every sound name and a member of every feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SoundType {
    Consonant,
    Vowel,
    Tone,
    /// Boundary or segmentation token without phonetic content.
    Marker,
    /// Two adjacent vowels.
    Diphthong,
    /// Two adjacent consonants.
    Cluster,
    /// The explicit "could not parse" result.
    Unknown,
}

impl SoundType {
    /// Every sound type, in declaration order.
    pub const ALL: [SoundType; 7] = [
        SoundType::Consonant,
        SoundType::Vowel,
        SoundType::Tone,
        SoundType::Marker,
        SoundType::Diphthong,
        SoundType::Cluster,
        SoundType::Unknown,
    ];

    /// The tag string used in names and feature sets.
    pub fn as_str(self) -> &'static str {
        match self {
            SoundType::Consonant => "consonant",
            SoundType::Vowel => "vowel",
            SoundType::Tone => "tone",
            SoundType::Marker => "marker",
            SoundType::Diphthong => "diphthong",
            SoundType::Cluster => "cluster",
            SoundType::Unknown => "unknownsound",
        }
    }

    /// Parse a tag string. Returns `None` for anything that is not a tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// The simple kind behind this tag, if it has feature slots of its own.
    pub fn segment_kind(self) -> Option<SegmentKind> {
        match self {
            SoundType::Consonant => Some(SegmentKind::Consonant),
            SoundType::Vowel => Some(SegmentKind::Vowel),
            SoundType::Tone => Some(SegmentKind::Tone),
            _ => None,
        }
    }

    /// The compound kind behind this tag, if any.
    pub fn compound_kind(self) -> Option<CompoundKind> {
        match self {
            SoundType::Diphthong => Some(CompoundKind::Diphthong),
            SoundType::Cluster => Some(CompoundKind::Cluster),
            _ => None,
        }
    }
}

/// Sound types that carry their own ordered feature slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKind {
    Consonant,
    Vowel,
    Tone,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 3] = [SegmentKind::Consonant, SegmentKind::Vowel, SegmentKind::Tone];

    pub fn sound_type(self) -> SoundType {
        match self {
            SegmentKind::Consonant => SoundType::Consonant,
            SegmentKind::Vowel => SoundType::Vowel,
            SegmentKind::Tone => SoundType::Tone,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.sound_type().as_str()
    }

    /// Dense index for per-kind arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        SoundType::from_tag(tag).and_then(SoundType::segment_kind)
    }
}

/// Sound types synthesized from two simple sounds of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompoundKind {
    Diphthong,
    Cluster,
}

impl CompoundKind {
    pub fn sound_type(self) -> SoundType {
        match self {
            CompoundKind::Diphthong => SoundType::Diphthong,
            CompoundKind::Cluster => SoundType::Cluster,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.sound_type().as_str()
    }

    /// Kind of the two constituents.
    pub fn constituent(self) -> SegmentKind {
        match self {
            CompoundKind::Diphthong => SegmentKind::Vowel,
            CompoundKind::Cluster => SegmentKind::Consonant,
        }
    }
}
