// Feature slots: the closed set of slot names and the per-kind slot orders
//
// The name order drives name serialization and base-sound lookup; the write
// order drives where the canonicalizer places diacritics around a base
// grapheme. Both are fixed per kind.

use crate::enums::SegmentKind;

macro_rules! feature_slots {
    ($($variant:ident => $name:literal,)+) => {
        /// A named feature slot of a simple sound.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Feature {
            $($variant,)+
        }

        impl Feature {
            /// Every slot, in declaration order.
            pub const ALL: &'static [Feature] = &[$(Feature::$variant,)+];

            /// Column / key name of the slot in tables and taxonomy documents.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Feature::$variant => $name,)+
                }
            }

            /// Parse a slot name (case-sensitive, lower-case).
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Feature::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

feature_slots! {
    Airstream => "airstream",
    Articulation => "articulation",
    Aspiration => "aspiration",
    Breathiness => "breathiness",
    Centrality => "centrality",
    Contour => "contour",
    Creakiness => "creakiness",
    Duration => "duration",
    Ejection => "ejection",
    End => "end",
    Friction => "friction",
    Glottalization => "glottalization",
    Height => "height",
    Labialization => "labialization",
    Laminality => "laminality",
    Manner => "manner",
    Middle => "middle",
    Nasalization => "nasalization",
    Palatalization => "palatalization",
    Pharyngealization => "pharyngealization",
    Phonation => "phonation",
    Place => "place",
    Preceding => "preceding",
    Raising => "raising",
    RelativeArticulation => "relative_articulation",
    Release => "release",
    Rhotacization => "rhotacization",
    Roundedness => "roundedness",
    Rounding => "rounding",
    Start => "start",
    Stress => "stress",
    Syllabicity => "syllabicity",
    Tone => "tone",
    TongueRoot => "tongue_root",
    Velarization => "velarization",
    Voicing => "voicing",
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Name orders
// ---------------------------------------------------------------------------

const CONSONANT_NAME_ORDER: &[Feature] = &[
    Feature::Raising,
    Feature::RelativeArticulation,
    Feature::Friction,
    Feature::Articulation,
    Feature::Preceding,
    Feature::Syllabicity,
    Feature::Nasalization,
    Feature::Palatalization,
    Feature::Labialization,
    Feature::Velarization,
    Feature::Pharyngealization,
    Feature::Glottalization,
    Feature::Aspiration,
    Feature::Duration,
    Feature::Release,
    Feature::Voicing,
    Feature::Creakiness,
    Feature::Breathiness,
    Feature::Phonation,
    Feature::Laminality,
    Feature::TongueRoot,
    Feature::Place,
    Feature::Ejection,
    Feature::Airstream,
    Feature::Manner,
];

const VOWEL_NAME_ORDER: &[Feature] = &[
    Feature::Duration,
    Feature::Rhotacization,
    Feature::Pharyngealization,
    Feature::Glottalization,
    Feature::Velarization,
    Feature::Syllabicity,
    Feature::RelativeArticulation,
    Feature::TongueRoot,
    Feature::Raising,
    Feature::Rounding,
    Feature::Articulation,
    Feature::Nasalization,
    Feature::Voicing,
    Feature::Creakiness,
    Feature::Breathiness,
    Feature::Roundedness,
    Feature::Height,
    Feature::Friction,
    Feature::Centrality,
    Feature::Tone,
];

const TONE_NAME_ORDER: &[Feature] = &[
    Feature::Contour,
    Feature::Start,
    Feature::Middle,
    Feature::End,
];

// ---------------------------------------------------------------------------
// Write orders
// ---------------------------------------------------------------------------

const CONSONANT_WRITE_PRE: &[Feature] = &[Feature::Preceding];

const CONSONANT_WRITE_POST: &[Feature] = &[
    Feature::Raising,
    Feature::RelativeArticulation,
    Feature::Laminality,
    Feature::Creakiness,
    Feature::TongueRoot,
    Feature::Phonation,
    Feature::Ejection,
    Feature::Syllabicity,
    Feature::Voicing,
    Feature::Articulation,
    Feature::Nasalization,
    Feature::Release,
    Feature::Palatalization,
    Feature::Labialization,
    Feature::Velarization,
    Feature::Pharyngealization,
    Feature::Glottalization,
    Feature::Breathiness,
    Feature::Aspiration,
    Feature::Friction,
    Feature::Duration,
];

const VOWEL_WRITE_POST: &[Feature] = &[
    Feature::TongueRoot,
    Feature::Raising,
    Feature::Centrality,
    Feature::Rounding,
    Feature::Voicing,
    Feature::Breathiness,
    Feature::Creakiness,
    Feature::Syllabicity,
    Feature::Friction,
    Feature::RelativeArticulation,
    Feature::Nasalization,
    Feature::Tone,
    Feature::Articulation,
    Feature::Rhotacization,
    Feature::Pharyngealization,
    Feature::Glottalization,
    Feature::Velarization,
    Feature::Duration,
];

/// Feature values that never seed a base-sound lookup during
/// canonicalization. They are always written as diacritics.
pub const EXCLUDED_FROM_BASE: &[&str] = &[
    "apical",
    "laminal",
    "ejective",
    "with-extra-high_tone",
    "with-high_tone",
    "with-mid_tone",
    "with-low_tone",
    "with-extra-low_tone",
    "with-rising_tone",
    "with-falling_tone",
    "with-global_fall",
    "with-global_rise",
    "with-upstep",
];

impl SegmentKind {
    /// Slot order used for names and base lookup.
    pub fn name_order(self) -> &'static [Feature] {
        match self {
            SegmentKind::Consonant => CONSONANT_NAME_ORDER,
            SegmentKind::Vowel => VOWEL_NAME_ORDER,
            SegmentKind::Tone => TONE_NAME_ORDER,
        }
    }

    /// Slots written before the base grapheme, in output order.
    pub fn write_pre(self) -> &'static [Feature] {
        match self {
            SegmentKind::Consonant => CONSONANT_WRITE_PRE,
            SegmentKind::Vowel | SegmentKind::Tone => &[],
        }
    }

    /// Slots written after the base grapheme, in output order.
    pub fn write_post(self) -> &'static [Feature] {
        match self {
            SegmentKind::Consonant => CONSONANT_WRITE_POST,
            SegmentKind::Vowel => VOWEL_WRITE_POST,
            SegmentKind::Tone => &[],
        }
    }

    /// Whether a slot belongs to this kind's feature bundle.
    pub fn has_slot(self, feature: Feature) -> bool {
        self.name_order().contains(&feature)
    }

    /// Whether a diacritic of this kind may target the slot. Stress is set
    /// by diacritics but is not part of the feature bundle.
    pub fn accepts_diacritic(self, feature: Feature) -> bool {
        self.has_slot(feature) || (feature == Feature::Stress && self != SegmentKind::Tone)
    }
}
