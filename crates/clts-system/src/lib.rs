//! Transcription system registry, grapheme parser and canonicalizer.
//!
//! A [`TranscriptionSystem`] is built once from static configuration tables
//! and is immutable afterwards. Parsing ([`TranscriptionSystem::resolve`]) and
//! canonicalization ([`TranscriptionSystem::canonical`],
//! [`TranscriptionSystem::from_name`]) are pure functions of the system and
//! their input, so a loaded system can be shared across threads freely.
//!
//! # Architecture
//!
//! - [`table`] -- Header-driven TSV readers (csv) for sound, diacritic and normalization tables
//! - [`matcher`] -- Longest-match trie over graphemes and diacritic fragments
//! - [`diacritics`] -- Per-type diacritic pools and value renderings
//! - [`system`] -- The registry and its load-time validation
//! - [`parser`] -- Free-form grapheme parsing
//! - [`compound`] -- Diphthong, cluster and affricate synthesis
//! - [`canonical`] -- Canonical spelling and name parsing
//! - [`lookup`] -- Convenience lookups over the parser and the name parser
//! - [`loader`] -- Configuration discovery
//! - [`bipa`] -- The embedded reference configuration

pub mod bipa;
pub mod canonical;
pub mod compound;
pub mod diacritics;
pub mod loader;
pub mod lookup;
pub mod matcher;
pub mod parser;
pub mod system;
pub mod table;

pub use clts_core::{
    CompoundKind, Feature, FeatureSet, SegmentKind, Sound, SoundType, Taxonomy, TaxonomyError,
};
pub use system::TranscriptionSystem;

/// Fatal configuration error raised while a transcription system is built.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
    #[error("{table}: {message}")]
    MalformedTable { table: String, message: String },
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
    #[error("{table}: unknown feature column {column:?}")]
    UnknownColumn { table: String, column: String },
    #[error("{table} row {row}: value {value:?} is not a legal {feature} for {kind}")]
    UnknownFeatureValue {
        table: String,
        row: usize,
        kind: &'static str,
        feature: Feature,
        value: String,
    },
    #[error("grapheme {grapheme:?} is defined twice ({first} and {second})")]
    DuplicateGrapheme {
        grapheme: String,
        first: String,
        second: String,
    },
    #[error("{first:?} and {second:?} denote the same sound; one of them must be an alias")]
    DuplicateFeatures { first: String, second: String },
    #[error("aliases without a canonical sound: {}", graphemes.join(", "))]
    OrphanedAliases { graphemes: Vec<String> },
    #[error("diacritic {fragment:?}: the base placeholder must lead or trail the fragment")]
    MalformedDiacritic { fragment: String },
    #[error("normalization source {source_text:?} is not a single character")]
    MalformedNormalization { source_text: String },
}

/// Error raised by the name parser on malformed structured input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("empty sound name")]
    Empty,
    #[error("{name:?} does not end in a sound class")]
    UnknownClass { name: String },
    #[error("{name:?} is erroneously encoded; expected \"from <sound> to <sound> {class}\"")]
    MalformedComplex { name: String, class: &'static str },
    #[error("components of {name:?} could not be found")]
    ComponentsNotFound { name: String },
    #[error("unknown feature {token:?} in {name:?}")]
    UnknownFeature { name: String, token: String },
    #[error("{name:?} sets {feature} twice")]
    ConflictingFeatures { name: String, feature: Feature },
    #[error("no marker is named {name:?}")]
    UnknownMarker { name: String },
}
