//! Sound model and feature taxonomy for phonetic transcription systems.
//!
//! This crate holds the leaves of the system: the closed set of sound types
//! and feature slots, the per-type slot orders used to serialize names and
//! place diacritics, the legal-value taxonomy, and the [`Sound`] sum type.
//! It knows nothing about tables or registries.
//!
//! # Architecture
//!
//! - [`character`] -- Reserved characters and Unicode helpers
//! - [`enums`] -- Sound-type tags
//! - [`feature`] -- Feature slots and slot orders
//! - [`taxonomy`] -- Legal feature values per type and slot
//! - [`sound`] -- The sound model, feature sets and similarity

pub mod character;
pub mod enums;
pub mod feature;
pub mod sound;
pub mod taxonomy;

pub use enums::{CompoundKind, SegmentKind, SoundType};
pub use feature::Feature;
pub use sound::{Compound, FeatureSet, Marker, Segment, Sound, UnknownSound};
pub use taxonomy::{Taxonomy, TaxonomyError};
