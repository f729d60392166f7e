// Feature taxonomy: legal feature values per sound kind and slot
//
// The taxonomy is static configuration. It is consulted when tables are
// loaded (every value must be legal for its slot) and when names are parsed
// (every name token maps back to exactly one slot).

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use serde::Deserialize;

use crate::enums::SegmentKind;
use crate::feature::Feature;

/// Error type for taxonomy construction.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("invalid taxonomy document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("taxonomy document declares no sound kinds")]
    Empty,
    #[error("unknown sound kind {kind:?} in taxonomy document")]
    UnknownKind { kind: String },
    #[error("unknown feature slot {slot:?} for {kind}")]
    UnknownSlot { kind: &'static str, slot: String },
    #[error("feature value {value:?} is listed under both {first} and {second} for {kind}")]
    AmbiguousValue {
        kind: &'static str,
        value: String,
        first: Feature,
        second: Feature,
    },
}

/// On-disk layout: `{"consonant": {"manner": ["stop", ...]}, "vowel": ..., "tone": ...}`.
/// Every kind is optional, but at least one must be present.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct TaxonomyDocument(BTreeMap<String, BTreeMap<String, Vec<String>>>);

#[derive(Debug, Clone, Default)]
struct KindTaxonomy {
    allowed: HashMap<Feature, HashSet<String>>,
    slot_of: HashMap<String, Feature>,
}

/// Legal feature values, indexed both ways.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    kinds: [KindTaxonomy; 3],
}

impl Taxonomy {
    /// Create an empty taxonomy. Nothing is legal until values are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a taxonomy document.
    pub fn from_json(text: &str) -> Result<Self, TaxonomyError> {
        let TaxonomyDocument(kinds) = serde_json::from_str(text)?;
        if kinds.is_empty() {
            return Err(TaxonomyError::Empty);
        }
        let mut taxonomy = Self::new();
        for (tag, slots) in kinds {
            let kind = SegmentKind::from_tag(&tag).ok_or(TaxonomyError::UnknownKind { kind: tag })?;
            for (slot, values) in slots {
                let feature = Feature::from_name(&slot)
                    .filter(|&f| kind.accepts_diacritic(f))
                    .ok_or_else(|| TaxonomyError::UnknownSlot {
                        kind: kind.as_str(),
                        slot: slot.clone(),
                    })?;
                for value in values {
                    taxonomy.insert(kind, feature, value)?;
                }
            }
        }
        Ok(taxonomy)
    }

    /// Declare a value legal for a slot.
    ///
    /// Fails if the slot does not belong to the kind, or if the value is
    /// already legal for a different slot of the same kind (name parsing
    /// could not tell the two apart).
    pub fn insert(
        &mut self,
        kind: SegmentKind,
        feature: Feature,
        value: impl Into<String>,
    ) -> Result<(), TaxonomyError> {
        if !kind.accepts_diacritic(feature) {
            return Err(TaxonomyError::UnknownSlot {
                kind: kind.as_str(),
                slot: feature.as_str().to_string(),
            });
        }
        let value = value.into();
        let entry = &mut self.kinds[kind.index()];
        if let Some(&existing) = entry.slot_of.get(&value) {
            if existing != feature {
                return Err(TaxonomyError::AmbiguousValue {
                    kind: kind.as_str(),
                    value,
                    first: existing,
                    second: feature,
                });
            }
            return Ok(());
        }
        entry.slot_of.insert(value.clone(), feature);
        entry.allowed.entry(feature).or_default().insert(value);
        Ok(())
    }

    /// Whether `value` is legal for `feature` in sounds of `kind`.
    pub fn allows(&self, kind: SegmentKind, feature: Feature, value: &str) -> bool {
        self.kinds[kind.index()]
            .allowed
            .get(&feature)
            .is_some_and(|values| values.contains(value))
    }

    /// The slot a value belongs to within a kind.
    pub fn slot_of(&self, kind: SegmentKind, value: &str) -> Option<Feature> {
        self.kinds[kind.index()].slot_of.get(value).copied()
    }

    /// Legal values of a slot, sorted.
    pub fn values(&self, kind: SegmentKind, feature: Feature) -> Vec<&str> {
        let mut values: Vec<&str> = self.kinds[kind.index()]
            .allowed
            .get(&feature)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();
        values.sort_unstable();
        values
    }

    /// Total number of legal values across all kinds and slots.
    pub fn len(&self) -> usize {
        self.kinds.iter().map(|k| k.slot_of.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
