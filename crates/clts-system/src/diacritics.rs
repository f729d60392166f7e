// Diacritic index: per-type pools of fragments written before and after a base
//
// A diacritic row carries a fragment with the base placeholder (`◌`). A
// trailing placeholder (`ʰ◌`) puts the fragment in the pre-base pool, a
// leading one (`◌ʰ`) in the post-base pool. Every fragment maps to exactly one
// feature value. Values are rendered back to fragments through the canonical
// rows only; alias and typographic rows are recognized but never written.

use hashbrown::HashMap;

use clts_core::character::EMPTY;
use clts_core::{Feature, SegmentKind, Taxonomy};

use crate::SystemError;
use crate::matcher::Matcher;
use crate::table::DiacriticRow;

/// Which side of the base a fragment attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Pre,
    Post,
}

/// A recognized diacritic fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diacritic {
    /// Surface fragment without the placeholder.
    pub fragment: String,
    pub feature: Feature,
    pub value: String,
    /// Canonical fragment for the same value.
    pub canonical: String,
}

#[derive(Debug, Clone, Default)]
struct Pool {
    matcher: Matcher<u32>,
    by_fragment: HashMap<String, u32>,
}

#[derive(Debug, Clone, Default)]
struct KindIndex {
    pre: Pool,
    post: Pool,
    rendering: HashMap<String, String>,
}

impl KindIndex {
    fn pool(&self, position: Position) -> &Pool {
        match position {
            Position::Pre => &self.pre,
            Position::Post => &self.post,
        }
    }

    fn pool_mut(&mut self, position: Position) -> &mut Pool {
        match position {
            Position::Pre => &mut self.pre,
            Position::Post => &mut self.post,
        }
    }
}

/// Recognition and rendering of diacritics for every simple sound type.
#[derive(Debug, Clone, Default)]
pub struct DiacriticIndex {
    entries: Vec<Diacritic>,
    kinds: [KindIndex; 3],
}

/// Split a placeholder fragment into its position and bare text.
fn split_fragment(fragment: &str) -> Option<(Position, &str)> {
    let (position, bare) = if let Some(rest) = fragment.strip_prefix(EMPTY) {
        (Position::Post, rest)
    } else if let Some(rest) = fragment.strip_suffix(EMPTY) {
        (Position::Pre, rest)
    } else {
        return None;
    };
    (!bare.is_empty() && !bare.contains(EMPTY)).then_some((position, bare))
}

impl DiacriticIndex {
    /// Build the index, checking every value against the taxonomy.
    pub fn build(rows: &[DiacriticRow], taxonomy: &Taxonomy) -> Result<Self, SystemError> {
        let mut index = Self::default();
        for row in rows {
            if !taxonomy.allows(row.kind, row.feature, &row.value) {
                return Err(SystemError::UnknownFeatureValue {
                    table: "diacritics.tsv".to_string(),
                    row: row.line,
                    kind: row.kind.as_str(),
                    feature: row.feature,
                    value: row.value.clone(),
                });
            }
            let (position, bare) = split_fragment(&row.fragment).ok_or_else(|| {
                SystemError::MalformedDiacritic {
                    fragment: row.fragment.clone(),
                }
            })?;

            let kind = &mut index.kinds[row.kind.index()];
            if !row.alias && !row.typography {
                kind.rendering
                    .entry(row.value.clone())
                    .or_insert_with(|| bare.to_string());
            }

            let pool = kind.pool_mut(position);
            if let Some(&existing) = pool.by_fragment.get(bare) {
                let existing = &index.entries[existing as usize];
                if existing.value != row.value {
                    return Err(SystemError::MalformedTable {
                        table: "diacritics.tsv".to_string(),
                        message: format!(
                            "line {}: {:?} already means {:?} for {}",
                            row.line,
                            row.fragment,
                            existing.value,
                            row.kind.as_str()
                        ),
                    });
                }
                continue;
            }
            let id = index.entries.len() as u32;
            pool.matcher.insert(bare, id);
            pool.by_fragment.insert(bare.to_string(), id);
            index.entries.push(Diacritic {
                fragment: bare.to_string(),
                feature: row.feature,
                value: row.value.clone(),
                canonical: String::new(),
            });
        }

        // Every entry spells its value canonically through the rendering of
        // its own kind.
        for kind in SegmentKind::ALL {
            let k = &index.kinds[kind.index()];
            for pool in [&k.pre, &k.post] {
                for &id in pool.by_fragment.values() {
                    let entry = &mut index.entries[id as usize];
                    entry.canonical = k
                        .rendering
                        .get(&entry.value)
                        .cloned()
                        .unwrap_or_else(|| entry.fragment.clone());
                }
            }
        }
        Ok(index)
    }

    /// Number of distinct `(type, position, fragment)` entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Segment `text` completely into diacritics of the given pool, longest
    /// fragment first. `None` if any character is left over.
    pub fn resolve(&self, kind: SegmentKind, position: Position, text: &[char]) -> Option<Vec<&Diacritic>> {
        let pool = self.kinds[kind.index()].pool(position);
        let spans = pool.matcher.segment(text)?;
        Some(
            spans
                .into_iter()
                .map(|span| &self.entries[span.value as usize])
                .collect(),
        )
    }

    /// Look up a single fragment (without placeholder).
    pub fn get(&self, kind: SegmentKind, position: Position, fragment: &str) -> Option<&Diacritic> {
        self.kinds[kind.index()]
            .pool(position)
            .by_fragment
            .get(fragment)
            .map(|&id| &self.entries[id as usize])
    }

    /// Canonical fragment (without placeholder) that writes a value.
    pub fn render(&self, kind: SegmentKind, value: &str) -> Option<&str> {
        self.kinds[kind.index()].rendering.get(value).map(String::as_str)
    }
}
