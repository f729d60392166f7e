// Transcription system: the loaded, immutable registry of sounds
//
// Construction validates the configuration once and fails on the first
// inconsistency: illegal feature values, graphemes defined twice, two
// canonical spellings for the same feature bundle, and aliases without a
// canonical sound. After construction nothing is mutated, so a system can be
// shared across threads without synchronization.

use hashbrown::HashMap;
use tracing::{debug, warn};

use clts_core::character::nfd;
use clts_core::{Feature, FeatureSet, Marker, SegmentKind, Segment, Sound, Taxonomy};

use crate::SystemError;
use crate::diacritics::DiacriticIndex;
use crate::matcher::Matcher;
use crate::table::{SoundRow, TableSources, Tables};

/// A transcription system: registered sounds, their diacritics and the
/// character-level normalization table.
#[derive(Debug, Clone)]
pub struct TranscriptionSystem {
    id: String,
    pub(crate) taxonomy: Taxonomy,
    /// Registered sounds in load order.
    pub(crate) sounds: Vec<Sound>,
    pub(crate) by_grapheme: HashMap<String, usize>,
    /// Canonical (non-alias) sound of every feature bundle.
    pub(crate) by_features: HashMap<FeatureSet, usize>,
    pub(crate) diacritics: DiacriticIndex,
    /// Every registered grapheme, aliases and markers included.
    pub(crate) bases: Matcher<u32>,
    pub(crate) normalization: HashMap<char, String>,
}

impl TranscriptionSystem {
    /// Parse and validate raw table sources.
    pub fn from_sources(id: &str, sources: &TableSources<'_>) -> Result<Self, SystemError> {
        let tables = Tables::parse(sources).inspect_err(|e| {
            warn!(system = id, error = %e, "failed to parse transcription system tables");
        })?;
        Self::new(id, tables)
    }

    /// Validate parsed tables into a registry.
    pub fn new(id: &str, tables: Tables) -> Result<Self, SystemError> {
        let system = Self::build(id, tables).inspect_err(|e| {
            warn!(system = id, error = %e, "invalid transcription system");
        })?;
        debug!(
            system = id,
            sounds = system.sounds.len(),
            aliases = system.sounds.iter().filter(|s| s.is_alias()).count(),
            diacritics = system.diacritics.len(),
            normalizations = system.normalization.len(),
            "loaded transcription system"
        );
        Ok(system)
    }

    fn build(id: &str, tables: Tables) -> Result<Self, SystemError> {
        let Tables {
            taxonomy,
            sounds: rows,
            diacritics,
            normalization,
        } = tables;

        let mut sounds = Vec::with_capacity(rows.len());
        let mut origins: Vec<String> = Vec::with_capacity(rows.len());
        let mut by_grapheme: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        let mut by_features: HashMap<FeatureSet, usize> = HashMap::with_capacity(rows.len());
        let mut aliases = Vec::new();

        for row in rows {
            let origin = format!("{}:{}", row.table, row.line);
            let sound = sound_from_row(&row, &taxonomy)?;

            if let Some(&first) = by_grapheme.get(&row.grapheme) {
                return Err(SystemError::DuplicateGrapheme {
                    grapheme: row.grapheme,
                    first: origins[first].clone(),
                    second: origin,
                });
            }
            let index = sounds.len();
            by_grapheme.insert(row.grapheme.clone(), index);

            match sound.featureset() {
                Some(features) if matches!(sound, Sound::Marker(_)) || !row.alias => {
                    if let Some(&first) = by_features.get(&features) {
                        let first: &Sound = &sounds[first];
                        return Err(SystemError::DuplicateFeatures {
                            first: first.grapheme().to_string(),
                            second: row.grapheme,
                        });
                    }
                    by_features.insert(features, index);
                }
                Some(features) => aliases.push((index, features)),
                None => {}
            }
            sounds.push(sound);
            origins.push(origin);
        }

        let orphans: Vec<String> = aliases
            .iter()
            .filter(|(_, features)| !by_features.contains_key(features))
            .map(|&(index, _)| format!("{} ({})", sounds[index].grapheme(), origins[index]))
            .collect();
        if !orphans.is_empty() {
            return Err(SystemError::OrphanedAliases { graphemes: orphans });
        }

        let diacritics = DiacriticIndex::build(&diacritics, &taxonomy)?;

        let mut bases = Matcher::new();
        for (index, sound) in sounds.iter().enumerate() {
            bases.insert(sound.grapheme(), index as u32);
        }

        let normalization = normalization
            .into_iter()
            .map(|row| (row.source, row.target))
            .collect();

        Ok(Self {
            id: id.to_string(),
            taxonomy,
            sounds,
            by_grapheme,
            by_features,
            diacritics,
            bases,
            normalization,
        })
    }

    // -----------------------------------------------------------------------
    // Registry access
    // -----------------------------------------------------------------------

    /// Identifier of the system (`"bipa"`).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn diacritics(&self) -> &DiacriticIndex {
        &self.diacritics
    }

    /// Number of registered sounds, aliases included.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Registered sounds in load order.
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    /// Registered graphemes in load order.
    pub fn graphemes(&self) -> impl Iterator<Item = &str> {
        self.sounds.iter().map(Sound::grapheme)
    }

    /// Registered sound spelled exactly `grapheme` (already decomposed).
    pub fn sound(&self, grapheme: &str) -> Option<&Sound> {
        self.by_grapheme.get(grapheme).map(|&i| &self.sounds[i])
    }

    /// Whether a spelling is registered. The query is decomposed first.
    pub fn contains_grapheme(&self, grapheme: &str) -> bool {
        self.by_grapheme.contains_key(&nfd(grapheme))
    }

    /// Whether the sound's feature bundle has a canonical registered sound.
    pub fn contains_sound(&self, sound: &Sound) -> bool {
        sound
            .featureset()
            .is_some_and(|features| self.by_features.contains_key(&features))
    }

    /// Canonical registered sound of a feature bundle.
    pub fn canonical_sound(&self, features: &FeatureSet) -> Option<&Sound> {
        self.by_features.get(features).map(|&i| &self.sounds[i])
    }

    /// Slot a feature value belongs to for a simple sound type.
    pub fn feature_of(&self, kind: SegmentKind, value: &str) -> Option<Feature> {
        self.taxonomy.slot_of(kind, value)
    }

    /// Decompose `text` and apply the character-level normalization table.
    pub fn normalize(&self, text: &str) -> String {
        self.map_chars(&nfd(text))
    }

    /// Apply the normalization table to already decomposed text.
    pub(crate) fn map_chars(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.normalization.get(&c) {
                Some(target) => out.push_str(target),
                None => out.push(c),
            }
        }
        out
    }
}

fn sound_from_row(row: &SoundRow, taxonomy: &Taxonomy) -> Result<Sound, SystemError> {
    let Some(kind) = row.sound_type.segment_kind() else {
        return Ok(Sound::Marker(Marker {
            grapheme: row.grapheme.clone(),
            alias: row.alias,
            source: None,
            note: row.note.clone(),
        }));
    };

    let mut segment = Segment::new(row.grapheme.clone());
    segment.alias = row.alias;
    segment.note = row.note.clone();
    for (feature, value) in &row.features {
        if !taxonomy.allows(kind, *feature, value) {
            return Err(SystemError::UnknownFeatureValue {
                table: row.table.to_string(),
                row: row.line,
                kind: kind.as_str(),
                feature: *feature,
                value: value.clone(),
            });
        }
        if segment.get(*feature).is_some() {
            return Err(SystemError::MalformedTable {
                table: row.table.to_string(),
                message: format!("line {} sets {feature} twice", row.line),
            });
        }
        segment.set(*feature, value.clone());
    }
    Ok(Sound::from_segment(kind, segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: &str = r#"{
        "consonant": {
            "phonation": ["voiced", "voiceless"],
            "place": ["alveolar", "velar"],
            "manner": ["stop"],
            "aspiration": ["aspirated"]
        },
        "vowel": {
            "roundedness": ["unrounded"],
            "height": ["open"],
            "centrality": ["front"]
        },
        "tone": {}
    }"#;

    const CONSONANTS: &str = "GRAPHEME\tPHONATION\tPLACE\tMANNER\tALIAS\n\
                              t\tvoiceless\talveolar\tstop\t\n\
                              d\tvoiced\talveolar\tstop\t\n\
                              k\tvoiceless\tvelar\tstop\t\n";
    const VOWELS: &str = "GRAPHEME\tROUNDEDNESS\tHEIGHT\tCENTRALITY\nA\tunrounded\topen\tfront\n";
    const TONES: &str = "GRAPHEME\tCONTOUR\n";
    const MARKERS: &str = "GRAPHEME\n_\n";
    const DIACRITICS: &str = "GRAPHEME\tTYPE\tFEATURE\tVALUE\n\u{25CC}\u{02B0}\tconsonant\taspiration\taspirated\n";
    const NORMALIZE: &str = "SOURCE\tTARGET\na\tA\n";

    fn sources<'a>(consonants: &'a str) -> TableSources<'a> {
        TableSources {
            consonants,
            vowels: VOWELS,
            tones: TONES,
            markers: MARKERS,
            diacritics: DIACRITICS,
            normalize: NORMALIZE,
            features: FEATURES,
        }
    }

    #[test]
    fn load_small_system() {
        let ts = TranscriptionSystem::from_sources("mini", &sources(CONSONANTS)).unwrap();
        assert_eq!(ts.id(), "mini");
        assert_eq!(ts.len(), 5);
        assert_eq!(ts.graphemes().collect::<Vec<_>>(), vec!["t", "d", "k", "A", "_"]);
        assert!(ts.contains_grapheme("k"));
        assert!(!ts.contains_grapheme("g"));
        assert_eq!(ts.feature_of(SegmentKind::Consonant, "velar"), Some(Feature::Place));
        assert_eq!(ts.normalize("ta"), "tA");
    }

    #[test]
    fn canonical_lookup_by_features() {
        let ts = TranscriptionSystem::from_sources("mini", &sources(CONSONANTS)).unwrap();
        let t = ts.sound("t").unwrap();
        let features = t.featureset().unwrap();
        assert_eq!(ts.canonical_sound(&features).map(Sound::grapheme), Some("t"));
        assert!(ts.contains_sound(t));
        let marker = ts.sound("_").unwrap();
        assert!(ts.contains_sound(marker));
    }

    #[test]
    fn alias_shares_canonical_bundle() {
        let consonants = format!("{CONSONANTS}T\tvoiceless\talveolar\tstop\t+\n");
        let ts = TranscriptionSystem::from_sources("mini", &sources(&consonants)).unwrap();
        let alias = ts.sound("T").unwrap();
        assert!(alias.is_alias());
        let canonical = ts.canonical_sound(&alias.featureset().unwrap()).unwrap();
        assert_eq!(canonical.grapheme(), "t");
    }

    #[test]
    fn reject_duplicate_grapheme() {
        let consonants = format!("{CONSONANTS}t\tvoiced\tvelar\tstop\t\n");
        let err = TranscriptionSystem::from_sources("mini", &sources(&consonants)).unwrap_err();
        match err {
            SystemError::DuplicateGrapheme { grapheme, first, second } => {
                assert_eq!(grapheme, "t");
                assert_eq!(first, "consonants.tsv:2");
                assert_eq!(second, "consonants.tsv:5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reject_grapheme_shared_across_tables() {
        let markers = "GRAPHEME\nt\n";
        let mut src = sources(CONSONANTS);
        src.markers = markers;
        let err = TranscriptionSystem::from_sources("mini", &src).unwrap_err();
        assert!(matches!(err, SystemError::DuplicateGrapheme { .. }));
    }

    #[test]
    fn reject_duplicate_features() {
        let consonants = format!("{CONSONANTS}T\tvoiceless\talveolar\tstop\t\n");
        let err = TranscriptionSystem::from_sources("mini", &sources(&consonants)).unwrap_err();
        assert!(matches!(err, SystemError::DuplicateFeatures { .. }));
    }

    #[test]
    fn reject_orphaned_aliases() {
        let consonants = format!(
            "{CONSONANTS}G\tvoiced\tvelar\tstop\t+\nD\tvoiced\tvelar\tstop\t+\n"
        );
        let err = TranscriptionSystem::from_sources("mini", &sources(&consonants)).unwrap_err();
        match err {
            SystemError::OrphanedAliases { graphemes } => {
                assert_eq!(graphemes.len(), 2);
                assert!(graphemes[0].starts_with("G "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reject_illegal_value() {
        let consonants = format!("{CONSONANTS}q\tvoiceless\tuvular\tstop\t\n");
        let err = TranscriptionSystem::from_sources("mini", &sources(&consonants)).unwrap_err();
        assert!(matches!(
            err,
            SystemError::UnknownFeatureValue { feature: Feature::Place, .. }
        ));
    }

    #[test]
    fn reject_bad_taxonomy() {
        let mut src = sources(CONSONANTS);
        src.features = "[]";
        let err = TranscriptionSystem::from_sources("mini", &src).unwrap_err();
        assert!(matches!(err, SystemError::Taxonomy(_)));
    }
}
