// Configuration tables: header-driven TSV readers
//
// Every table is tab-separated with a header row. Column names are matched
// case-insensitively. Sound tables name their feature columns after slots
// (`manner`, `place`, ...); the reserved columns `grapheme`, `alias`, `note`
// and `extra` carry the rest. `extra` holds `slot:value` pairs separated by
// commas for slots that have no column of their own. Every cell is
// NFD-normalized before use.

use clts_core::character::nfd;
use csv::{ReaderBuilder, StringRecord};
use clts_core::{Feature, SegmentKind, SoundType, Taxonomy};

use crate::SystemError;

const GRAPHEME: &str = "grapheme";
const ALIAS: &str = "alias";
const NOTE: &str = "note";
const EXTRA: &str = "extra";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One row of a consonant, vowel, tone or marker table.
#[derive(Debug, Clone)]
pub struct SoundRow {
    pub table: &'static str,
    /// 1-based line number in the table, header included.
    pub line: usize,
    pub sound_type: SoundType,
    pub grapheme: String,
    pub features: Vec<(Feature, String)>,
    pub alias: bool,
    pub note: Option<String>,
}

/// One row of the diacritic table.
#[derive(Debug, Clone)]
pub struct DiacriticRow {
    pub line: usize,
    /// Fragment with the base placeholder (`◌ʰ`, `ʰ◌`).
    pub fragment: String,
    pub kind: SegmentKind,
    pub feature: Feature,
    pub value: String,
    pub alias: bool,
    /// Typographic variant: parsed, never written.
    pub typography: bool,
    pub note: Option<String>,
}

/// One row of the normalization table.
#[derive(Debug, Clone)]
pub struct NormalizationRow {
    pub source: char,
    pub target: String,
}

// ---------------------------------------------------------------------------
// Sources and parsed tables
// ---------------------------------------------------------------------------

/// Raw text of every configuration table of one transcription system.
#[derive(Debug, Clone, Copy)]
pub struct TableSources<'a> {
    pub consonants: &'a str,
    pub vowels: &'a str,
    pub tones: &'a str,
    pub markers: &'a str,
    pub diacritics: &'a str,
    pub normalize: &'a str,
    /// Taxonomy document (JSON).
    pub features: &'a str,
}

/// Parsed configuration, ready to be validated into a registry.
#[derive(Debug, Clone)]
pub struct Tables {
    pub taxonomy: Taxonomy,
    /// Sound rows in load order: consonants, vowels, tones, markers.
    pub sounds: Vec<SoundRow>,
    pub diacritics: Vec<DiacriticRow>,
    pub normalization: Vec<NormalizationRow>,
}

impl Tables {
    /// Parse every table. Only the table structure is checked here; feature
    /// values are checked against the taxonomy when the registry is built.
    pub fn parse(sources: &TableSources<'_>) -> Result<Self, SystemError> {
        let taxonomy = Taxonomy::from_json(sources.features)?;
        let mut sounds = Vec::new();
        for (table, text, sound_type) in [
            ("consonants.tsv", sources.consonants, SoundType::Consonant),
            ("vowels.tsv", sources.vowels, SoundType::Vowel),
            ("tones.tsv", sources.tones, SoundType::Tone),
            ("markers.tsv", sources.markers, SoundType::Marker),
        ] {
            sounds.extend(parse_sound_table(table, text, sound_type)?);
        }
        Ok(Self {
            taxonomy,
            sounds,
            diacritics: parse_diacritic_table(sources.diacritics)?,
            normalization: parse_normalization_table(sources.normalize)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Generic TSV reader (csv with a tab delimiter)
// ---------------------------------------------------------------------------

struct Tsv {
    table: &'static str,
    /// Lower-cased column names.
    header: StringRecord,
    /// `(line number, cells)`; every row has exactly `header.len()` cells.
    rows: Vec<(usize, Vec<String>)>,
}

impl Tsv {
    fn parse(table: &'static str, text: &str) -> Result<Self, SystemError> {
        let csv_error = |source| SystemError::Csv {
            table: table.to_string(),
            source,
        };
        // Tables carry IPA quotes and apostrophes, so quoting is off.
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());

        let header: StringRecord = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        if header.iter().all(str::is_empty) {
            return Err(malformed(table, "missing header row"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line() as usize);
            if record.len() > header.len() {
                return Err(malformed(
                    table,
                    format!("line {line} has {} cells, header has {}", record.len(), header.len()),
                ));
            }
            let mut cells: Vec<String> = record.iter().map(|c| nfd(c.trim())).collect();
            cells.resize(header.len(), String::new());
            rows.push((line, cells));
        }
        Ok(Self { table, header, rows })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize, SystemError> {
        self.column(name)
            .ok_or_else(|| malformed(self.table, format!("missing column {name:?}")))
    }
}

fn malformed(table: &str, message: impl Into<String>) -> SystemError {
    SystemError::MalformedTable {
        table: table.to_string(),
        message: message.into(),
    }
}

fn optional(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Boolean cell: `+`, `true`, `1` and `yes` are true; anything else is false.
pub fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_lowercase().as_str(),
        "+" | "true" | "1" | "yes"
    )
}

// ---------------------------------------------------------------------------
// Sound tables
// ---------------------------------------------------------------------------

fn parse_sound_table(
    table: &'static str,
    text: &str,
    sound_type: SoundType,
) -> Result<Vec<SoundRow>, SystemError> {
    let tsv = Tsv::parse(table, text)?;
    let grapheme_col = tsv.require(GRAPHEME)?;
    let alias_col = tsv.column(ALIAS);
    let note_col = tsv.column(NOTE);
    let extra_col = tsv.column(EXTRA);

    let kind = sound_type.segment_kind();
    let mut feature_cols = Vec::new();
    for (i, name) in tsv.header.iter().enumerate() {
        if matches!(name, GRAPHEME | ALIAS | NOTE | EXTRA) {
            continue;
        }
        let feature = kind
            .zip(Feature::from_name(name))
            .filter(|&(kind, f)| kind.has_slot(f))
            .map(|(_, f)| f)
            .ok_or_else(|| SystemError::UnknownColumn {
                table: table.to_string(),
                column: name.to_string(),
            })?;
        feature_cols.push((i, feature));
    }

    let mut rows = Vec::with_capacity(tsv.rows.len());
    for (line, cells) in &tsv.rows {
        let grapheme = cells[grapheme_col].clone();
        if grapheme.is_empty() {
            return Err(malformed(table, format!("line {line} has no grapheme")));
        }
        let mut features: Vec<(Feature, String)> = feature_cols
            .iter()
            .filter(|(i, _)| !cells[*i].is_empty())
            .map(|&(i, f)| (f, cells[i].clone()))
            .collect();
        if let Some(col) = extra_col {
            features.extend(parse_extra(table, *line, &cells[col], kind)?);
        }
        rows.push(SoundRow {
            table,
            line: *line,
            sound_type,
            grapheme,
            features,
            alias: alias_col.is_some_and(|c| parse_flag(&cells[c])),
            note: note_col.and_then(|c| optional(&cells[c])),
        });
    }
    Ok(rows)
}

/// Parse an `extra` cell: `slot:value` pairs separated by commas.
fn parse_extra(
    table: &'static str,
    line: usize,
    cell: &str,
    kind: Option<SegmentKind>,
) -> Result<Vec<(Feature, String)>, SystemError> {
    let mut out = Vec::new();
    for pair in cell.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (slot, value) = pair
            .split_once(':')
            .ok_or_else(|| malformed(table, format!("line {line}: extra entry {pair:?} is not slot:value")))?;
        let feature = kind
            .zip(Feature::from_name(slot.trim()))
            .filter(|&(kind, f)| kind.has_slot(f))
            .map(|(_, f)| f)
            .ok_or_else(|| SystemError::UnknownColumn {
                table: table.to_string(),
                column: slot.trim().to_string(),
            })?;
        out.push((feature, value.trim().to_string()));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Diacritic table
// ---------------------------------------------------------------------------

const DIACRITICS: &str = "diacritics.tsv";

fn parse_diacritic_table(text: &str) -> Result<Vec<DiacriticRow>, SystemError> {
    let tsv = Tsv::parse(DIACRITICS, text)?;
    let grapheme_col = tsv.require(GRAPHEME)?;
    let type_col = tsv.require("type")?;
    let feature_col = tsv.require("feature")?;
    let value_col = tsv.require("value")?;
    let alias_col = tsv.column(ALIAS);
    let typography_col = tsv.column("typography");
    let note_col = tsv.column(NOTE);

    let mut rows = Vec::with_capacity(tsv.rows.len());
    for (line, cells) in &tsv.rows {
        let kind = SegmentKind::from_tag(&cells[type_col]).ok_or_else(|| {
            malformed(
                DIACRITICS,
                format!("line {line}: {:?} is not a consonant, vowel or tone", cells[type_col]),
            )
        })?;
        let feature = Feature::from_name(&cells[feature_col])
            .filter(|&f| kind.accepts_diacritic(f))
            .ok_or_else(|| SystemError::UnknownColumn {
                table: DIACRITICS.to_string(),
                column: cells[feature_col].clone(),
            })?;
        if cells[grapheme_col].is_empty() || cells[value_col].is_empty() {
            return Err(malformed(DIACRITICS, format!("line {line} is incomplete")));
        }
        rows.push(DiacriticRow {
            line: *line,
            fragment: cells[grapheme_col].clone(),
            kind,
            feature,
            value: cells[value_col].clone(),
            alias: alias_col.is_some_and(|c| parse_flag(&cells[c])),
            typography: typography_col.is_some_and(|c| parse_flag(&cells[c])),
            note: note_col.and_then(|c| optional(&cells[c])),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Normalization table
// ---------------------------------------------------------------------------

fn parse_normalization_table(text: &str) -> Result<Vec<NormalizationRow>, SystemError> {
    let tsv = Tsv::parse("normalize.tsv", text)?;
    let source_col = tsv.require("source")?;
    let target_col = tsv.require("target")?;

    let mut rows = Vec::with_capacity(tsv.rows.len());
    for (_, cells) in &tsv.rows {
        let source_text = &cells[source_col];
        let mut chars = source_text.chars();
        let source = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(SystemError::MalformedNormalization {
                    source_text: source_text.clone(),
                });
            }
        };
        rows.push(NormalizationRow {
            source,
            target: cells[target_col].clone(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert!(parse_flag("+"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(parse_flag("1"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("-"));
        assert!(!parse_flag("no"));
    }

    #[test]
    fn sound_table_columns() {
        let text = "Grapheme\tPhonation\tPlace\tManner\tExtra\tAlias\tNote\n\
                    p\tvoiceless\tbilabial\tstop\t\t\t\n\
                    p\u{02B0}\tvoiceless\tbilabial\tstop\taspiration:aspirated\t\tnote\n";
        let rows = parse_sound_table("c.tsv", text, SoundType::Consonant).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].features.len(), 3);
        assert_eq!(rows[0].line, 2);
        assert!(!rows[0].alias);
        assert_eq!(rows[1].features.last(), Some(&(Feature::Aspiration, "aspirated".to_string())));
        assert_eq!(rows[1].note.as_deref(), Some("note"));
    }

    #[test]
    fn short_rows_are_padded() {
        let text = "GRAPHEME\tMANNER\tALIAS\nt\tstop\n";
        let rows = parse_sound_table("c.tsv", text, SoundType::Consonant).unwrap();
        assert_eq!(rows[0].features, vec![(Feature::Manner, "stop".to_string())]);
    }

    #[test]
    fn cells_are_decomposed() {
        let text = "GRAPHEME\tHEIGHT\n\u{00E4}\topen\n";
        let rows = parse_sound_table("v.tsv", text, SoundType::Vowel).unwrap();
        assert_eq!(rows[0].grapheme, "a\u{0308}");
    }

    #[test]
    fn marker_rows_keep_hash_grapheme() {
        let text = "GRAPHEME\tALIAS\tNOTE\n#\t\tword boundary\n";
        let rows = parse_sound_table("m.tsv", text, SoundType::Marker).unwrap();
        assert_eq!(rows[0].grapheme, "#");
        assert!(rows[0].features.is_empty());
    }

    #[test]
    fn reject_foreign_column() {
        let text = "GRAPHEME\tHEIGHT\na\topen\n";
        let err = parse_sound_table("c.tsv", text, SoundType::Consonant).unwrap_err();
        assert!(matches!(err, SystemError::UnknownColumn { ref column, .. } if column == "height"));
        let text = "GRAPHEME\tMANNER\n_\tstop\n";
        assert!(parse_sound_table("m.tsv", text, SoundType::Marker).is_err());
    }

    #[test]
    fn reject_bad_extra() {
        let text = "GRAPHEME\tEXTRA\nt\taspirated\n";
        let err = parse_sound_table("c.tsv", text, SoundType::Consonant).unwrap_err();
        assert!(matches!(err, SystemError::MalformedTable { .. }));
    }

    #[test]
    fn reject_missing_header_and_grapheme() {
        assert!(matches!(
            parse_sound_table("c.tsv", "", SoundType::Consonant),
            Err(SystemError::MalformedTable { .. })
        ));
        assert!(matches!(
            parse_sound_table("c.tsv", "MANNER\nstop\n", SoundType::Consonant),
            Err(SystemError::MalformedTable { .. })
        ));
        assert!(matches!(
            parse_sound_table("c.tsv", "GRAPHEME\tMANNER\n\tstop\n", SoundType::Consonant),
            Err(SystemError::MalformedTable { .. })
        ));
    }

    #[test]
    fn crlf_and_blank_lines() {
        let text = "GRAPHEME\tMANNER\r\n\r\nt\tstop\r\n\t \r\nk\tstop\r\n";
        let rows = parse_sound_table("c.tsv", text, SoundType::Consonant).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].grapheme, "t");
        assert_eq!(rows[0].features, vec![(Feature::Manner, "stop".to_string())]);
        assert!(rows[1].line > rows[0].line);
    }

    #[test]
    fn quote_characters_are_literal() {
        let text = "SOURCE\tTARGET\n\"\t\u{02BA}\n'\t\u{02BC}\n";
        let rows = parse_normalization_table(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, '"');
        assert_eq!(rows[1].source, '\'');
    }

    #[test]
    fn reject_overlong_row() {
        let text = "GRAPHEME\tMANNER\nt\tstop\textra\n";
        assert!(parse_sound_table("c.tsv", text, SoundType::Consonant).is_err());
    }

    #[test]
    fn diacritic_rows() {
        let text = "GRAPHEME\tTYPE\tFEATURE\tVALUE\tALIAS\tTYPOGRAPHY\tNOTE\n\
                    \u{25CC}\u{02B0}\tconsonant\taspiration\taspirated\t\t\t\n\
                    \u{25CC}\u{02BD}\tconsonant\taspiration\taspirated\t\t+\t\n\
                    \u{02C8}\u{25CC}\tvowel\tstress\tprimary-stress\t\t\t\n";
        let rows = parse_diacritic_table(text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, SegmentKind::Consonant);
        assert!(rows[1].typography);
        assert_eq!(rows[2].feature, Feature::Stress);
    }

    #[test]
    fn reject_diacritic_for_foreign_slot() {
        let text = "GRAPHEME\tTYPE\tFEATURE\tVALUE\n\u{25CC}x\ttone\tstress\tprimary-stress\n";
        assert!(parse_diacritic_table(text).is_err());
        let text = "GRAPHEME\tTYPE\tFEATURE\tVALUE\n\u{25CC}x\tmarker\tmanner\tstop\n";
        assert!(parse_diacritic_table(text).is_err());
    }

    #[test]
    fn normalization_rows() {
        let rows = parse_normalization_table("SOURCE\tTARGET\ng\t\u{0261}\n").unwrap();
        assert_eq!(rows[0].source, 'g');
        assert_eq!(rows[0].target, "\u{0261}");
        let err = parse_normalization_table("SOURCE\tTARGET\nts\tx\n").unwrap_err();
        assert!(matches!(err, SystemError::MalformedNormalization { .. }));
    }
}
