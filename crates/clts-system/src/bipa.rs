// BIPA: the reference transcription system, compiled into the library

use crate::SystemError;
use crate::system::TranscriptionSystem;
use crate::table::TableSources;

/// Identifier of the reference system.
pub const ID: &str = "bipa";

const CONSONANTS: &str = include_str!("../data/bipa/consonants.tsv");
const VOWELS: &str = include_str!("../data/bipa/vowels.tsv");
const TONES: &str = include_str!("../data/bipa/tones.tsv");
const MARKERS: &str = include_str!("../data/bipa/markers.tsv");
const DIACRITICS: &str = include_str!("../data/bipa/diacritics.tsv");
const NORMALIZE: &str = include_str!("../data/bipa/normalize.tsv");
const FEATURES: &str = include_str!("../data/features.json");

/// Raw tables of the reference system.
pub fn sources() -> TableSources<'static> {
    TableSources {
        consonants: CONSONANTS,
        vowels: VOWELS,
        tones: TONES,
        markers: MARKERS,
        diacritics: DIACRITICS,
        normalize: NORMALIZE,
        features: FEATURES,
    }
}

/// Build the reference system.
pub fn bipa() -> Result<TranscriptionSystem, SystemError> {
    TranscriptionSystem::from_sources(ID, &sources())
}
