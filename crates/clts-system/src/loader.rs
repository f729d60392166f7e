// Configuration discovery: load a transcription system from disk or fall back
// to the embedded reference system.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::SystemError;
use crate::bipa;
use crate::system::TranscriptionSystem;
use crate::table::TableSources;

/// Environment variable naming a table directory.
pub const SYSTEM_PATH_ENV: &str = "CLTS_SYSTEM_PATH";

/// Table that marks a directory as a transcription system.
const MARKER_TABLE: &str = "consonants.tsv";

/// Taxonomy file, looked up in the table directory and then its parent.
const FEATURES_FILE: &str = "features.json";

/// Load a transcription system.
///
/// Search order:
/// 1. `path` argument (if provided), then its `bipa` subdirectory
/// 2. `CLTS_SYSTEM_PATH` environment variable, then its `bipa` subdirectory
/// 3. The embedded reference system
pub fn load_system(path: Option<&Path>) -> Result<TranscriptionSystem, SystemError> {
    let paths = search_paths(path);
    for dir in &paths {
        if dir.join(MARKER_TABLE).is_file() {
            return from_dir(dir);
        }
    }
    if path.is_some() {
        warn!(
            searched = ?paths,
            "no transcription system found at the given path, using the embedded one"
        );
    } else {
        debug!(searched = ?paths, "using the embedded transcription system");
    }
    bipa::bipa()
}

/// Directories searched by [`load_system`], in order.
pub fn search_paths(path: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Explicit path from argument
    if let Some(p) = path {
        paths.push(p.to_path_buf());
        paths.push(p.join(bipa::ID));
    }

    // 2. CLTS_SYSTEM_PATH environment variable
    if let Some(env_path) = std::env::var_os(SYSTEM_PATH_ENV) {
        let env_path = PathBuf::from(env_path);
        paths.push(env_path.clone());
        paths.push(env_path.join(bipa::ID));
    }

    paths
}

/// Load every table from a directory. The system is named after the
/// directory.
pub fn from_dir(dir: &Path) -> Result<TranscriptionSystem, SystemError> {
    let read = |path: PathBuf| {
        std::fs::read_to_string(&path).map_err(|source| SystemError::Io {
            path: path.display().to_string(),
            source,
        })
    };

    let features_path = [Some(dir), dir.parent()]
        .into_iter()
        .flatten()
        .map(|d| d.join(FEATURES_FILE))
        .find(|p| p.is_file())
        .unwrap_or_else(|| dir.join(FEATURES_FILE));

    let consonants = read(dir.join("consonants.tsv"))?;
    let vowels = read(dir.join("vowels.tsv"))?;
    let tones = read(dir.join("tones.tsv"))?;
    let markers = read(dir.join("markers.tsv"))?;
    let diacritics = read(dir.join("diacritics.tsv"))?;
    let normalize = read(dir.join("normalize.tsv"))?;
    let features = read(features_path)?;

    let id = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| bipa::ID.to_string());
    debug!(system = %id, dir = %dir.display(), "loading transcription system");

    TranscriptionSystem::from_sources(
        &id,
        &TableSources {
            consonants: &consonants,
            vowels: &vowels,
            tones: &tones,
            markers: &markers,
            diacritics: &diacritics,
            normalize: &normalize,
            features: &features,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_comes_first() {
        let paths = search_paths(Some(Path::new("/opt/clts")));
        assert_eq!(paths[0], PathBuf::from("/opt/clts"));
        assert_eq!(paths[1], PathBuf::from("/opt/clts/bipa"));
    }

    #[test]
    fn missing_directory_falls_back_to_embedded() {
        let ts = load_system(Some(Path::new("/nonexistent/clts-tables"))).unwrap();
        assert_eq!(ts.id(), bipa::ID);
        assert!(!ts.is_empty());
    }

    #[test]
    fn load_from_source_tree() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("bipa");
        let ts = from_dir(&dir).unwrap();
        assert_eq!(ts.id(), "bipa");
        assert_eq!(ts.len(), bipa::bipa().unwrap().len());
    }

    #[test]
    fn missing_table_is_io_error() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let err = from_dir(&dir).unwrap_err();
        assert!(matches!(err, SystemError::Io { .. }));
    }
}
