// Lookup surface: name-or-grapheme queries, sequences and translation

use clts_core::{Sound, SoundType};

use crate::NameError;
use crate::system::TranscriptionSystem;

/// Placeholder written by [`TranscriptionSystem::translate`] for sounds the
/// target system cannot spell.
pub const MISSING: &str = "?";

/// Whether a query is a sound name rather than a transcription: some
/// whitespace-separated token is a sound-class word.
pub fn is_name(query: &str) -> bool {
    query.split_whitespace().any(|token| {
        SoundType::from_tag(token).is_some_and(|t| t != SoundType::Unknown)
    })
}

impl TranscriptionSystem {
    /// Resolve a name through the name parser and anything else through the
    /// grapheme parser.
    pub fn lookup(&self, query: &str) -> Result<Sound, NameError> {
        if is_name(query) {
            self.from_name(query)
        } else {
            Ok(self.resolve(query))
        }
    }

    /// Like [`lookup`](Self::lookup), but `None` for unknown sounds and name
    /// errors.
    pub fn get(&self, query: &str) -> Option<Sound> {
        self.lookup(query).ok().filter(|s| !s.is_unknown())
    }

    /// Like [`get`](Self::get), substituting `default` on failure.
    pub fn get_or(&self, query: &str, default: Sound) -> Sound {
        self.get(query).unwrap_or(default)
    }

    /// Parse a whitespace-separated sequence of transcriptions.
    pub fn resolve_all(&self, text: &str) -> Vec<Sound> {
        text.split_whitespace().map(|token| self.resolve(token)).collect()
    }

    /// Respell a whitespace-separated sequence in another system. Each token
    /// is resolved here, looked up by name in `target` and written in the
    /// target's canonical spelling, or as [`MISSING`].
    pub fn translate(&self, text: &str, target: &TranscriptionSystem) -> String {
        text.split_whitespace()
            .map(|token| {
                self.resolve(token)
                    .name()
                    .and_then(|name| target.get(&name))
                    .map_or_else(|| MISSING.to_string(), |sound| target.canonical(&sound))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether a sound survives both directions unchanged: its name and its
    /// canonical spelling denote the same sound with the same spelling.
    /// Stress is not part of a name and is ignored. Markers and unknown
    /// sounds are never valid.
    pub fn is_valid(&self, sound: &Sound) -> bool {
        if matches!(sound, Sound::Marker(_) | Sound::Unknown(_)) {
            return false;
        }
        let sound = &unstressed(sound);
        let Some(name) = sound.name() else {
            return false;
        };
        let Ok(by_name) = self.from_name(&name) else {
            return false;
        };
        let by_spelling = self.resolve(&self.canonical(sound));
        by_name.name() == by_spelling.name() && self.canonical(&by_name) == self.canonical(&by_spelling)
    }
}

fn unstressed(sound: &Sound) -> Sound {
    let mut sound = sound.clone();
    if let Some((_, segment)) = sound.segment_mut() {
        segment.stress = None;
    }
    if let Sound::Diphthong(c) | Sound::Cluster(c) = &mut sound {
        c.stress = None;
        c.from.stress = None;
        c.to.stress = None;
    }
    sound
}
