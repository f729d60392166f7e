// Grapheme parser: free-form transcription to a typed sound
//
// Parsing never fails. Input that cannot be segmented, or whose diacritics
// cannot be attributed to a base sound, comes back as `Sound::Unknown`.
//
// 1. Normalize: NFD, keep the text after the last `/`, drop `◌`, apply the
//    character table.
// 2. Direct hit in the registry.
// 3. Segment with the base matcher. One base: resolve the diacritics around
//    it. Two bases: resolve both halves and try to combine them; if the pair
//    is rejected, retry with the second base alone. Anything else is
//    unknown.

use tracing::trace;

use clts_core::character::{self, OVERRIDE_SEPARATOR};
use clts_core::{Feature, Sound};

use crate::diacritics::Position;
use crate::matcher::Span;
use crate::system::TranscriptionSystem;

impl TranscriptionSystem {
    /// Parse a transcription into a sound.
    pub fn resolve(&self, input: &str) -> Sound {
        let (text, normalized) = self.prepare(input);
        self.parse(input, &text, normalized)
    }

    /// Normalized form of an input and whether it differs from the input.
    fn prepare(&self, input: &str) -> (String, bool) {
        let decomposed = character::nfd(input);
        let target = match decomposed.rfind(OVERRIDE_SEPARATOR) {
            Some(i) => &decomposed[i + OVERRIDE_SEPARATOR.len_utf8()..],
            None => decomposed.as_str(),
        };
        let text = self.map_chars(&character::strip_placeholder(target));
        let normalized = text != decomposed;
        (text, normalized)
    }

    fn parse(&self, source: &str, text: &str, normalized: bool) -> Sound {
        if text.is_empty() {
            return self.unknown(source, text, "empty input");
        }

        if let Some(sound) = self.sound(text) {
            let mut sound = sound.clone();
            sound.set_source(source);
            if let Some((_, segment)) = sound.segment_mut() {
                segment.normalized = normalized;
            }
            return sound;
        }

        let chars: Vec<char> = text.chars().collect();
        let spans = self.bases.find_all(&chars);
        match spans.as_slice() {
            [base] => self
                .decorate(source, &chars, *base, normalized)
                .unwrap_or_else(|| self.unknown(source, text, "unresolved diacritics")),
            [_, second] => self
                .bisegmental(source, &chars, second.start)
                .or_else(|| self.decorate(source, &chars, *second, normalized))
                .unwrap_or_else(|| self.unknown(source, text, "no admissible segmentation")),
            [] => self.unknown(source, text, "no base sound"),
            _ => self.unknown(source, text, "too many base sounds"),
        }
    }

    fn unknown(&self, source: &str, text: &str, reason: &str) -> Sound {
        trace!(system = self.id(), source, text, reason, "unknown sound");
        Sound::unknown(text, source)
    }

    /// Attach the diacritics around `span` to the base sound it matched.
    fn decorate(&self, source: &str, chars: &[char], span: Span<u32>, normalized: bool) -> Option<Sound> {
        let base = &self.sounds[span.value as usize];
        let (kind, base_segment) = base.segment()?;

        let pre = self.diacritics.resolve(kind, Position::Pre, &chars[..span.start])?;
        let post = self.diacritics.resolve(kind, Position::Post, &chars[span.end..])?;

        let mut segment = base_segment.clone();
        segment.grapheme = chars.iter().collect();
        segment.generated = true;
        segment.normalized = normalized;
        segment.base = Some(base_segment.grapheme.clone());
        segment.source = Some(source.to_string());
        segment.note = None;

        let base_canonical = self.canonical(base);
        let mut corrected = String::new();
        for d in &pre {
            corrected.push_str(&d.canonical);
        }
        corrected.push_str(&base_canonical);
        for d in &post {
            corrected.push_str(&d.canonical);
        }

        for d in pre.iter().chain(&post) {
            if d.feature == Feature::Stress {
                segment.stress = Some(d.value.clone());
            } else {
                segment.set(d.feature, d.value.clone());
            }
        }

        let literal_differs = segment.grapheme != corrected;
        let mut sound = Sound::from_segment(kind, segment);
        let rendered = self.canonical(&sound);
        if literal_differs || rendered != corrected {
            if let Some((_, segment)) = sound.segment_mut() {
                segment.alias = true;
            }
        }
        Some(sound)
    }

    /// Resolve both halves of a two-base input and combine them.
    fn bisegmental(&self, source: &str, chars: &[char], split: usize) -> Option<Sound> {
        let left: String = chars[..split].iter().collect();
        let right: String = chars[split..].iter().collect();
        let first = self.parse(&left, &left, false);
        let second = self.parse(&right, &right, false);
        if first.is_unknown() || second.is_unknown() {
            return None;
        }
        let combined = self.combine(first, second, source);
        if combined.is_none() {
            trace!(system = self.id(), source, %left, %right, "rejected bisegmental pair");
        }
        combined
    }
}
