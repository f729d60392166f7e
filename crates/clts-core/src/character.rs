// Placeholder characters and Unicode helpers shared by all transcription systems

use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Reserved characters and tokens
// ---------------------------------------------------------------------------

/// Dotted circle marking the position of the base sound in a diacritic
/// fragment (`◌ʰ`, `ʰ◌`). It never appears in a resolved grapheme.
pub const EMPTY: char = '\u{25CC}';

/// Separator between an ignored source spelling and the literal target
/// (`source/target`).
pub const OVERRIDE_SEPARATOR: char = '/';

/// Emitted in place of the base grapheme when no registered sound can serve
/// as the base of a generated sound.
pub const UNKNOWN_BASE: &str = "<?>";

/// Emitted in place of a diacritic when a feature value has no rendering.
pub const UNRESOLVED: &str = "<!>";

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

/// Canonical decomposition (NFD) of a string.
///
/// Every table cell and every parser input passes through this function, so
/// combining marks are compared in canonical order.
pub fn nfd(text: &str) -> String {
    text.nfd().collect()
}

/// Remove every base placeholder (`◌`) from a string.
pub fn strip_placeholder(text: &str) -> String {
    text.chars().filter(|&c| c != EMPTY).collect()
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Unicode code points of a string as `U+xxxx` tokens, separated by spaces.
///
/// Hex digits are lower-case and padded to four digits.
pub fn codepoints(text: &str) -> String {
    text.chars()
        .map(|c| format!("U+{:04x}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every character of a string attached to the base placeholder, separated
/// by spaces (`"tʰ"` becomes `"◌t ◌ʰ"`).
pub fn symbols(text: &str) -> String {
    text.chars()
        .map(|c| format!("{EMPTY}{c}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nfd_decomposes_precomposed_vowels() {
        assert_eq!(nfd("\u{00E1}"), "a\u{0301}"); // á
        assert_eq!(nfd("\u{00E4}"), "a\u{0308}"); // ä
        assert_eq!(nfd("a"), "a");
    }

    #[test]
    fn nfd_reorders_combining_marks() {
        // ring below (220) sorts before tilde above (230)
        assert_eq!(nfd("a\u{0303}\u{0325}"), "a\u{0325}\u{0303}");
    }

    #[test]
    fn strip_placeholder_removes_all_circles() {
        assert_eq!(strip_placeholder("\u{25CC}\u{02B0}"), "\u{02B0}");
        assert_eq!(strip_placeholder("\u{02B0}\u{25CC}"), "\u{02B0}");
        assert_eq!(strip_placeholder("t"), "t");
    }

    #[test]
    fn codepoints_are_lower_hex() {
        assert_eq!(codepoints("d\u{02B7}\u{02B1}"), "U+0064 U+02b7 U+02b1");
        assert_eq!(codepoints(""), "");
    }

    #[test]
    fn symbols_prefix_each_char() {
        assert_eq!(symbols("t\u{02B0}"), "\u{25CC}t \u{25CC}\u{02B0}");
    }
}
