// Longest-match trie over grapheme strings
//
// Built once when a transcription system is loaded and never modified
// afterwards. Keys are matched character by character; at every position the
// longest key wins, so longer graphemes shadow their prefixes (`tʃ` over `t`).

use hashbrown::HashMap;

/// A matched key: character span `[start, end)` and the key's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<T> {
    pub start: usize,
    pub end: usize,
    pub value: T,
}

#[derive(Debug, Clone)]
struct Node<T> {
    edges: HashMap<char, u32>,
    value: Option<T>,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self {
            edges: HashMap::new(),
            value: None,
        }
    }
}

/// Arena-allocated character trie.
#[derive(Debug, Clone)]
pub struct Matcher<T> {
    nodes: Vec<Node<T>>,
    len: usize,
}

impl<T: Copy> Default for Matcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Matcher<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            len: 0,
        }
    }

    /// Insert a key. Returns the previous payload if the key was present.
    /// The empty key is ignored.
    pub fn insert(&mut self, key: &str, value: T) -> Option<T> {
        if key.is_empty() {
            return None;
        }
        let mut node = 0usize;
        for c in key.chars() {
            node = match self.nodes[node].edges.get(&c) {
                Some(&next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[node].edges.insert(c, next as u32);
                    next
                }
            };
        }
        let previous = self.nodes[node].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Longest key starting at `pos`, as `(end, value)`.
    pub fn longest_at(&self, chars: &[char], pos: usize) -> Option<(usize, T)> {
        let mut node = 0usize;
        let mut best = None;
        for (i, c) in chars.iter().enumerate().skip(pos) {
            match self.nodes[node].edges.get(c) {
                Some(&next) => node = next as usize,
                None => break,
            }
            if let Some(value) = self.nodes[node].value {
                best = Some((i + 1, value));
            }
        }
        best
    }

    /// Non-overlapping matches scanning left to right; at each position the
    /// longest key is taken and scanning resumes after it. Positions where no
    /// key starts are skipped.
    pub fn find_all(&self, chars: &[char]) -> Vec<Span<T>> {
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            match self.longest_at(chars, pos) {
                Some((end, value)) => {
                    spans.push(Span {
                        start: pos,
                        end,
                        value,
                    });
                    pos = end;
                }
                None => pos += 1,
            }
        }
        spans
    }

    /// Greedy segmentation of the whole input into keys. Returns `None` if
    /// some position cannot be matched.
    pub fn segment(&self, chars: &[char]) -> Option<Vec<Span<T>>> {
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            let (end, value) = self.longest_at(chars, pos)?;
            spans.push(Span {
                start: pos,
                end,
                value,
            });
            pos = end;
        }
        Some(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn matcher(keys: &[&str]) -> Matcher<usize> {
        let mut m = Matcher::new();
        for (i, k) in keys.iter().enumerate() {
            m.insert(k, i);
        }
        m
    }

    #[test]
    fn longest_key_wins() {
        let m = matcher(&["t", "t\u{0283}", "s"]);
        let input = chars("t\u{0283}a");
        assert_eq!(m.longest_at(&input, 0), Some((2, 1)));
        assert_eq!(m.longest_at(&input, 2), None);
    }

    #[test]
    fn falls_back_to_shorter_prefix() {
        let m = matcher(&["t", "tsh"]);
        assert_eq!(m.longest_at(&chars("tsa"), 0), Some((1, 0)));
    }

    #[test]
    fn find_all_skips_unmatched() {
        let m = matcher(&["t", "k", "a"]);
        let spans = m.find_all(&chars("xtʰka"));
        let starts: Vec<usize> = spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![1, 3, 4]);
        assert_eq!(spans[1].value, 1);
    }

    #[test]
    fn segment_requires_full_cover() {
        let m = matcher(&["\u{02B0}", "\u{02B7}"]);
        let spans = m.segment(&chars("\u{02B7}\u{02B0}")).unwrap();
        assert_eq!(spans.len(), 2);
        assert!(m.segment(&chars("\u{02B7}x")).is_none());
        assert_eq!(m.segment(&[]), Some(vec![]));
    }

    #[test]
    fn reinsert_replaces_value() {
        let mut m = Matcher::new();
        assert_eq!(m.insert("a", 1), None);
        assert_eq!(m.insert("a", 2), Some(1));
        assert_eq!(m.insert("", 3), None);
        assert_eq!(m.len(), 1);
        assert_eq!(m.longest_at(&chars("a"), 0), Some((1, 2)));
    }
}
