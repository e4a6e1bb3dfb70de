//! Size-bounded splitting of outbound text.
//!
//! Chunks are produced lazily. Each chunk remembers the boundary
//! character that was consumed after it, so concatenating
//! `text + separator` over all chunks reproduces the input exactly.

use std::iter::FusedIterator;

/// One piece of a split message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Chunk body, at most `max_len` bytes.
    pub text: &'a str,
    /// Boundary consumed after the body: `"\n"`, `" "`, or `""` for a hard split.
    pub separator: &'static str,
}

impl Chunk<'_> {
    /// Whether the chunk carries nothing worth sending.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Lazy chunk sequence. Cloning restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    remaining: &'a str,
    max_len: usize,
}

/// Split `text` into chunks of at most `max_len` bytes.
///
/// Prefers the last line break within the limit, then the last space,
/// then a hard split on a char boundary. A single char wider than
/// `max_len` is emitted on its own.
pub fn split(text: &str, max_len: usize) -> Chunks<'_> {
    Chunks {
        remaining: text,
        max_len,
    }
}

/// Find the largest char boundary at or below `byte_index`.
fn floor_char_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index >= s.len() {
        return s.len();
    }
    let mut i = byte_index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

impl<'a> Chunks<'a> {
    fn take(&mut self, end: usize, separator: &'static str) -> Chunk<'a> {
        let text = &self.remaining[..end];
        self.remaining = &self.remaining[end + separator.len()..];
        Chunk { text, separator }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let split_at = floor_char_boundary(self.remaining, self.max_len);
        if split_at == self.remaining.len() {
            return Some(self.take(split_at, ""));
        }

        // Force at least one char when max_len is narrower than it.
        if split_at == 0 {
            let first_char_end = self
                .remaining
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(self.remaining.len());
            return Some(self.take(first_char_end, ""));
        }

        // The byte right after the window may itself be a boundary.
        let window = &self.remaining.as_bytes()[..split_at + 1];
        if let Some(idx) = window.iter().rposition(|&b| b == b'\n') {
            return Some(self.take(idx, "\n"));
        }
        if let Some(idx) = window.iter().rposition(|&b| b == b' ') {
            return Some(self.take(idx, " "));
        }
        Some(self.take(split_at, ""))
    }
}

impl FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(text: &str, max_len: usize) -> String {
        split(text, max_len)
            .map(|c| format!("{}{}", c.text, c.separator))
            .collect()
    }

    fn texts(text: &str, max_len: usize) -> Vec<&str> {
        split(text, max_len).map(|c| c.text).collect()
    }

    #[test]
    fn test_short_message_is_one_chunk() {
        assert_eq!(texts("Hello", 100), vec!["Hello"]);
        assert_eq!(texts("exact", 5), vec!["exact"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(split("", 10).count(), 0);
    }

    #[test]
    fn test_prefers_line_breaks() {
        let chunks: Vec<_> = split("one two\nthree four", 12).collect();
        assert_eq!(chunks[0].text, "one two");
        assert_eq!(chunks[0].separator, "\n");
        assert_eq!(chunks[1].text, "three four");
    }

    #[test]
    fn test_falls_back_to_spaces() {
        assert_eq!(texts("Hello world foo bar", 11), vec!["Hello world", "foo bar"]);
    }

    #[test]
    fn test_boundary_right_after_window() {
        let chunks: Vec<_> = split("abc\ndef", 3).collect();
        assert_eq!(chunks[0].text, "abc");
        assert_eq!(chunks[0].separator, "\n");
        assert_eq!(chunks[1].text, "def");
    }

    #[test]
    fn test_hard_split_without_boundaries() {
        let chunks: Vec<_> = split("abcdefghij", 4).collect();
        assert_eq!(
            chunks.iter().map(|c| c.text).collect::<Vec<_>>(),
            vec!["abcd", "efgh", "ij"]
        );
        assert!(chunks.iter().all(|c| c.separator.is_empty()));
    }

    #[test]
    fn test_never_splits_inside_a_char() {
        // "é" is two bytes in UTF-8
        let text = "éééééé";
        for chunk in split(text, 3) {
            assert_eq!(chunk.text, "é");
        }
        assert_eq!(rejoin(text, 3), text);
    }

    #[test]
    fn test_char_wider_than_limit_is_emitted_alone() {
        // 🎉 is 4 bytes
        assert_eq!(texts("🎉🎉", 2), vec!["🎉", "🎉"]);
    }

    #[test]
    fn test_round_trip_and_bounds() {
        let inputs = [
            "Hello world foo bar",
            "line one\nline two\n\nline four with words",
            "  leading and trailing  ",
            "1.wave | 2.macarena | 3.tiktok\n4.sit | 5.shy\n",
            "привет мир, как дела? 🎉🎉 done",
            "\n\n\n",
            "nospacesatallinthisverylongword",
        ];
        for text in inputs {
            for max_len in [1, 3, 5, 8, 16, 64] {
                assert_eq!(rejoin(text, max_len), text, "max_len={}", max_len);
                for chunk in split(text, max_len) {
                    let widest_char = chunk.text.chars().map(char::len_utf8).max().unwrap_or(0);
                    assert!(chunk.text.len() <= max_len.max(widest_char));
                }
            }
        }
    }

    #[test]
    fn test_restartable() {
        let chunks = split("a b c d e f", 3);
        let first: Vec<_> = chunks.clone().collect();
        let second: Vec<_> = chunks.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_chunks() {
        let chunks: Vec<_> = split("a\n\nb", 1).collect();
        assert!(chunks.iter().any(Chunk::is_blank));
        assert_eq!(rejoin("a\n\nb", 1), "a\n\nb");
    }
}
