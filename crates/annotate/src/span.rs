use serde::{Deserialize, Serialize};

/// Half-open `[begin, end)` interval of character offsets.
///
/// Serialized as a two element array, the way the benchmark files store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span(pub usize, pub usize);

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self(begin, end)
    }

    pub fn begin(&self) -> usize {
        self.0
    }

    pub fn end(&self) -> usize {
        self.1
    }
}

/// Maps character offsets to byte offsets of one text.
pub struct CharMap {
    offsets: Vec<usize>,
}

impl CharMap {
    pub fn new(text: &str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        offsets.push(text.len());
        Self { offsets }
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn byte(&self, char_idx: usize) -> Option<usize> {
        self.offsets.get(char_idx).copied()
    }

    /// Byte range of `span`, or `None` when it is inverted or out of bounds.
    pub fn byte_range(&self, span: Span) -> Option<(usize, usize)> {
        if span.begin() > span.end() {
            return None;
        }
        Some((self.byte(span.begin())?, self.byte(span.end())?))
    }

    pub fn slice<'a>(&self, text: &'a str, span: Span) -> Option<&'a str> {
        let (begin, end) = self.byte_range(span)?;
        text.get(begin..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_serializes_as_pair() {
        let span: Span = serde_json::from_str("[3, 7]").unwrap();
        assert_eq!(span, Span::new(3, 7));
        assert_eq!(serde_json::to_string(&span).unwrap(), "[3,7]");
    }

    #[test]
    fn test_char_offsets_handle_multibyte_text() {
        let text = "Zürich is in Schweiz";
        let map = CharMap::new(text);

        assert_eq!(map.char_len(), 20);
        assert_eq!(map.slice(text, Span::new(0, 6)), Some("Zürich"));
        assert_eq!(map.slice(text, Span::new(13, 20)), Some("Schweiz"));
        assert_eq!(map.slice(text, Span::new(13, 21)), None);
        assert_eq!(map.slice(text, Span::new(6, 2)), None);
    }
}
