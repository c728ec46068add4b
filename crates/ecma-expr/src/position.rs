use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

/// Half-open byte range `[start, end)` into the source text.
///
/// Serializes as a two-element array, matching the ESTree `range` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span.
    pub const fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.start)?;
        tuple.serialize_element(&self.end)?;
        tuple.end()
    }
}

/// A line/column pair. Lines are 1-based, columns are 0-based and count Unicode scalar values,
/// not UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// Whether `c` terminates a line.
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Precomputed line starts for offset to line/column lookups.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            match c {
                '\r' => {
                    if let Some(&(next, '\n')) = chars.peek() {
                        chars.next();
                        line_starts.push(next + 1);
                    } else {
                        line_starts.push(offset + 1);
                    }
                }
                '\n' => line_starts.push(offset + 1),
                '\u{2028}' | '\u{2029}' => line_starts.push(offset + c.len_utf8()),
                _ => {}
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Line and column of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |text| text.chars().count());
        Position { line, column }
    }

    pub fn location(&self, span: Span) -> SourceLocation {
        SourceLocation {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn positions_on_first_line() {
        let index = LineIndex::new("{\"a\": 1}");
        assert_eq!(index.position(0), Position { line: 1, column: 0 });
        assert_eq!(index.position(6), Position { line: 1, column: 6 });
    }

    #[test]
    fn every_line_terminator_starts_a_line() {
        let source = "a\nb\r\nc\rd\u{2028}e\u{2029}f";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 6);
        let f = source.find('f').unwrap();
        assert_eq!(index.position(f), Position { line: 6, column: 0 });
        let c = source.find('c').unwrap();
        assert_eq!(index.position(c), Position { line: 3, column: 0 });
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let source = "\"é\" x";
        let index = LineIndex::new(source);
        let x = source.find('x').unwrap();
        assert_eq!(index.position(x), Position { line: 1, column: 4 });
    }

    #[test]
    fn offsets_past_the_end_clamp() {
        let index = LineIndex::new("ab\n");
        assert_eq!(index.position(99), Position { line: 2, column: 0 });
    }

    #[test]
    fn span_contains_is_half_open() {
        let span = Span::new(2, 4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(3));
        assert!(!span.contains(4));
        assert_eq!(span.len(), 2);
    }
}
