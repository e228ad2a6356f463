/// Line and column position (1-indexed for display).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A named source text with line mapping.
#[derive(Clone, Debug)]
pub struct SourceMap {
    name: String,
    source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = Self::compute_line_starts(&source);
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    fn compute_line_starts(source: &str) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in source.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Convert a byte offset to line/column (1-indexed).
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to it.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let col = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        LineCol::new(line_idx + 1, col + 1)
    }

    /// Text of a line (1-indexed), without the trailing newline.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let line_idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = match self.line_starts.get(line_idx + 1) {
            Some(next) => next - 1,
            None => self.source.len(),
        };
        self.source
            .get(start..end)
            .map(|text| text.strip_suffix('\r').unwrap_or(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_empty_file() {
        let file = SourceMap::new("test", "");
        assert_eq!(file.line_col(0), LineCol::new(1, 1));
    }

    #[test]
    fn line_col_multiple_lines() {
        let file = SourceMap::new("test", "abc\ndef\nghi");
        assert_eq!(file.line_col(0), LineCol::new(1, 1));
        assert_eq!(file.line_col(3), LineCol::new(1, 4));
        assert_eq!(file.line_col(4), LineCol::new(2, 1));
        assert_eq!(file.line_col(10), LineCol::new(3, 3));
        assert_eq!(file.line_col(99), LineCol::new(3, 4));
    }

    #[test]
    fn line_col_counts_characters() {
        let file = SourceMap::new("test", "// é\nlet é = 1");
        assert_eq!(file.line_col(10), LineCol::new(2, 5));
    }

    #[test]
    fn line_text() {
        let file = SourceMap::new("test", "first\r\nsecond\n");
        assert_eq!(file.line_text(1), Some("first"));
        assert_eq!(file.line_text(2), Some("second"));
        assert_eq!(file.line_text(3), Some(""));
        assert_eq!(file.line_text(4), None);
        assert_eq!(file.line_text(0), None);
    }
}
