use std::{fmt::Display, path::PathBuf, sync::Arc};

/// Byte offset into a source file.
pub type Cursor1 = usize;

/// Line and column, both starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor2 {
    pub line: usize,
    pub column: usize,
}

impl Display for Cursor2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Cursor2 { line, column } = self;
        write!(f, "{line}:{column}",)
    }
}

/// Line table for a source file, used to turn byte offsets into [`Cursor2`].
#[derive(Clone, Debug)]
pub struct FileInfo {
    /// offsets of the first byte of every line
    line_starts: Vec<Cursor1>,
    len: usize,
    path: Option<Arc<PathBuf>>,
}

impl FileInfo {
    pub fn new(s: &str, path: Option<Arc<PathBuf>>) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in s.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        FileInfo { line_starts, len: s.len(), path }
    }
    pub fn trans_span2(&self, offset: Cursor1) -> Cursor2 {
        let offset = offset.min(self.len);
        // index of the last line start that is <= offset
        let idx = self.line_starts.partition_point(|start| *start <= offset) - 1;
        Cursor2 { line: idx + 1, column: offset - self.line_starts[idx] + 1 }
    }
    pub fn path(&self) -> PathBuf {
        self.path.as_ref().map(|p| p.to_path_buf()).unwrap_or_default()
    }
}
