//! Text emission helpers for generated VHDL.

use std::fs;
use std::path::Path;

use crate::error::GenerateError;

/// Width of the `=` rules framing header blocks.
const RULE_WIDTH: usize = 50;

/// Line-oriented buffer for a VHDL source file.
#[derive(Debug, Default)]
pub struct VhdlFile {
    /// Accumulated text.
    pub buf: String,
}

impl VhdlFile {
    /// Starts a file with a framed header block, one comment line per entry.
    /// An empty entry renders as a thin `-` rule.
    pub fn new(header: &[String]) -> Self {
        let mut f = Self::default();
        f.rule('=');
        for line in header {
            if line.is_empty() {
                f.rule('-');
            } else {
                f.comment(line);
            }
        }
        f.rule('=');
        f
    }

    /// Appends one line.
    pub fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends a `-- ` comment line.
    pub fn comment(&mut self, text: &str) {
        self.buf.push_str("-- ");
        self.line(text);
    }

    /// Appends a `-- ====…` style rule built from `ch`.
    pub fn rule(&mut self, ch: char) {
        let rule: String = std::iter::repeat(ch).take(RULE_WIDTH).collect();
        self.comment(&rule);
    }

    /// Appends a section banner: rule, title, rule.
    pub fn section(&mut self, title: &str) {
        self.rule('-');
        self.comment(title);
        self.rule('-');
    }

    /// Returns the text without a trailing newline.
    pub fn finish(mut self) -> String {
        while self.buf.ends_with('\n') {
            self.buf.pop();
        }
        self.buf
    }
}

/// Writes `content` to `path` via a sibling temporary file, so a failed write
/// never leaves a truncated artifact at `path`.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the file cannot be written or moved into
/// place.
pub fn write_file(path: &Path, content: &str) -> Result<(), GenerateError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    let result = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = result {
        // Best effort: the temporary may not exist if creation itself failed.
        let _ = fs::remove_file(&tmp);
        return Err(GenerateError::io(path, source));
    }
    Ok(())
}
