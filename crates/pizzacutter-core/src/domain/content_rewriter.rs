//! Line-oriented placeholder substitution over raw bytes.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{
        common::{contains_bytes, display_fragment, replace_bytes},
        pattern_store::ResolvedPatterns,
    },
    error::DomainError,
    value_objects::{OPEN_DELIMITER, OptionMarkers, OptionRole},
};

/// Suffix of the scratch file a target is rewritten into before the swap.
pub const TEMP_SUFFIX: &str = ".PizzaCutter_Temp";

/// Path of the scratch file for `target`.
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    target.with_file_name(name)
}

/// Per-stream line counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub lines: usize,
    pub lines_changed: usize,
    pub lines_deleted: usize,
}

pub struct ContentRewriter<'a> {
    patterns: &'a ResolvedPatterns,
    markers: &'a OptionMarkers,
    /// Display strings of path patterns, computed once.
    path_texts: Vec<(&'a [u8], String)>,
}

impl<'a> ContentRewriter<'a> {
    pub fn new(patterns: &'a ResolvedPatterns, markers: &'a OptionMarkers) -> Self {
        let path_texts = patterns
            .path_patterns()
            .map(|(token, fragment)| (token.as_bytes(), display_fragment(fragment)))
            .collect();
        Self {
            patterns,
            markers,
            path_texts,
        }
    }

    /// Rewrite one line, terminator included.
    ///
    /// Lines without `{{` come back unchanged. An empty result means the line
    /// was deleted.
    pub fn rewrite_line(&self, line: &[u8]) -> Vec<u8> {
        if !contains_bytes(line, OPEN_DELIMITER.as_bytes()) {
            return line.to_vec();
        }

        let mut line = line.to_vec();
        for (token, value) in self.patterns.text_patterns() {
            if contains_bytes(&line, token.as_bytes()) {
                line = replace_bytes(&line, token.as_bytes(), value.as_bytes());
            }
        }
        for (token, text) in &self.path_texts {
            if contains_bytes(&line, token) {
                line = replace_bytes(&line, token, text.as_bytes());
            }
        }
        for (role, marker) in self.markers.iter() {
            if marker.is_empty() || !contains_bytes(&line, marker.as_bytes()) {
                continue;
            }
            line = replace_bytes(&line, marker.as_bytes(), b"");
            if role == OptionRole::DeleteLineIfEmpty && line.trim_ascii().is_empty() {
                line.clear();
            }
        }
        line
    }

    /// Rewrite `reader` into `writer` line by line. The last line may lack a
    /// terminator and is written back the same way.
    pub fn rewrite_stream<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> io::Result<RewriteStats> {
        let mut stats = RewriteStats::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines += 1;
            let out = self.rewrite_line(&buf);
            if out.is_empty() {
                stats.lines_deleted += 1;
            } else if out != buf {
                stats.lines_changed += 1;
            }
            writer.write_all(&out)?;
        }
        writer.flush()?;
        Ok(stats)
    }
}

/// Stack of files currently being rewritten.
///
/// Reserved for file inclusion: entering a file that is already on the stack
/// is an error.
#[derive(Debug, Default)]
pub struct IncludeGuard {
    stack: Vec<PathBuf>,
}

impl IncludeGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, path: &Path) -> Result<(), DomainError> {
        if self.stack.iter().any(|p| p == path) {
            return Err(DomainError::RecursionOnInclude {
                path: path.display().to_string(),
                stack: self
                    .stack
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            });
        }
        self.stack.push(path.to_path_buf());
        Ok(())
    }

    pub fn leave(&mut self) -> Option<PathBuf> {
        self.stack.pop()
    }
}
