//! Maps a template source path to its target path.

use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::domain::{
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    entities::{common::normalize_lexically, pattern_store::ResolvedPatterns},
    error::DomainError,
    value_objects::OptionMarkers,
};

/// Result of rewriting one source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenPath {
    pub path: PathBuf,
    /// An absolute path pattern replaced the target root.
    pub absolute_override: bool,
}

/// Pure path rewriting over resolved patterns, option markers and the two roots.
pub struct PathRewriter<'a> {
    patterns: &'a ResolvedPatterns,
    markers: &'a OptionMarkers,
    template_root: &'a Path,
    target_root: &'a Path,
}

impl<'a> PathRewriter<'a> {
    pub fn new(
        patterns: &'a ResolvedPatterns,
        markers: &'a OptionMarkers,
        template_root: &'a Path,
        target_root: &'a Path,
    ) -> Self {
        Self {
            patterns,
            markers,
            template_root,
            target_root,
        }
    }

    /// Compute the target path for `source`.
    ///
    /// Runs text substitution, option-marker stripping and path-fragment
    /// substitution segment by segment, then remaps the root. Warnings go to
    /// `diagnostics`.
    pub fn target_path_for(
        &self,
        source: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<RewrittenPath, DomainError> {
        let relative =
            source
                .strip_prefix(self.template_root)
                .map_err(|_| DomainError::SourceOutsideTemplate {
                    path: source.display().to_string(),
                    template_root: self.template_root.display().to_string(),
                })?;

        let mut segments = Vec::new();
        for segment in split_segments(relative) {
            let substituted = self.substitute_text(&segment);
            if substituted.is_empty() {
                diagnostics.push(Diagnostic::debug(
                    DiagnosticKind::EmptySegmentDropped,
                    source,
                    format!("segment \"{segment}\" is empty after substitution and was dropped"),
                ));
                continue;
            }
            segments.push(self.strip_markers(substituted, source)?);
        }

        let (rewritten, absolute_override) =
            self.substitute_paths(&segments, source, diagnostics)?;

        let path = if absolute_override {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::AbsolutePathOverride,
                source,
                format!(
                    "absolute path pattern overrides the target root, writing to {}",
                    rewritten.display()
                ),
            ));
            normalize_lexically(&rewritten)
        } else {
            normalize_lexically(&self.target_root.join(rewritten))
        };

        trace!(source = %source.display(), target = %path.display(), "path rewritten");
        Ok(RewrittenPath {
            path,
            absolute_override,
        })
    }

    fn substitute_text(&self, segment: &str) -> String {
        self.patterns
            .text_patterns()
            .fold(segment.to_string(), |acc, (token, value)| {
                acc.replace(token.as_str(), value)
            })
    }

    fn strip_markers(&self, segment: String, source: &Path) -> Result<String, DomainError> {
        let stripped = self
            .markers
            .iter()
            .filter(|(_, marker)| !marker.is_empty())
            .fold(segment, |acc, (_, marker)| acc.replace(marker, ""));
        if stripped.is_empty() {
            return Err(DomainError::MalformedPathSegment {
                path: source.display().to_string(),
            });
        }
        Ok(stripped)
    }

    /// Right-to-left scan. Once an absolute fragment is folded in, everything
    /// further left is discarded; partial matches there still fail.
    fn substitute_paths(
        &self,
        segments: &[String],
        source: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<(PathBuf, bool), DomainError> {
        let mut parts: Vec<PathBuf> = Vec::with_capacity(segments.len());
        let mut absolute_found = false;

        for segment in segments.iter().rev() {
            let mut replacement = None;
            for (token, fragment) in self.patterns.path_patterns() {
                if !segment.contains(token.as_str()) {
                    continue;
                }
                if segment != token.as_str() {
                    return Err(DomainError::PathPatternNotWholeSegment {
                        path: source.display().to_string(),
                        pattern: token.to_string(),
                    });
                }
                replacement = Some(fragment);
            }

            if absolute_found {
                if replacement.is_some_and(Path::is_absolute) {
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::MultipleAbsolutePaths,
                        source,
                        "more than one absolute path pattern, the rightmost one wins",
                    ));
                }
                continue;
            }

            match replacement {
                Some(fragment) => {
                    absolute_found = fragment.is_absolute();
                    parts.push(fragment.to_path_buf());
                }
                None => parts.push(PathBuf::from(segment)),
            }
        }

        Ok((parts.iter().rev().collect(), absolute_found))
    }
}

fn split_segments(relative: &Path) -> Vec<String> {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect()
}
