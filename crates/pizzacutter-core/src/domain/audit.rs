//! Post-build scan for placeholders nobody filled in.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::domain::{
    entities::common::{find_all_bytes, find_bytes},
    value_objects::{CLOSE_DELIMITER, OPEN_DELIMITER},
};

/// Bytes inspected after each prefix hit.
pub const AUDIT_WINDOW: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    UnfilledPattern { pattern: String },
    MissingClosingDelimiter { fragment: String },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnfilledPattern { pattern } => write!(f, "unfilled pattern \"{pattern}\""),
            Self::MissingClosingDelimiter { fragment } => {
                write!(f, "missing closing brackets for \"{fragment}\"")
            }
        }
    }
}

pub struct Auditor<'a> {
    prefixes: &'a [String],
}

impl<'a> Auditor<'a> {
    pub fn new(prefixes: &'a [String]) -> Self {
        Self { prefixes }
    }

    pub fn scan_path(&self, path: &Path) -> Vec<AuditFinding> {
        let text = path.to_string_lossy();
        let bytes = text.as_bytes();
        let mut findings = Vec::new();

        for prefix in self.active_prefixes() {
            for pos in find_all_bytes(bytes, prefix.as_bytes()) {
                let window = window_at(bytes, pos);
                let finding = match find_bytes(window, CLOSE_DELIMITER.as_bytes()) {
                    Some(end) => AuditFinding::UnfilledPattern {
                        pattern: lossy(&window[..end + CLOSE_DELIMITER.len()]),
                    },
                    None => AuditFinding::MissingClosingDelimiter {
                        fragment: prefix.clone(),
                    },
                };
                findings.push(finding);
            }
        }
        findings
    }

    pub fn scan_content(&self, content: &[u8]) -> Vec<AuditFinding> {
        let mut findings = Vec::new();

        for prefix in self.active_prefixes() {
            for pos in find_all_bytes(content, prefix.as_bytes()) {
                let mut window = window_at(content, pos);
                if let Some(newline) = window.iter().position(|&b| b == b'\n') {
                    window = &window[..newline];
                }
                let finding = match find_bytes(window, CLOSE_DELIMITER.as_bytes()) {
                    Some(end) => AuditFinding::UnfilledPattern {
                        pattern: lossy(&window[..end + CLOSE_DELIMITER.len()]),
                    },
                    None => AuditFinding::MissingClosingDelimiter {
                        fragment: unclosed_fragment(window),
                    },
                };
                findings.push(finding);
            }
        }
        findings
    }

    fn active_prefixes(&self) -> impl Iterator<Item = &String> {
        self.prefixes.iter().filter(|p| !p.is_empty())
    }
}

fn window_at(bytes: &[u8], pos: usize) -> &[u8] {
    let end = bytes.len().min(pos + AUDIT_WINDOW);
    &bytes[pos..end]
}

/// `{{` plus the text up to the next `{{` or `}`.
fn unclosed_fragment(window: &[u8]) -> String {
    let body = window.get(OPEN_DELIMITER.len()..).unwrap_or_default();
    let body = match find_bytes(body, OPEN_DELIMITER.as_bytes()) {
        Some(next) => &body[..next],
        None => body,
    };
    let body = match body.iter().position(|&b| b == b'}') {
        Some(close) => &body[..close],
        None => body,
    };
    format!("{OPEN_DELIMITER}{}", lossy(body))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn path_reports_each_unfilled_pattern() {
        let prefixes = prefixes(&["{{TestPizzaCutter"]);
        let auditor = Auditor::new(&prefixes);
        let findings = auditor.scan_path(Path::new(
            "/out/some_file{{TestPizzaCutter}}{{TestPizzaCutter.some.pattern}}xy",
        ));
        assert_eq!(
            findings,
            vec![
                AuditFinding::UnfilledPattern {
                    pattern: "{{TestPizzaCutter}}".into()
                },
                AuditFinding::UnfilledPattern {
                    pattern: "{{TestPizzaCutter.some.pattern}}".into()
                },
            ]
        );
    }

    #[test]
    fn path_without_close_reports_prefix() {
        let prefixes = prefixes(&["{{TestPizzaCutter"]);
        let auditor = Auditor::new(&prefixes);
        let findings = auditor.scan_path(Path::new("/out/file{{TestPizzaCutter.open"));
        assert_eq!(
            findings,
            vec![AuditFinding::MissingClosingDelimiter {
                fragment: "{{TestPizzaCutter".into()
            }]
        );
        assert_eq!(
            findings[0].to_string(),
            "missing closing brackets for \"{{TestPizzaCutter\""
        );
    }

    #[test]
    fn content_close_on_next_line_is_missing() {
        let prefixes = prefixes(&["{{TestPizzaCutter"]);
        let auditor = Auditor::new(&prefixes);
        let content = b"x {{TestPizzaCutter.missing_brackets\n}}\n";
        assert_eq!(
            auditor.scan_content(content),
            vec![AuditFinding::MissingClosingDelimiter {
                fragment: "{{TestPizzaCutter.missing_brackets".into()
            }]
        );
    }

    #[test]
    fn content_fragment_stops_at_next_open_or_brace() {
        let prefixes = prefixes(&["{{P"]);
        let auditor = Auditor::new(&prefixes);
        assert_eq!(
            auditor.scan_content(b"{{P.a {{other\n"),
            vec![AuditFinding::MissingClosingDelimiter {
                fragment: "{{P.a ".into()
            }]
        );
        assert_eq!(
            auditor.scan_content(b"{{P.b} tail\n"),
            vec![AuditFinding::MissingClosingDelimiter {
                fragment: "{{P.b".into()
            }]
        );
    }

    #[test]
    fn content_reports_filled_and_leftover_patterns() {
        let prefixes = prefixes(&["{{PizzaCutter"]);
        let auditor = Auditor::new(&prefixes);
        let findings = auditor.scan_content(b"done\nname = {{PizzaCutter.name}}\n");
        assert_eq!(
            findings,
            vec![AuditFinding::UnfilledPattern {
                pattern: "{{PizzaCutter.name}}".into()
            }]
        );
    }

    #[test]
    fn close_beyond_window_is_missing() {
        let prefixes = prefixes(&["{{P"]);
        let auditor = Auditor::new(&prefixes);
        let mut content = b"{{P".to_vec();
        content.extend(std::iter::repeat_n(b'x', AUDIT_WINDOW));
        content.extend_from_slice(b"}}");
        assert!(matches!(
            auditor.scan_content(&content)[..],
            [AuditFinding::MissingClosingDelimiter { .. }]
        ));
    }

    #[test]
    fn empty_prefix_is_ignored() {
        let prefixes = prefixes(&[""]);
        assert!(Auditor::new(&prefixes).scan_content(b"{{x}}").is_empty());
    }
}
