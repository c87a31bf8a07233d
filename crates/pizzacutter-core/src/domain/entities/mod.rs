pub mod build_config;
pub mod build_report;
pub mod common;
pub mod pattern_store;

pub use crate::domain::DomainError;
pub use build_config::{BuildConfig, BuildHooks, NoHooks};
pub use build_report::{AuditRecord, BuildReport, SkipCounts};
pub use pattern_store::{RawPatterns, ResolvedPatterns};
