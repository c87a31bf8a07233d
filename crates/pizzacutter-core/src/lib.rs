//! PizzaCutter Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for PizzaCutter,
//! which creates and updates projects from directory templates, following
//! hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         pizzacutter-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │             (BuildService)              │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │           (Driven: Filesystem)          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   pizzacutter-adapters (Infrastructure) │
//! │ (LocalFilesystem, MemoryFilesystem,     │
//! │  ConfigLoader)                          │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Resolver, PathRewriter, ContentRewriter│
//! │  CopyPolicy, Auditor)                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pizzacutter_core::prelude::*;
//!
//! # fn run(filesystem: Box<dyn Filesystem>) -> CutterResult<()> {
//! // 1. Describe the build
//! let mut config = BuildConfig::new("/templates/lib", "/work/my_lib")
//!     .with_text("{{PizzaCutter.project_dir}}", "my_lib")
//!     .allow_overwrite(true);
//!
//! // 2. Use application service (with injected adapters)
//! let service = BuildService::new(filesystem);
//! let report = service.build(&mut config, &mut NoHooks)?;
//! assert!(report.audit.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{BuildService, ports::Filesystem};
    pub use crate::domain::{
        AuditFinding, BuildConfig, BuildHooks, BuildReport, Diagnostic, DiagnosticKind, NoHooks,
        OptionMarkers, OptionRole, PatternValue, RawPatterns, Severity, Token,
    };
    pub use crate::error::{CutterError, CutterResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
