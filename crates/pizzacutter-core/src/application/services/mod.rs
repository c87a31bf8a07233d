//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "build a target from a template".

pub mod build_service;

pub use build_service::BuildService;
