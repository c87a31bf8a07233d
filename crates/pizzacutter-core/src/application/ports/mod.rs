//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `pizzacutter-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `BuildService::build` plus the `BuildHooks` callbacks it drives

pub mod output;

pub use output::Filesystem;

#[cfg(test)]
pub use output::MockFilesystem;
