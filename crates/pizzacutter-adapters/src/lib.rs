//! Infrastructure adapters for PizzaCutter.
//!
//! This crate implements the ports defined in `pizzacutter-core::application::ports`
//! and loads conf files. It contains all external dependencies and I/O operations.

pub mod config_loader;
pub mod filesystem;

// Re-export commonly used adapters
pub use config_loader::{ConfFile, ConfigLoader, PathAnchor, PatternEntry, SettingsSection};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
