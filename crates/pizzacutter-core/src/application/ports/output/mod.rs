//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `pizzacutter-adapters` crate provides implementations.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::CutterResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `pizzacutter_adapters::filesystem::LocalFilesystem` (production)
/// - `pizzacutter_adapters::filesystem::MemoryFilesystem` (testing)
///
/// All paths are absolute. Query methods (`exists`, `is_dir`, `is_file`)
/// never fail; a path that cannot be inspected counts as absent.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Immediate children of a directory, in no particular order.
    fn read_dir(&self, path: &Path) -> CutterResult<Vec<PathBuf>>;

    /// `path` itself plus every descendant, files and directories alike.
    fn walk(&self, path: &Path) -> CutterResult<Vec<PathBuf>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CutterResult<()>;

    /// Copy bytes and, where the backend has them, permissions.
    fn copy_file(&self, from: &Path, to: &Path) -> CutterResult<()>;

    /// Remove a file. Removing a missing file is not an error.
    fn remove_file(&self, path: &Path) -> CutterResult<()>;

    /// Move a file, replacing `to` when it already exists.
    fn rename(&self, from: &Path, to: &Path) -> CutterResult<()>;

    fn open_read(&self, path: &Path) -> CutterResult<Box<dyn BufRead>>;

    /// Create or truncate a file for writing.
    fn create_write(&self, path: &Path) -> CutterResult<Box<dyn Write>>;

    fn read_bytes(&self, path: &Path) -> CutterResult<Vec<u8>>;
}
