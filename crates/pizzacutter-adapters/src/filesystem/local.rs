//! Local filesystem adapter using std::fs and walkdir.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use pizzacutter_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{CutterError, CutterResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> CutterResult<Vec<PathBuf>> {
        let entries = fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        entries
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .map_err(|e| map_io_error(path, e, "read directory entry"))
            })
            .collect()
    }

    fn walk(&self, path: &Path) -> CutterResult<Vec<PathBuf>> {
        WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                entry.map(walkdir::DirEntry::into_path).map_err(|e| {
                    let at = e.path().unwrap_or(path).to_path_buf();
                    map_io_error(&at, io::Error::other(e), "walk directory")
                })
            })
            .collect()
    }

    fn create_dir_all(&self, path: &Path) -> CutterResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CutterResult<()> {
        // fs::copy carries the permission bits over
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }

    fn remove_file(&self, path: &Path) -> CutterResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(path, e, "remove file")),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> CutterResult<()> {
        fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename file"))
    }

    fn open_read(&self, path: &Path) -> CutterResult<Box<dyn BufRead>> {
        let file = File::open(path).map_err(|e| map_io_error(path, e, "open file"))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create_write(&self, path: &Path) -> CutterResult<Box<dyn Write>> {
        let file = File::create(path).map_err(|e| map_io_error(path, e, "create file"))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn read_bytes(&self, path: &Path) -> CutterResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CutterError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
