//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    io::{self, BufRead, Cursor, Write},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use pizzacutter_core::{
    application::{ApplicationError, ports::Filesystem},
    error::CutterResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep one handle while the build
/// service owns another.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    /// Writers opened on these paths fail on first write.
    failing_writes: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn require_parent(&self, path: &Path) -> CutterResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a directory and its ancestors (testing helper).
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_dir_all(path.as_ref());
        }
        self
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> &Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dir_all(parent);
            }
            inner
                .files
                .insert(path.to_path_buf(), content.as_ref().to_vec());
        }
        self
    }

    /// Make every writer opened on `path` fail (testing helper).
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) -> &Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_writes.insert(path.as_ref().to_path_buf());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Read a file as UTF-8 text (testing helper).
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read_file(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.snapshot().into_keys().collect()
    }

    /// Sorted copy of every file and its content.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        self.inner
            .read()
            .map(|inner| {
                inner
                    .files
                    .iter()
                    .map(|(p, c)| (p.clone(), c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Everything under `root`, files and directories, sorted.
    pub fn tree(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path))
    }

    fn read_dir(&self, path: &Path) -> CutterResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Directory does not exist".into(),
            }
            .into());
        }
        Ok(inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn walk(&self, path: &Path) -> CutterResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut paths: Vec<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn create_dir_all(&self, path: &Path) -> CutterResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "A file exists at this path".into(),
            }
            .into());
        }
        inner.add_dir_all(path);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CutterResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let content = inner.files.get(from).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "Source file does not exist".into(),
            }
        })?;
        inner.require_parent(to)?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> CutterResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.files.remove(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> CutterResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let content = inner
            .files
            .remove(from)
            .ok_or_else(|| ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "Source file does not exist".into(),
            })?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn open_read(&self, path: &Path) -> CutterResult<Box<dyn BufRead>> {
        let content = self
            .read_file(path)
            .ok_or_else(|| ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "File does not exist".into(),
            })?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_write(&self, path: &Path) -> CutterResult<Box<dyn Write>> {
        let fail = {
            let mut inner = self
                .inner
                .write()
                .map_err(|_| ApplicationError::StoreLockError)?;
            inner.require_parent(path)?;
            inner.files.insert(path.to_path_buf(), Vec::new());
            inner.failing_writes.contains(path)
        };
        Ok(Box::new(MemoryWriter {
            inner: Arc::clone(&self.inner),
            path: path.to_path_buf(),
            buffer: Vec::new(),
            fail,
        }))
    }

    fn read_bytes(&self, path: &Path) -> CutterResult<Vec<u8>> {
        self.read_file(path).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "File does not exist".into(),
            }
            .into()
        })
    }
}

/// Buffers writes and commits the whole buffer on flush and on drop.
struct MemoryWriter {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
    path: PathBuf,
    buffer: Vec<u8>,
    fail: bool,
}

impl MemoryWriter {
    fn commit(&self) -> io::Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| io::Error::other("memory filesystem lock poisoned"))?;
        inner.files.insert(self.path.clone(), self.buffer.clone());
        Ok(())
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::other("injected write failure"));
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit()
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        if !self.fail {
            let _ = self.commit();
        }
    }
}
