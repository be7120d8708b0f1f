//! Output sinks for generated files
//!
//! Renderers never touch the filesystem directly. They hand fully rendered
//! files to an [`OutputSink`], which decides where the bytes go.

use cpm_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for generated files
pub trait OutputSink {
    /// Create a directory and all of its parents
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Create or truncate a file and return a handle to write it.
    ///
    /// The handle is closed when dropped.
    fn create_file<'a>(&'a mut self, path: &Path) -> Result<Box<dyn Write + 'a>>;
}

/// Write `content` to `path`, creating parent directories first
pub fn write_file(sink: &mut dyn OutputSink, path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            sink.create_dir_all(parent)?;
        }
    }

    let mut handle = sink.create_file(path)?;
    handle
        .write_all(content.as_bytes())
        .and_then(|_| handle.flush())
        .map_err(|e| Error::resource(format!("Failed to write file {}: {}", path.display(), e)))
}

/// Sink writing to the real filesystem
#[derive(Debug, Default)]
pub struct FsSink;

impl FsSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for FsSink {
    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| {
            Error::resource(format!("can't create directory {}: {}", path.display(), e))
        })
    }

    fn create_file<'a>(&'a mut self, path: &Path) -> Result<Box<dyn Write + 'a>> {
        let file = File::create(path)
            .map_err(|e| Error::resource(format!("can't create file {}: {}", path.display(), e)))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// In-memory sink, used for previews and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// File contents as UTF-8, if the file was written
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files
            .get(path.as_ref())
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Paths of all written files, sorted
    pub fn paths(&self) -> Vec<&Path> {
        self.files.keys().map(PathBuf::as_path).collect()
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.contains(path.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn create_file<'a>(&'a mut self, path: &Path) -> Result<Box<dyn Write + 'a>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) {
                return Err(Error::resource(format!(
                    "can't create file {}: directory {} does not exist",
                    path.display(),
                    parent.display()
                )));
            }
        }

        let buffer = self.files.entry(path.to_path_buf()).or_default();
        buffer.clear();
        Ok(Box::new(buffer))
    }
}
