//! Folder listing behind a backend-agnostic contract
//!
//! Listing returns immediate children only, in whatever order the backend
//! yields them. An existing-but-empty directory is `Ok(vec![])`; every
//! failure mode is a distinct `ListError` naming the path, so callers can
//! tell "not found" from "empty" from "permission denied".

use crate::error::ListError;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One immediate child of a listed folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_file: bool,
}

impl Entry {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Entry {
            name: leaf_name(&path),
            path,
            is_dir: true,
            is_file: false,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Entry {
            name: leaf_name(&path),
            path,
            is_dir: false,
            is_file: true,
        }
    }
}

fn leaf_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Backend contract for reading a folder's immediate children.
///
/// The backend is chosen once when a root is resolved and never branched on
/// again downstream.
pub trait FolderSource {
    fn list_children(&self, dir: &Path) -> Result<Vec<Entry>, ListError>;
}

/// Listing backed by the local filesystem
#[derive(Debug, Default)]
pub struct FsSource;

impl FolderSource for FsSource {
    fn list_children(&self, dir: &Path) -> Result<Vec<Entry>, ListError> {
        let metadata = fs::metadata(dir).map_err(|e| map_io_error(dir, e))?;
        if !metadata.is_dir() {
            return Err(ListError::NotADirectory(dir.to_path_buf()));
        }

        let read_dir = fs::read_dir(dir).map_err(|e| map_io_error(dir, e))?;
        let mut entries = Vec::new();
        for entry_result in read_dir {
            // Skip entries that cannot be read (permission errors, etc.)
            let entry = match entry_result {
                Ok(e) => e,
                Err(_) => continue,
            };
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            let name = match entry.file_name().into_string() {
                Ok(n) => n,
                Err(_) => continue,
            };
            entries.push(Entry {
                name,
                path: entry.path(),
                is_dir: file_type.is_dir(),
                is_file: file_type.is_file(),
            });
        }
        Ok(entries)
    }
}

fn map_io_error(dir: &Path, e: io::Error) -> ListError {
    match e.kind() {
        io::ErrorKind::NotFound => ListError::NotFound(dir.to_path_buf()),
        io::ErrorKind::PermissionDenied => ListError::PermissionDenied(dir.to_path_buf()),
        _ => ListError::Io {
            path: dir.to_path_buf(),
            source: e,
        },
    }
}

/// In-memory folder tree with the same contract.
///
/// Second implementation of [`FolderSource`], also the injected double the
/// selector tests run against.
#[derive(Debug, Default)]
pub struct MemSource {
    dirs: BTreeMap<PathBuf, Vec<Entry>>,
    denied: BTreeSet<PathBuf>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directory, linking it into its parent when the parent is
    /// already registered.
    pub fn add_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if let Some(children) = self.dirs.get_mut(parent) {
                if !children.iter().any(|e| e.path == path) {
                    children.push(Entry::dir(path.clone()));
                }
            }
        }
        self.dirs.entry(path).or_default();
        self
    }

    /// Registers a file inside an already-registered directory.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            let children = self.dirs.entry(parent.to_path_buf()).or_default();
            if !children.iter().any(|e| e.path == path) {
                children.push(Entry::file(path));
            }
        }
        self
    }

    /// Marks a directory as unreadable
    pub fn deny(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.denied.insert(path.into());
        self
    }
}

impl FolderSource for MemSource {
    fn list_children(&self, dir: &Path) -> Result<Vec<Entry>, ListError> {
        if self.denied.contains(dir) {
            return Err(ListError::PermissionDenied(dir.to_path_buf()));
        }
        if let Some(children) = self.dirs.get(dir) {
            return Ok(children.clone());
        }
        // A path registered as a file under its parent is not listable
        if let Some(parent) = dir.parent() {
            if let Some(children) = self.dirs.get(parent) {
                if children.iter().any(|e| e.path == dir && e.is_file) {
                    return Err(ListError::NotADirectory(dir.to_path_buf()));
                }
            }
        }
        Err(ListError::NotFound(dir.to_path_buf()))
    }
}
