//! File-backed resources under the configured resource root.
//!
//! Every GET reads the file from disk and every POST replaces it wholesale.
//! Writes land in a hidden temporary file next to the target and are renamed
//! into place, so concurrent readers observe either the old or the new
//! contents in full. Concurrent writers to one name: last rename wins.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::{Error, Result};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `name` onto the root. Names that are empty, absolute or walk
    /// upwards are rejected so nothing outside the root is reachable.
    /// Dot-prefixed components are rejected too, which keeps in-flight
    /// temporary files out of reach.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let confined = !name.is_empty()
            && relative.components().all(|c| match c {
                Component::Normal(part) => !part.to_string_lossy().starts_with('.'),
                Component::CurDir => true,
                _ => false,
            });

        if !confined || relative.file_name().is_none() {
            return Err(Error::ResourceNotFound);
        }
        Ok(self.root.join(relative))
    }

    /// Reads the full contents of a regular file.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;

        let metadata = tokio::fs::metadata(&path).await.map_err(not_found_or_io)?;
        if !metadata.is_file() {
            return Err(Error::ResourceNotFound);
        }

        let contents = tokio::fs::read(&path).await.map_err(not_found_or_io)?;
        debug!(path = %path.display(), bytes = contents.len(), "file read");
        Ok(contents)
    }

    /// Creates or fully replaces a file with `contents`.
    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<()> {
        let path = self.resolve(name)?;
        let tmp = temp_path_for(&path);

        if let Err(e) = tokio::fs::write(&tmp, contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = contents.len(), "file written");
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);

    path.with_file_name(format!(".{}.{}-{}.tmp", file_name, std::process::id(), n))
}

fn not_found_or_io(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::NotFound => Error::ResourceNotFound,
        _ => Error::Io(e),
    }
}
