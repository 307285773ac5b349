/*!
 * Object storage for caption files.
 *
 * Objects are addressed as `s3://bucket/key`. The `ObjectStore` trait is the
 * seam to a real bucket service; `LocalObjectStore` backs it with a directory
 * tree (one subdirectory per bucket) and writes atomically, so a reader
 * never sees a half-written caption file.
 */

use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::StorageError;
use crate::file_utils::FileManager;

const SCHEME: &str = "s3://";

/// Bucket and key of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl {
    bucket: String,
    key: String,
}

impl ObjectUrl {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse `s3://bucket/key`
    pub fn parse(url: &str) -> Result<Self, StorageError> {
        let rest = url
            .strip_prefix(SCHEME)
            .ok_or_else(|| StorageError::InvalidUrl(format!("{} does not start with {}", url, SCHEME)))?;
        match rest.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self::new(bucket, key)),
            _ => Err(StorageError::InvalidUrl(format!("{} does not name a bucket and key", url))),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last path segment of the key
    pub fn filename(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", SCHEME, self.bucket, self.key)
    }
}

/// Key for a corrected file under the requested output prefix.
///
/// A prefix inside `bucket` loses its `s3://bucket/` part; a prefix in
/// another bucket loses its first path segment; a bare prefix is used as-is.
pub fn output_object_key(output_url: &str, bucket: &str, filename: &str) -> Result<String, StorageError> {
    let Some(rest) = output_url.strip_prefix(SCHEME) else {
        return Ok(format!("{}{}", output_url, filename));
    };

    let bucket_prefix = format!("{}/", bucket);
    if let Some(prefix) = rest.strip_prefix(&bucket_prefix) {
        return Ok(format!("{}{}", prefix, filename));
    }

    match rest.split_once('/') {
        Some((_, prefix)) => Ok(format!("{}{}", prefix, filename)),
        None => Err(StorageError::InvalidUrl(format!(
            "output url {} has no path after the bucket",
            output_url
        ))),
    }
}

/// Text object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object as UTF-8 text
    async fn read_text(&self, url: &ObjectUrl) -> Result<String, StorageError>;

    /// Write text, replacing any existing object
    async fn write_text(&self, url: &ObjectUrl, text: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed object store rooted at a directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of an object. Keys may not climb out of their bucket.
    pub fn object_path(&self, url: &ObjectUrl) -> Result<PathBuf, StorageError> {
        let relative = Path::new(url.bucket()).join(url.key());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StorageError::InvalidUrl(format!("{} escapes the storage root", url)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn read_text(&self, url: &ObjectUrl) -> Result<String, StorageError> {
        let path = self.object_path(url)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(url.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Read {} bytes from {:?}", bytes.len(), path);
        String::from_utf8(bytes).map_err(|_| StorageError::NotText(url.to_string()))
    }

    async fn write_text(&self, url: &ObjectUrl, text: &str) -> Result<(), StorageError> {
        let path = self.object_path(url)?;
        let text = text.to_string();
        tokio::task::spawn_blocking(move || write_atomically(&path, &text))
            .await
            .map_err(|e| StorageError::Io(io::Error::other(e)))?
    }
}

fn write_atomically(path: &Path, text: &str) -> Result<(), StorageError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    FileManager::ensure_dir(parent).map_err(|e| StorageError::Io(io::Error::other(e)))?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(text.as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| StorageError::Io(e.error))?;

    debug!("Wrote {} bytes to {:?}", text.len(), path);
    Ok(())
}
