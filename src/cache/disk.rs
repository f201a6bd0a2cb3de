// Filesystem cache storage.
// One directory per generation, one file per entry, written atomically via temp files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{MirrorError, Result};

use super::paths::{ENTRY_EXTENSION, entry_path, generation_dir, generations_dir, is_valid_generation_name};
use super::request::{CachedResponse, RequestKey};
use super::storage::CacheStorage;

/// Marker file recording when a generation was created.
const MARKER_FILE: &str = "generation.json";

#[derive(Debug, Serialize, Deserialize)]
struct GenerationMarker {
    name: String,
    created_at: DateTime<Utc>,
}

/// Entry header, written as one JSON line ahead of the raw body.
#[derive(Serialize)]
struct EntryHeaderRef<'a> {
    key: &'a RequestKey,
    response: &'a CachedResponse,
}

#[derive(Deserialize)]
struct EntryHeader {
    key: RequestKey,
    response: CachedResponse,
}

/// Cache storage rooted in a directory on disk.
#[derive(Debug)]
pub struct DiskStorage {
    root: PathBuf,
    /// Distinguishes temp files of concurrent writers.
    tmp_counter: AtomicU64,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Storage under the platform cache directory.
    pub fn default_location() -> Result<Self> {
        let root = generations_dir()
            .ok_or_else(|| MirrorError::Other("could not determine cache directory".to_string()))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_name(name: &str) -> Result<()> {
        if is_valid_generation_name(name) {
            Ok(())
        } else {
            Err(MirrorError::Config(format!("invalid cache generation name '{}'", name)))
        }
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("tmp{}", n))
    }

    /// Write to a temp file next to `path`, returning the temp path.
    async fn stage(&self, path: &Path, bytes: &[u8]) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let temp_path = self.temp_path(path);
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(temp_path)
    }

    /// Write atomically via temp file.
    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = self.stage(path, bytes).await?;
        fs::rename(&temp_path, path).await?;
        Ok(())
    }

    async fn read_marker(&self, dir: &Path) -> Option<GenerationMarker> {
        let contents = fs::read(dir.join(MARKER_FILE)).await.ok()?;
        serde_json::from_slice(&contents).ok()
    }
}

fn encode_entry(key: &RequestKey, response: &CachedResponse) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(&EntryHeaderRef { key, response })?;
    bytes.push(b'\n');
    bytes.extend_from_slice(&response.body);
    Ok(bytes)
}

fn decode_entry(bytes: &[u8]) -> Result<(RequestKey, CachedResponse)> {
    let split = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| MirrorError::Other("corrupt cache entry".to_string()))?;
    let header: EntryHeader = serde_json::from_slice(&bytes[..split])?;
    let mut response = header.response;
    response.body = bytes[split + 1..].to_vec();
    Ok((header.key, response))
}

/// Read a file, mapping "not found" to None.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl CacheStorage for DiskStorage {
    async fn open(&self, name: &str) -> Result<()> {
        Self::check_name(name)?;
        let dir = generation_dir(&self.root, name);
        let marker = dir.join(MARKER_FILE);
        if fs::try_exists(&marker).await? {
            return Ok(());
        }

        let created = GenerationMarker {
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.write_atomic(&marker, &serde_json::to_vec(&created)?).await?;
        debug!(generation = %name, root = %self.root.display(), "created cache generation");
        Ok(())
    }

    async fn names(&self) -> Result<Vec<String>> {
        let mut dirs = match fs::read_dir(&self.root).await {
            Ok(dirs) => dirs,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut found: Vec<(DateTime<Utc>, String)> = Vec::new();
        while let Some(entry) = dirs.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            if !is_valid_generation_name(&dir_name) {
                warn!(dir = %dir_name, "ignoring directory that is not a cache generation");
                continue;
            }
            match self.read_marker(&entry.path()).await {
                Some(marker) => found.push((marker.created_at, marker.name)),
                None => {
                    // Generation whose marker write never completed.
                    warn!(dir = %dir_name, "cache generation without marker");
                    found.push((DateTime::<Utc>::MIN_UTC, dir_name));
                }
            }
        }

        found.sort();
        Ok(found.into_iter().map(|(_, name)| name).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Self::check_name(name)?;
        let dir = generation_dir(&self.root, name);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, name: &str, key: &RequestKey) -> Result<Option<CachedResponse>> {
        Self::check_name(name)?;
        let Some(bytes) = read_optional(&entry_path(&self.root, name, key)).await? else {
            return Ok(None);
        };
        let (stored_key, response) = decode_entry(&bytes)?;
        // Digest collision guard.
        if &stored_key != key {
            return Ok(None);
        }
        Ok(Some(response))
    }

    async fn put(&self, name: &str, key: &RequestKey, response: &CachedResponse) -> Result<()> {
        self.open(name).await?;
        let bytes = encode_entry(key, response)?;
        self.write_atomic(&entry_path(&self.root, name, key), &bytes).await
    }

    /// Stages every entry before renaming any into place.
    async fn put_all(&self, name: &str, entries: &[(RequestKey, CachedResponse)]) -> Result<()> {
        self.open(name).await?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(entries.len());
        for (key, response) in entries {
            let path = entry_path(&self.root, name, key);
            let result = match encode_entry(key, response) {
                Ok(bytes) => self.stage(&path, &bytes).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(temp_path) => staged.push((temp_path, path)),
                Err(e) => {
                    for (temp_path, _) in &staged {
                        let _ = fs::remove_file(temp_path).await;
                    }
                    return Err(e);
                }
            }
        }

        for (i, (temp_path, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(temp_path, path).await {
                warn!(generation = %name, error = %e, "rolling back partially stored entries");
                for (_, renamed) in &staged[..i] {
                    let _ = fs::remove_file(renamed).await;
                }
                for (leftover, _) in &staged[i..] {
                    let _ = fs::remove_file(leftover).await;
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    async fn keys(&self, name: &str) -> Result<Vec<RequestKey>> {
        Self::check_name(name)?;
        let mut files = match fs::read_dir(generation_dir(&self.root, name)).await {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(file) = files.next_entry().await? {
            let path = file.path();
            if path.extension().is_none_or(|ext| ext != ENTRY_EXTENSION) {
                continue;
            }
            if let Some(bytes) = read_optional(&path).await? {
                let (key, _) = decode_entry(&bytes)?;
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
