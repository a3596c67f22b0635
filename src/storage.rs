// Manages local file storage for posts.
//
// VERSION BUMP REQUIRED:
// Changes to the Post struct or its nested types (PlatformEntry, ReviewStatus)
// require incrementing POST_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::Post;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

// Version history:
// - v1: bare JSON array of posts
// - v2: versioned wrapper `{ version, posts }`
const POST_STORAGE_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct PostStorageData {
    #[serde(default)]
    version: u32,
    posts: Vec<Post>,
}

/// Tracks whether the last load of each file succeeded, so a save never
/// overwrites data we failed to read.
static LOAD_STATE_MAP: OnceLock<Mutex<HashMap<PathBuf, LoadState>>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Uninitialized,
    Success,
    Failed,
}

impl LoadState {
    fn get(path: &Path) -> LoadState {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        let guard = map.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(path).copied().unwrap_or(LoadState::Uninitialized)
    }

    fn set(path: &Path, state: LoadState) {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        let mut guard = map.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(path.to_path_buf(), state);
    }
}

pub struct LocalStorage;

impl LocalStorage {
    pub fn get_path(ctx: &dyn AppContext) -> Result<PathBuf> {
        ctx.get_posts_path()
    }

    pub fn load(ctx: &dyn AppContext) -> Result<Vec<Post>> {
        Self::load_from_path(&Self::get_path(ctx)?)
    }

    /// Refuses to write if the previous load of the same file failed.
    pub fn save(ctx: &dyn AppContext, posts: &[Post]) -> Result<()> {
        let path = Self::get_path(ctx)?;
        if LoadState::get(&path) == LoadState::Failed {
            return Err(anyhow::anyhow!(
                "Cannot save {}: previous load failed. This prevents overwriting data that couldn't be read.",
                path.display()
            ));
        }
        Self::write_posts(&path, posts)
    }

    /// Writes regardless of load state, for manual recovery.
    pub fn force_save(ctx: &dyn AppContext, posts: &[Post]) -> Result<()> {
        let path = Self::get_path(ctx)?;
        Self::write_posts(&path, posts)?;
        LoadState::set(&path, LoadState::Success);
        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<Vec<Post>> {
        if !path.exists() {
            LoadState::set(path, LoadState::Success);
            return Ok(vec![]);
        }

        let result = Self::with_lock(path, || {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let (posts, needs_upgrade) = Self::decode(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?;

            if needs_upgrade {
                log::info!(
                    "Upgrading {} to storage v{}",
                    path.display(),
                    POST_STORAGE_VERSION
                );
                Self::atomic_write(path, Self::encode(&posts)?)?;
            }
            Ok(posts)
        });

        match &result {
            Ok(posts) => {
                log::info!("Loaded {} post(s) from {}", posts.len(), path.display());
                LoadState::set(path, LoadState::Success);
            }
            Err(e) => {
                log::error!("Loading {} failed: {:#}", path.display(), e);
                LoadState::set(path, LoadState::Failed);
            }
        }
        result
    }

    fn write_posts(path: &Path, posts: &[Post]) -> Result<()> {
        Self::with_lock(path, || {
            Self::atomic_write(path, Self::encode(posts)?)?;
            log::debug!("Saved {} post(s) to {}", posts.len(), path.display());
            Ok(())
        })
    }

    /// Returns the posts and whether the text was in an older layout.
    fn decode(json: &str) -> Result<(Vec<Post>, bool)> {
        if let Ok(data) = serde_json::from_str::<PostStorageData>(json) {
            if data.version > POST_STORAGE_VERSION {
                return Err(anyhow::anyhow!(
                    "Storage version {} is newer than supported version {}",
                    data.version,
                    POST_STORAGE_VERSION
                ));
            }
            let outdated = data.version < POST_STORAGE_VERSION;
            return Ok((data.posts, outdated));
        }
        let posts: Vec<Post> = serde_json::from_str(json)?;
        Ok((posts, true))
    }

    fn encode(posts: &[Post]) -> Result<String> {
        let data = PostStorageData {
            version: POST_STORAGE_VERSION,
            posts: posts.to_vec(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    // --- Import / Export ---

    pub fn export_json(posts: &[Post]) -> Result<String> {
        Self::encode(posts)
    }

    /// Accepts an export file or a bare array of posts.
    pub fn import_json(json: &str) -> Result<Vec<Post>> {
        let (posts, _) = Self::decode(json).context("Not a valid post export")?;
        Ok(posts)
    }

    // --- Locking ---

    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}
