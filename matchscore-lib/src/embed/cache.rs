use std::fs;
use std::path::PathBuf;

use tracing::info;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Whether a model was already present in the cache directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Model files found, load from disk
    Hit,
    /// No model weights on disk yet, the model will be downloaded
    Miss,
}

/// Local on-disk copy of a pretrained model.
///
/// The cache lives at `<root>/cached-<model name>` so repeated runs skip the
/// download. The root is injectable so tests never touch the working directory.
#[derive(Debug, Clone)]
pub struct ModelCache {
    root: PathBuf,
    model_name: String,
}

impl ModelCache {
    pub fn new(root: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            model_name: model_name.into(),
        }
    }

    /// Directory the model is stored in.
    pub fn path(&self) -> PathBuf {
        // hub-style names ("org/model") must not create nested directories
        let name = self.model_name.replace(['/', '\\'], "-");
        self.root.join(format!("cached-{name}"))
    }

    /// `true` when an `.onnx` weights file exists anywhere under the cache directory.
    ///
    /// fastembed stores models in the hub layout
    /// (`models--<org>--<name>/snapshots/<rev>/model.onnx`, symlinked into
    /// `blobs/`), so lock files or an interrupted download don't count.
    pub fn is_populated(&self) -> bool {
        WalkDir::new(self.path())
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .any(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "onnx")
            })
    }

    /// Make sure the cache directory exists and report whether it already held a model.
    pub fn prepare(&self) -> Result<CacheState> {
        let path = self.path();
        if self.is_populated() {
            info!(path = %path.display(), model = %self.model_name, "loading model from cache");
            return Ok(CacheState::Hit);
        }

        fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), model = %self.model_name, "model not cached, downloading");
        Ok(CacheState::Miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let cache = ModelCache::new("/tmp/models", "all-MiniLM-L6-v2");
        assert_eq!(cache.path(), PathBuf::from("/tmp/models/cached-all-MiniLM-L6-v2"));
    }

    #[test]
    fn test_path_flattens_hub_names() {
        let cache = ModelCache::new("root", "BAAI/bge-small-en-v1.5");
        assert_eq!(cache.path(), PathBuf::from("root/cached-BAAI-bge-small-en-v1.5"));
    }

    #[test]
    fn test_miss_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(dir.path(), "model");

        assert!(!cache.is_populated());
        assert_eq!(cache.prepare().unwrap(), CacheState::Miss);
        assert!(cache.path().is_dir());

        // still empty, so still a miss
        assert_eq!(cache.prepare().unwrap(), CacheState::Miss);
    }

    #[test]
    fn test_hit_when_populated() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(dir.path(), "model");
        fs::create_dir_all(cache.path()).unwrap();
        fs::write(cache.path().join("model.onnx"), b"weights").unwrap();

        assert!(cache.is_populated());
        assert_eq!(cache.prepare().unwrap(), CacheState::Hit);
    }

    #[test]
    fn test_partial_download_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(dir.path(), "model");
        let repo = cache.path().join("models--Qdrant--model-onnx");
        fs::create_dir_all(repo.join("blobs")).unwrap();
        fs::write(cache.path().join(".lock"), b"").unwrap();
        fs::write(repo.join("blobs").join("9f1c.incomplete"), b"half").unwrap();
        fs::create_dir_all(repo.join("snapshots").join("main")).unwrap();

        assert!(!cache.is_populated());
        assert_eq!(cache.prepare().unwrap(), CacheState::Miss);
    }

    #[test]
    fn test_hit_in_hub_layout() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(dir.path(), "model");
        let snapshot = cache
            .path()
            .join("models--Qdrant--model-onnx")
            .join("snapshots")
            .join("5f1b8cd");
        fs::create_dir_all(&snapshot).unwrap();
        fs::write(snapshot.join("tokenizer.json"), b"{}").unwrap();
        fs::write(snapshot.join("model.onnx"), b"weights").unwrap();

        assert!(cache.is_populated());
        assert_eq!(cache.prepare().unwrap(), CacheState::Hit);
    }
}
