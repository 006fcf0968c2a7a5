//! File-based storage implementation for native platforms.

use super::upload::{content_type_for, is_valid_reference, probe_image};
use super::{
    BoxFuture, ImageStore, Storage, StorageError, StorageResult, StoredImage, UploadedImage,
    decode_id, encode_id,
};
use crate::model::FloorPlanConfig;
use std::fs;
use std::path::{Path, PathBuf};

fn ensure_dir(path: &Path) -> StorageResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            StorageError::Io(format!("Failed to create storage directory: {}", e))
        })?;
    }
    Ok(())
}

/// Stores each show's floor plan as `<encoded show_id>.json` in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        ensure_dir(&base_path)?;
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/boothplan/floorplans/`
    /// On Windows: `%LOCALAPPDATA%\boothplan\floorplans\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("boothplan").join("floorplans"))
    }

    fn plan_path(&self, show_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_id(show_id)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, show_id: &str, config: &FloorPlanConfig) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.plan_path(show_id);
        let json = match config.to_json() {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            // Write to a temp file, then rename over the previous plan.
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e))
            })?;
            fs::rename(&tmp, &path).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn load(&self, show_id: &str) -> BoxFuture<'_, StorageResult<FloorPlanConfig>> {
        let path = self.plan_path(show_id);
        let show_id = show_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(show_id));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;

            FloorPlanConfig::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, show_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.plan_path(show_id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    match path.file_stem().and_then(|s| s.to_str()).and_then(decode_id) {
                        Some(id) => ids.push(id),
                        None => log::debug!("Skipping foreign file {}", path.display()),
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, show_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.plan_path(show_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

/// Stores uploaded images as files named by their reference.
pub struct FileImageStore {
    base_path: PathBuf,
}

impl FileImageStore {
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        ensure_dir(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ImageStore for FileImageStore {
    fn put_image(&self, bytes: &[u8]) -> BoxFuture<'_, StorageResult<UploadedImage>> {
        let bytes = bytes.to_vec();
        Box::pin(async move {
            let uploaded = probe_image(&bytes)?;
            let path = self.base_path.join(&uploaded.reference);
            fs::write(&path, &bytes).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::info!(
                "Stored background {} ({}x{})",
                uploaded.reference,
                uploaded.width,
                uploaded.height
            );
            Ok(uploaded)
        })
    }

    fn get_image(&self, reference: &str) -> BoxFuture<'_, StorageResult<StoredImage>> {
        let reference = reference.to_string();
        Box::pin(async move {
            if !is_valid_reference(&reference) {
                return Err(StorageError::NotFound(reference));
            }
            let path = self.base_path.join(&reference);
            if !path.exists() {
                return Err(StorageError::NotFound(reference));
            }
            let bytes = fs::read(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Ok(StoredImage {
                bytes,
                content_type: content_type_for(&reference),
            })
        })
    }
}
