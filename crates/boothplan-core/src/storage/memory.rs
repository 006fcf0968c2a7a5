//! In-memory storage implementation.

use super::upload::{content_type_for, probe_image};
use super::{BoxFuture, ImageStore, Storage, StorageError, StorageResult, StoredImage, UploadedImage};
use crate::model::FloorPlanConfig;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory floor plan storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    plans: RwLock<HashMap<String, FloorPlanConfig>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, show_id: &str, config: &FloorPlanConfig) -> BoxFuture<'_, StorageResult<()>> {
        let show_id = show_id.to_string();
        let config = config.clone();
        Box::pin(async move {
            let mut plans = self
                .plans
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            plans.insert(show_id, config);
            Ok(())
        })
    }

    fn load(&self, show_id: &str) -> BoxFuture<'_, StorageResult<FloorPlanConfig>> {
        let show_id = show_id.to_string();
        Box::pin(async move {
            let plans = self
                .plans
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            plans
                .get(&show_id)
                .cloned()
                .ok_or(StorageError::NotFound(show_id))
        })
    }

    fn delete(&self, show_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let show_id = show_id.to_string();
        Box::pin(async move {
            let mut plans = self
                .plans
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            plans.remove(&show_id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let plans = self
                .plans
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(plans.keys().cloned().collect())
        })
    }

    fn exists(&self, show_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let show_id = show_id.to_string();
        Box::pin(async move {
            let plans = self
                .plans
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(plans.contains_key(&show_id))
        })
    }
}

/// In-memory image store.
#[derive(Default)]
pub struct MemoryImageStore {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryImageStore {
    fn put_image(&self, bytes: &[u8]) -> BoxFuture<'_, StorageResult<UploadedImage>> {
        let bytes = bytes.to_vec();
        Box::pin(async move {
            let uploaded = probe_image(&bytes)?;
            let mut images = self
                .images
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            images.insert(uploaded.reference.clone(), bytes);
            Ok(uploaded)
        })
    }

    fn get_image(&self, reference: &str) -> BoxFuture<'_, StorageResult<StoredImage>> {
        let reference = reference.to_string();
        Box::pin(async move {
            let images = self
                .images
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let bytes = images
                .get(&reference)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(reference.clone()))?;
            Ok(StoredImage {
                bytes,
                content_type: content_type_for(&reference),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;
    use crate::storage::upload::test_png;
    use kurbo::Point;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut config = FloorPlanConfig::new("expo");
        config.create_booth(Point::new(10.0, 10.0), 10, 10).unwrap();

        block_on(storage.save("expo", &config)).unwrap();
        let loaded = block_on(storage.load("expo")).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_save_replaces() {
        let storage = MemoryStorage::new();
        let mut config = FloorPlanConfig::new("expo");
        block_on(storage.save("expo", &config)).unwrap();
        config.create_booth(Point::ZERO, 10, 20).unwrap();
        block_on(storage.save("expo", &config)).unwrap();

        assert_eq!(block_on(storage.load("expo")).unwrap().len(), 1);
        assert_eq!(block_on(storage.list()).unwrap(), vec!["expo".to_string()]);
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let config = FloorPlanConfig::new("expo");

        assert!(!block_on(storage.exists("expo")).unwrap());
        block_on(storage.save("expo", &config)).unwrap();
        assert!(block_on(storage.exists("expo")).unwrap());
        block_on(storage.delete("expo")).unwrap();
        assert!(!block_on(storage.exists("expo")).unwrap());
    }

    #[test]
    fn test_image_roundtrip() {
        let store = MemoryImageStore::new();
        let png = test_png(20, 10);
        let uploaded = block_on(store.put_image(&png)).unwrap();
        assert_eq!((uploaded.width, uploaded.height), (20, 10));

        let stored = block_on(store.get_image(&uploaded.reference)).unwrap();
        assert_eq!(stored.bytes, png);
        assert_eq!(stored.content_type, "image/png");
    }

    #[test]
    fn test_image_rejects_non_image() {
        let store = MemoryImageStore::new();
        let result = block_on(store.put_image(b"<html></html>"));
        assert!(matches!(result, Err(StorageError::Image(_))));
    }
}
