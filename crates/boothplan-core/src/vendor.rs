//! Vendor directory lookups.
//!
//! Vendors are registered elsewhere; the floor plan only reads the directory
//! for a show to populate assignment choices and to auto-fill booth categories.

use crate::booth::Booth;
use crate::category::Category;
use crate::storage::{BoxFuture, StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Label shown for booths without a (resolvable) vendor.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// A vendor as listed in the show's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Vendor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The vendor's category, if it is one of the booth categories.
    pub fn booth_category(&self) -> Option<Category> {
        self.category.as_deref().and_then(|c| c.parse().ok())
    }
}

/// Resolve the label for a booth's assignment against the current directory.
///
/// A vendor id that no longer exists in the directory shows as unassigned
/// rather than failing.
pub fn vendor_label<'a>(booth: &Booth, vendors: &'a [Vendor]) -> &'a str {
    booth
        .vendor_id()
        .and_then(|id| vendors.iter().find(|v| v.id == id))
        .map(|v| v.name.as_str())
        .unwrap_or(UNASSIGNED_LABEL)
}

/// Read-only vendor directory, scoped by show id.
#[cfg(not(target_arch = "wasm32"))]
pub trait VendorDirectory: Send + Sync {
    /// All vendors registered for a show (empty when none).
    fn vendors(&self, show_id: &str) -> BoxFuture<'_, StorageResult<Vec<Vendor>>>;
}

/// Read-only vendor directory (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait VendorDirectory {
    /// All vendors registered for a show (empty when none).
    fn vendors(&self, show_id: &str) -> BoxFuture<'_, StorageResult<Vec<Vendor>>>;
}

/// In-memory vendor directory for testing and embedding.
#[derive(Default)]
pub struct MemoryVendorDirectory {
    shows: RwLock<HashMap<String, Vec<Vendor>>>,
}

impl MemoryVendorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the vendor list of a show.
    pub fn set_vendors(&self, show_id: &str, vendors: Vec<Vendor>) -> StorageResult<()> {
        let mut shows = self
            .shows
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        shows.insert(show_id.to_string(), vendors);
        Ok(())
    }
}

impl VendorDirectory for MemoryVendorDirectory {
    fn vendors(&self, show_id: &str) -> BoxFuture<'_, StorageResult<Vec<Vendor>>> {
        let show_id = show_id.to_string();
        Box::pin(async move {
            let shows = self
                .shows
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(shows.get(&show_id).cloned().unwrap_or_default())
        })
    }
}

/// Vendor directory backed by `<base>/<encoded show_id>.json` files holding a JSON array.
pub struct FileVendorDirectory {
    base_path: PathBuf,
}

impl FileVendorDirectory {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn show_path(&self, show_id: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.json", crate::storage::encode_id(show_id)))
    }
}

impl VendorDirectory for FileVendorDirectory {
    fn vendors(&self, show_id: &str) -> BoxFuture<'_, StorageResult<Vec<Vendor>>> {
        let path = self.show_path(show_id);
        Box::pin(async move {
            if !path.exists() {
                return Ok(Vec::new());
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }
}
