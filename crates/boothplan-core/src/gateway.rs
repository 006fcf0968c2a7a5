//! Persistence gateway: the one place the editor and viewers talk to storage.

use crate::model::FloorPlanConfig;
use crate::session::{EditorSession, SessionError};
use crate::storage::{ImageStore, Storage, StorageError, StorageResult, StoredImage, UploadedImage};
use crate::vendor::{Vendor, VendorDirectory};
use std::sync::Arc;
use thiserror::Error;

/// Errors from a full save round trip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Loads and saves floor plans, stores backgrounds and reads vendors.
#[derive(Clone)]
pub struct PersistenceGateway {
    plans: Arc<dyn Storage>,
    images: Arc<dyn ImageStore>,
    vendors: Arc<dyn VendorDirectory>,
}

impl PersistenceGateway {
    pub fn new(
        plans: Arc<dyn Storage>,
        images: Arc<dyn ImageStore>,
        vendors: Arc<dyn VendorDirectory>,
    ) -> Self {
        Self {
            plans,
            images,
            vendors,
        }
    }

    /// Load a show's saved plan; `NotFound` when none has been saved.
    ///
    /// The returned plan always carries `show_id`, whatever the stored copy says.
    pub async fn load(&self, show_id: &str) -> StorageResult<FloorPlanConfig> {
        let mut config = self.plans.load(show_id).await?;
        if config.show_id != show_id {
            log::warn!(
                "Stored plan for {} claims show {}; correcting",
                show_id,
                config.show_id
            );
            config.show_id = show_id.to_string();
        }
        Ok(config)
    }

    /// Load a show's plan, or a fresh default when none has been saved.
    pub async fn load_or_default(&self, show_id: &str) -> StorageResult<FloorPlanConfig> {
        match self.load(show_id).await {
            Err(StorageError::NotFound(_)) => {
                log::debug!("No saved plan for {}, starting empty", show_id);
                Ok(FloorPlanConfig::new(show_id))
            }
            other => other,
        }
    }

    /// Replace the stored plan for `config.show_id`.
    pub async fn save(&self, config: &FloorPlanConfig) -> StorageResult<()> {
        self.plans.save(&config.show_id, config).await
    }

    /// Store an uploaded background and report its native size.
    pub async fn upload_background(&self, bytes: &[u8]) -> StorageResult<UploadedImage> {
        self.images.put_image(bytes).await
    }

    pub async fn image(&self, reference: &str) -> StorageResult<StoredImage> {
        self.images.get_image(reference).await
    }

    pub async fn vendors(&self, show_id: &str) -> StorageResult<Vec<Vendor>> {
        self.vendors.vendors(show_id).await
    }

    /// Load the plan and vendor list and open an editing session on them.
    pub async fn open_session(&self, show_id: &str) -> StorageResult<EditorSession> {
        let config = self.load_or_default(show_id).await?;
        let vendors = self.vendors(show_id).await?;
        let mut session = EditorSession::new(config);
        session.set_vendors(vendors);
        Ok(session)
    }

    /// Run one explicit save of the session's plan.
    ///
    /// On storage failure the session keeps its edits and records the failure.
    pub async fn save_session(&self, session: &mut EditorSession) -> Result<(), SaveError> {
        let snapshot = session.begin_save()?;
        let result = self.save(&snapshot).await;
        session.finish_save(result.clone())?;
        result.map_err(SaveError::from)
    }
}
