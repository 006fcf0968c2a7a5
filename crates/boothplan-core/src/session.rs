//! Editing session state.
//!
//! An [`EditorSession`] is created when the configurator opens a show and
//! dropped when the operator navigates away. Edits live only here until an
//! explicit save hands a snapshot to the persistence gateway.

use crate::booth::{Booth, BoothError, BoothId, BoothUpdate, VendorChange};
use crate::calibration::Calibration;
use crate::category::Category;
use crate::model::FloorPlanConfig;
use crate::storage::{StorageError, UploadedImage};
use crate::vendor::{Vendor, vendor_label};
use crate::visibility::VisibilitySettings;
use kurbo::Point;
use thiserror::Error;
use uuid::Uuid;

/// Session errors. None of them change the in-memory plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Booth(#[from] BoothError),
    #[error("Unknown vendor: {0}")]
    UnknownVendor(String),
    #[error("A save is already in progress")]
    SaveInFlight,
    #[error("No save is in progress")]
    NoSaveInFlight,
}

/// Where the last explicit save stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    InFlight,
    /// The last save failed; edits are still in memory and can be retried.
    Failed(String),
}

/// Property panel contents for one booth.
#[derive(Debug, Clone, PartialEq)]
pub struct BoothPanel {
    pub id: BoothId,
    pub x: f64,
    pub y: f64,
    pub width_feet: u32,
    pub height_feet: u32,
    pub category: Option<Category>,
    pub vendor_id: Option<String>,
    /// Vendor name, or "Unassigned" when none or no longer in the directory.
    pub vendor_label: String,
}

/// The plan being edited plus the operator's transient state.
#[derive(Debug, Clone)]
pub struct EditorSession {
    id: Uuid,
    config: FloorPlanConfig,
    vendors: Vec<Vendor>,
    selection: Option<BoothId>,
    dirty: bool,
    /// Bumped by every mutation.
    revision: u64,
    /// Revision captured by the save in flight.
    saving_revision: Option<u64>,
    save_state: SaveState,
}

impl EditorSession {
    /// Open a session on a loaded (or freshly defaulted) plan.
    pub fn new(config: FloorPlanConfig) -> Self {
        let id = Uuid::new_v4();
        log::debug!("Opened editor session {} for {}", id, config.show_id);
        Self {
            id,
            config,
            vendors: Vec::new(),
            selection: None,
            dirty: false,
            revision: 0,
            saving_revision: None,
            save_state: SaveState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &FloorPlanConfig {
        &self.config
    }

    /// Give the plan back, ending the session.
    pub fn into_config(self) -> FloorPlanConfig {
        self.config
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    /// Install the vendor directory snapshot once it has been fetched.
    pub fn set_vendors(&mut self, vendors: Vec<Vendor>) {
        self.vendors = vendors;
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected_booth(&self) -> Option<&Booth> {
        self.selection.as_deref().and_then(|id| self.config.booth(id))
    }

    /// Select an existing booth. Returns false for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        if self.config.booth(id).is_none() {
            return false;
        }
        self.selection = Some(id.to_string());
        true
    }

    /// Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mutation counter; changes whenever the plan does.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save_state
    }

    /// The save control is enabled only while no save is in flight.
    pub fn can_save(&self) -> bool {
        self.save_state != SaveState::InFlight
    }

    pub fn create_booth(
        &mut self,
        origin: Point,
        width_feet: u32,
        height_feet: u32,
    ) -> Result<BoothId, SessionError> {
        let id = self
            .config
            .create_booth(origin, width_feet, height_feet)?
            .id()
            .to_string();
        self.touch();
        log::info!("Created {} ({}x{} ft)", id, width_feet, height_feet);
        Ok(id)
    }

    /// Move a booth's top-left corner. Returns the clamped position.
    pub fn move_booth(&mut self, id: &str, origin: Point) -> Result<Point, SessionError> {
        let booth = self
            .config
            .booth_mut(id)
            .ok_or_else(|| BoothError::NotFound(id.to_string()))?;
        let before = booth.origin();
        booth.set_position(origin);
        let after = booth.origin();
        if after != before {
            self.touch();
        }
        Ok(after)
    }

    /// Remove a booth, dropping it from the selection.
    pub fn delete_booth(&mut self, id: &str) -> Option<Booth> {
        let removed = self.config.remove_booth(id)?;
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
        self.touch();
        log::info!("Deleted {}", id);
        Some(removed)
    }

    pub fn update_booth(&mut self, id: &str, update: &BoothUpdate) -> Result<(), SessionError> {
        self.config.update_booth(id, update)?;
        self.touch();
        Ok(())
    }

    /// Assign by vendor id; `None` or an empty id clears the assignment.
    ///
    /// The vendor is resolved against the directory snapshot; unknown ids
    /// are rejected without changing the booth.
    pub fn assign_vendor(&mut self, booth_id: &str, vendor_id: Option<&str>) -> Result<(), SessionError> {
        let change = match vendor_id.map(str::trim).filter(|v| !v.is_empty()) {
            None => VendorChange::Clear,
            Some(vendor_id) => {
                let vendor = self
                    .vendors
                    .iter()
                    .find(|v| v.id == vendor_id)
                    .ok_or_else(|| SessionError::UnknownVendor(vendor_id.to_string()))?;
                VendorChange::Assign(vendor.clone())
            }
        };
        self.update_booth(booth_id, &BoothUpdate::vendor(change))
    }

    pub fn apply_calibration(&mut self, calibration: Calibration) {
        self.config.apply_calibration(calibration);
        self.touch();
    }

    /// Use an uploaded image as the background.
    pub fn set_background(&mut self, image: &UploadedImage) {
        self.config
            .set_background(image.reference.clone(), image.width, image.height);
        self.touch();
    }

    pub fn set_visibility(&mut self, visibility: VisibilitySettings) {
        self.config.visibility = visibility;
        self.touch();
    }

    /// Property panel for a booth.
    pub fn panel(&self, id: &str) -> Option<BoothPanel> {
        let booth = self.config.booth(id)?;
        Some(BoothPanel {
            id: booth.id().to_string(),
            x: booth.x(),
            y: booth.y(),
            width_feet: booth.width_feet(),
            height_feet: booth.height_feet(),
            category: booth.category,
            vendor_id: booth.vendor_id().map(str::to_string),
            vendor_label: vendor_label(booth, &self.vendors).to_string(),
        })
    }

    /// Start a save: returns the document to write and disables further saves.
    pub fn begin_save(&mut self) -> Result<FloorPlanConfig, SessionError> {
        if self.save_state == SaveState::InFlight {
            return Err(SessionError::SaveInFlight);
        }
        self.save_state = SaveState::InFlight;
        self.saving_revision = Some(self.revision);
        log::info!("Saving floor plan for {}", self.config.show_id);
        Ok(self.config.clone())
    }

    /// Record the outcome of the save started by [`EditorSession::begin_save`].
    ///
    /// A failure is kept for display; the in-memory plan is never rolled back.
    /// Edits made while the save was in flight keep the session dirty.
    pub fn finish_save(&mut self, result: Result<(), StorageError>) -> Result<(), SessionError> {
        if self.save_state != SaveState::InFlight {
            return Err(SessionError::NoSaveInFlight);
        }
        let saved_revision = self.saving_revision.take();
        match result {
            Ok(()) => {
                self.save_state = SaveState::Idle;
                if saved_revision == Some(self.revision) {
                    self.dirty = false;
                } else {
                    log::debug!("Plan changed during save; still dirty");
                }
                log::info!("Saved floor plan for {}", self.config.show_id);
            }
            Err(e) => {
                log::error!("Failed to save floor plan for {}: {}", self.config.show_id, e);
                self.save_state = SaveState::Failed(e.to_string());
            }
        }
        Ok(())
    }
}
