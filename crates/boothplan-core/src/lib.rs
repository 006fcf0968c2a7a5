//! BoothPlan Core Library
//!
//! Platform-agnostic floor plan model, calibration, coordinate mapping and
//! interaction logic for the BoothPlan booth layout editor.

pub mod booth;
pub mod calibration;
pub mod category;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod input;
pub mod model;
pub mod session;
pub mod snap;
pub mod storage;
pub mod transform;
pub mod vendor;
pub mod visibility;

pub use booth::{Booth, BoothError, BoothId, BoothUpdate, VendorChange};
pub use calibration::{Calibration, CalibrationEngine, CalibrationError, CalibrationStep};
pub use category::{AVAILABLE_COLOR, AVAILABLE_LABEL, Category, Rgba};
pub use config::{BoothPreset, EditorConfig};
pub use controller::{DragPreview, Effect, InteractionController, Mode};
pub use gateway::{PersistenceGateway, SaveError};
pub use input::{Key, KeyEvent, PointerEvent, PointerId, PointerKind};
pub use model::FloorPlanConfig;
pub use session::{BoothPanel, EditorSession, SaveState, SessionError};
pub use snap::{SnapResult, snap_point, snap_to_grid};
pub use storage::{ImageStore, Storage, StorageError, StorageResult, UploadedImage};
pub use transform::CoordinateTransform;
pub use vendor::{UNASSIGNED_LABEL, Vendor, VendorDirectory};
pub use visibility::{DenyReason, GateDecision, Viewer, VisibilityGate, VisibilitySettings};
