//! Floor plan document.

use crate::booth::{Booth, BoothError, BoothId, BoothIdGenerator, BoothUpdate, UNCALIBRATED_PIXELS_PER_FOOT};
use crate::calibration::Calibration;
use crate::visibility::VisibilitySettings;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// One show's floor plan: background image, scale, booths and visibility flags.
///
/// This is the persisted document. It is stored whole, one per show id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlanConfig {
    /// Show this plan belongs to.
    pub show_id: String,
    /// Reference to the uploaded background image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_ref: Option<String>,
    /// Native width of the background image in pixels.
    #[serde(default)]
    pub image_width: u32,
    /// Native height of the background image in pixels.
    #[serde(default)]
    pub image_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calibration: Option<Calibration>,
    /// Booths in paint order (later booths are drawn on top).
    #[serde(default)]
    booths: Vec<Booth>,
    #[serde(default)]
    pub visibility: VisibilitySettings,
}

impl FloorPlanConfig {
    /// Defaults for a show with no saved plan.
    pub fn new(show_id: impl Into<String>) -> Self {
        Self {
            show_id: show_id.into(),
            background_image_ref: None,
            image_width: 0,
            image_height: 0,
            calibration: None,
            booths: Vec::new(),
            visibility: VisibilitySettings::default(),
        }
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// The calibrated scale, `None` until calibration completes.
    pub fn pixels_per_foot(&self) -> Option<f64> {
        self.calibration.map(|c| c.pixels_per_foot)
    }

    /// Scale used to derive booth pixel sizes, with a provisional value
    /// before calibration.
    pub fn effective_pixels_per_foot(&self) -> f64 {
        self.pixels_per_foot().unwrap_or(UNCALIBRATED_PIXELS_PER_FOOT)
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Install a new calibration and rederive every booth's pixel size.
    ///
    /// Booth feet and positions are left alone.
    pub fn apply_calibration(&mut self, calibration: Calibration) {
        self.calibration = Some(calibration);
        let ppf = calibration.pixels_per_foot;
        for booth in &mut self.booths {
            booth.recompute_pixel_size(ppf);
        }
        log::info!(
            "Calibrated {}: {:.2} px/ft ({} booths resized)",
            self.show_id,
            ppf,
            self.booths.len()
        );
    }

    /// Point the plan at a newly uploaded background.
    pub fn set_background(&mut self, reference: impl Into<String>, width: u32, height: u32) {
        self.background_image_ref = Some(reference.into());
        self.image_width = width;
        self.image_height = height;
    }

    /// Whether there is a background with usable dimensions.
    pub fn has_background(&self) -> bool {
        self.background_image_ref
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
            && self.image_width > 0
            && self.image_height > 0
    }

    /// Native background size, or `None` when unusable.
    pub fn image_size(&self) -> Option<Size> {
        self.has_background()
            .then(|| Size::new(f64::from(self.image_width), f64::from(self.image_height)))
    }

    pub fn booths(&self) -> &[Booth] {
        &self.booths
    }

    pub fn booth(&self, id: &str) -> Option<&Booth> {
        self.booths.iter().find(|b| b.id() == id)
    }

    pub fn booth_mut(&mut self, id: &str) -> Option<&mut Booth> {
        self.booths.iter_mut().find(|b| b.id() == id)
    }

    pub fn booth_ids(&self) -> impl Iterator<Item = &str> {
        self.booths.iter().map(|b| b.id())
    }

    pub fn len(&self) -> usize {
        self.booths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.booths.is_empty()
    }

    /// Id generator positioned after every booth currently in the plan.
    pub fn id_generator(&self) -> BoothIdGenerator {
        BoothIdGenerator::after(self.booth_ids())
    }

    /// Create a booth with a fresh id at `origin` and append it on top.
    pub fn create_booth(
        &mut self,
        origin: Point,
        width_feet: u32,
        height_feet: u32,
    ) -> Result<&Booth, BoothError> {
        let id = self.id_generator().next_id();
        let booth = Booth::new(id, origin, width_feet, height_feet, self.effective_pixels_per_foot())?;
        self.booths.push(booth);
        Ok(&self.booths[self.booths.len() - 1])
    }

    /// Append an externally built booth; ids must stay unique.
    pub fn add_booth(&mut self, mut booth: Booth) -> Result<(), BoothError> {
        if self.booth(booth.id()).is_some() {
            return Err(BoothError::DuplicateId(booth.id().to_string()));
        }
        booth.normalize(self.effective_pixels_per_foot());
        self.booths.push(booth);
        Ok(())
    }

    pub fn remove_booth(&mut self, id: &str) -> Option<Booth> {
        let index = self.booths.iter().position(|b| b.id() == id)?;
        Some(self.booths.remove(index))
    }

    /// Apply a property-panel patch to one booth.
    pub fn update_booth(&mut self, id: &str, update: &BoothUpdate) -> Result<(), BoothError> {
        let ppf = self.effective_pixels_per_foot();
        let booth = self
            .booth_mut(id)
            .ok_or_else(|| BoothError::NotFound(id.to_string()))?;
        booth.apply(update, ppf)
    }

    /// Booths under a layout-space point, topmost first.
    pub fn booths_at_point(&self, point: Point, tolerance: f64) -> Vec<BoothId> {
        self.booths
            .iter()
            .rev()
            .filter(|b| b.hit_test(point, tolerance))
            .map(|b| b.id().to_string())
            .collect()
    }

    /// Union of all booth rectangles.
    pub fn bounds(&self) -> Option<Rect> {
        self.booths
            .iter()
            .map(Booth::rect)
            .reduce(|acc, r| acc.union(r))
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON, repairing derived fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    /// Restore invariants on a document from an untrusted source: the scale
    /// is rederived from the calibration points (an unusable calibration is
    /// dropped), pixel sizes follow the scale, positions are non-negative,
    /// vendor id and name go together, and duplicate ids are dropped (first
    /// one wins).
    pub fn normalize(&mut self) {
        if let Some(stored) = self.calibration {
            match Calibration::from_points(stored.point1, stored.point2, stored.real_distance_feet) {
                Ok(calibration) => self.calibration = Some(calibration),
                Err(e) => {
                    log::warn!("Dropping invalid calibration in {}: {}", self.show_id, e);
                    self.calibration = None;
                }
            }
        }
        let ppf = self.effective_pixels_per_foot();
        let mut seen = std::collections::HashSet::new();
        self.booths.retain(|b| {
            let fresh = seen.insert(b.id().to_string());
            if !fresh {
                log::warn!("Dropping duplicate booth id {} in {}", b.id(), self.show_id);
            }
            fresh
        });
        for booth in &mut self.booths {
            booth.normalize(ppf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::vendor::Vendor;

    fn calibrated(ppf_feet: f64) -> Calibration {
        Calibration::from_points(Point::ZERO, Point::new(100.0, 0.0), ppf_feet).unwrap()
    }

    #[test]
    fn test_new_config_defaults() {
        let config = FloorPlanConfig::new("spring-expo");
        assert!(config.is_empty());
        assert!(config.calibration().is_none());
        assert!(!config.has_background());
        assert!(config.visibility.public_visible_date.is_none());
        assert!(!config.visibility.vendor_requires_paid);
    }

    #[test]
    fn test_recalibration_rederives_pixels() {
        let mut config = FloorPlanConfig::new("show");
        config.apply_calibration(calibrated(10.0));
        config.create_booth(Point::new(30.0, 40.0), 10, 20).unwrap();
        config.create_booth(Point::new(300.0, 40.0), 8, 8).unwrap();

        // 100 px over 4 ft = 25 px/ft
        config.apply_calibration(calibrated(4.0));
        assert_eq!(config.pixels_per_foot(), Some(25.0));
        for booth in config.booths() {
            assert_eq!(booth.width_px(), f64::from(booth.width_feet()) * 25.0);
            assert_eq!(booth.height_px(), f64::from(booth.height_feet()) * 25.0);
        }
        let first = &config.booths()[0];
        assert_eq!((first.width_feet(), first.height_feet()), (10, 20));
        assert_eq!(first.origin(), Point::new(30.0, 40.0));
    }

    #[test]
    fn test_create_booth_ids_unique() {
        let mut config = FloorPlanConfig::new("show");
        for i in 0..50 {
            config.create_booth(Point::new(i as f64, 0.0), 10, 10).unwrap();
        }
        config.remove_booth("booth-50");
        config.create_booth(Point::ZERO, 10, 10).unwrap();

        let mut ids: Vec<&str> = config.booth_ids().collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut config = FloorPlanConfig::new("show");
        let id = config.create_booth(Point::ZERO, 10, 10).unwrap().id().to_string();
        let dup = Booth::new(id.clone(), Point::ZERO, 5, 5, 10.0).unwrap();
        assert_eq!(config.add_booth(dup), Err(BoothError::DuplicateId(id)));
    }

    #[test]
    fn test_booths_at_point_topmost_first() {
        let mut config = FloorPlanConfig::new("show");
        config.create_booth(Point::new(0.0, 0.0), 10, 10).unwrap();
        config.create_booth(Point::new(50.0, 50.0), 10, 10).unwrap();

        let hits = config.booths_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec!["booth-2".to_string(), "booth-1".to_string()]);
        assert!(config.booths_at_point(Point::new(500.0, 500.0), 0.0).is_empty());
    }

    #[test]
    fn test_update_unknown_booth() {
        let mut config = FloorPlanConfig::new("show");
        let result = config.update_booth("nope", &BoothUpdate::size(10, 10));
        assert_eq!(result, Err(BoothError::NotFound("nope".into())));
    }

    #[test]
    fn test_has_background_requires_dimensions() {
        let mut config = FloorPlanConfig::new("show");
        config.set_background("hall.png", 0, 600);
        assert!(!config.has_background());
        config.set_background("hall.png", 800, 600);
        assert!(config.has_background());
        assert_eq!(config.image_size(), Some(Size::new(800.0, 600.0)));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let mut config = FloorPlanConfig::new("show");
        config.set_background("hall.png", 800, 600);
        config.apply_calibration(calibrated(10.0));
        config.create_booth(Point::new(10.0, 10.0), 10, 10).unwrap();

        let json = config.to_json().unwrap();
        assert!(json.contains("\"backgroundImageRef\""));
        assert!(json.contains("\"pixelsPerFoot\""));
        assert!(json.contains("\"realDistanceFeet\""));
        assert!(json.contains("\"widthFeet\""));
        assert!(json.contains("\"vendorRequiresPaid\""));

        let loaded = FloorPlanConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_json_normalizes() {
        let json = r#"{
            "showId": "show",
            "calibration": {"point1":{"x":0,"y":0},"point2":{"x":100,"y":0},
                            "realDistanceFeet":10,"pixelsPerFoot":10},
            "booths": [
                {"id":"booth-1","x":-5,"y":3,"widthFeet":10,"heightFeet":10,"widthPx":1,"heightPx":1,
                 "category":"Roofing","vendorName":"Orphan"},
                {"id":"booth-1","x":0,"y":0,"widthFeet":5,"heightFeet":5,"widthPx":50,"heightPx":50}
            ]
        }"#;
        let config = FloorPlanConfig::from_json(json).unwrap();
        assert_eq!(config.len(), 1);
        let booth = &config.booths()[0];
        assert_eq!(booth.x(), 0.0);
        assert_eq!(booth.width_px(), 100.0);
        assert_eq!(booth.vendor_name(), None);
        assert_eq!(booth.category, Some(Category::Roofing));
    }

    #[test]
    fn test_uncalibrated_booths_use_provisional_scale() {
        let mut config = FloorPlanConfig::new("show");
        let booth = config.create_booth(Point::ZERO, 10, 10).unwrap();
        assert_eq!(booth.width_px(), 10.0 * UNCALIBRATED_PIXELS_PER_FOOT);
    }

    #[test]
    fn test_update_booth_vendor() {
        let mut config = FloorPlanConfig::new("show");
        let id = config.create_booth(Point::ZERO, 10, 10).unwrap().id().to_string();
        let update = BoothUpdate::vendor(crate::booth::VendorChange::Assign(
            Vendor::new("v1", "Acme").with_category("Solar"),
        ));
        config.update_booth(&id, &update).unwrap();
        assert_eq!(config.booth(&id).unwrap().category, Some(Category::Solar));
    }

    #[test]
    fn test_from_json_rederives_scale() {
        let json = r#"{
            "showId": "show",
            "calibration": {"point1":{"x":0,"y":0},"point2":{"x":100,"y":0},
                            "realDistanceFeet":10,"pixelsPerFoot":-10},
            "booths": [{"id":"booth-1","x":0,"y":0,"widthFeet":10,"heightFeet":10,"widthPx":-100,"heightPx":-100}]
        }"#;
        let config = FloorPlanConfig::from_json(json).unwrap();
        assert_eq!(config.pixels_per_foot(), Some(10.0));
        assert_eq!(config.booths()[0].width_px(), 100.0);
        assert_eq!(config.booths()[0].height_px(), 100.0);
    }

    #[test]
    fn test_from_json_drops_unusable_calibration() {
        for calibration in [
            r#"{"point1":{"x":5,"y":5},"point2":{"x":5,"y":5},"realDistanceFeet":10,"pixelsPerFoot":0}"#,
            r#"{"point1":{"x":0,"y":0},"point2":{"x":100,"y":0},"realDistanceFeet":-4,"pixelsPerFoot":-25}"#,
            r#"{"point1":{"x":0,"y":0},"point2":{"x":100,"y":0},"realDistanceFeet":0,"pixelsPerFoot":0}"#,
        ] {
            let json = format!(
                r#"{{"showId":"show","calibration":{calibration},
                    "booths":[{{"id":"booth-1","x":0,"y":0,"widthFeet":10,"heightFeet":10,"widthPx":0,"heightPx":0}}]}}"#
            );
            let config = FloorPlanConfig::from_json(&json).unwrap();
            assert!(!config.is_calibrated(), "{calibration}");
            assert_eq!(config.booths()[0].width_px(), 10.0 * UNCALIBRATED_PIXELS_PER_FOOT);
        }
    }
}
