//! Booths: placeable rectangular exhibit spaces.

use crate::category::Category;
use crate::vendor::Vendor;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Booth identifier, unique within a floor plan.
pub type BoothId = String;

/// Scale used for pixel sizes before the plan has been calibrated.
pub const UNCALIBRATED_PIXELS_PER_FOOT: f64 = 10.0;

/// Errors raised by booth mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoothError {
    #[error("Booth dimensions must be positive whole feet, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Booth not found: {0}")]
    NotFound(BoothId),
    #[error("Duplicate booth id: {0}")]
    DuplicateId(BoothId),
}

/// A rectangular exhibit space.
///
/// Position is the top-left corner in layout pixels. The real-world size is
/// held in whole feet; the pixel size is derived from the current scale and
/// never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booth {
    id: BoothId,
    x: f64,
    y: f64,
    width_feet: u32,
    height_feet: u32,
    width_px: f64,
    height_px: f64,
    /// Exhibit category; operator-set or filled from the assigned vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor_id: Option<String>,
    /// Denormalized copy of the vendor's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor_name: Option<String>,
}

impl Booth {
    /// Create a booth at `origin` (clamped to the positive quadrant).
    pub fn new(
        id: BoothId,
        origin: Point,
        width_feet: u32,
        height_feet: u32,
        pixels_per_foot: f64,
    ) -> Result<Self, BoothError> {
        validate_size(width_feet, height_feet)?;
        let mut booth = Self {
            id,
            x: 0.0,
            y: 0.0,
            width_feet,
            height_feet,
            width_px: 0.0,
            height_px: 0.0,
            category: None,
            vendor_id: None,
            vendor_name: None,
        };
        booth.set_position(origin);
        booth.recompute_pixel_size(pixels_per_foot);
        Ok(booth)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn width_feet(&self) -> u32 {
        self.width_feet
    }

    pub fn height_feet(&self) -> u32 {
        self.height_feet
    }

    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    pub fn height_px(&self) -> f64 {
        self.height_px
    }

    pub fn vendor_id(&self) -> Option<&str> {
        self.vendor_id.as_deref()
    }

    pub fn vendor_name(&self) -> Option<&str> {
        self.vendor_name.as_deref()
    }

    pub fn is_assigned(&self) -> bool {
        self.vendor_id.is_some()
    }

    /// Bounds in layout pixels.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width_px, self.y + self.height_px)
    }

    /// Move the top-left corner, clamping each coordinate to `>= 0`.
    pub fn set_position(&mut self, origin: Point) {
        // f64::max also maps NaN to 0
        self.x = origin.x.max(0.0);
        self.y = origin.y.max(0.0);
    }

    /// Move by a delta, with the same clamping as [`Booth::set_position`].
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.origin() + delta);
    }

    /// Change the real-world size and rederive pixels.
    pub fn resize(
        &mut self,
        width_feet: u32,
        height_feet: u32,
        pixels_per_foot: f64,
    ) -> Result<(), BoothError> {
        validate_size(width_feet, height_feet)?;
        self.width_feet = width_feet;
        self.height_feet = height_feet;
        self.recompute_pixel_size(pixels_per_foot);
        Ok(())
    }

    /// Rederive `width_px`/`height_px` from feet. Feet and position are untouched.
    pub fn recompute_pixel_size(&mut self, pixels_per_foot: f64) {
        self.width_px = f64::from(self.width_feet) * pixels_per_foot;
        self.height_px = f64::from(self.height_feet) * pixels_per_foot;
    }

    /// Assign a vendor, caching its name.
    ///
    /// The vendor's category fills in only when the booth has none.
    /// Returns whether the category was filled.
    pub fn assign_vendor(&mut self, vendor: &Vendor) -> bool {
        self.vendor_id = Some(vendor.id.clone());
        self.vendor_name = Some(vendor.name.clone());
        if self.category.is_none() {
            if let Some(category) = vendor.booth_category() {
                self.category = Some(category);
                return true;
            }
        }
        false
    }

    /// Remove the assignment; id and cached name go together.
    pub fn clear_vendor(&mut self) {
        self.vendor_id = None;
        self.vendor_name = None;
    }

    /// Filled-rectangle hit test in layout space.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.rect().inflate(tolerance, tolerance).contains(point)
    }

    /// Repair a booth read from an untrusted document.
    pub(crate) fn normalize(&mut self, pixels_per_foot: f64) {
        if self.vendor_id.is_none() || self.vendor_name.is_none() {
            self.clear_vendor();
        }
        self.set_position(self.origin());
        self.recompute_pixel_size(pixels_per_foot);
    }

    /// Apply a property-panel patch.
    ///
    /// The size is validated before anything changes, so a rejected update
    /// leaves the booth as it was. An explicit category in the same patch is
    /// applied before the vendor so the operator's choice wins.
    pub fn apply(&mut self, update: &BoothUpdate, pixels_per_foot: f64) -> Result<(), BoothError> {
        let width = update.width_feet.unwrap_or(self.width_feet);
        let height = update.height_feet.unwrap_or(self.height_feet);
        validate_size(width, height)?;

        if update.width_feet.is_some() || update.height_feet.is_some() {
            self.resize(width, height, pixels_per_foot)?;
        }
        if update.x.is_some() || update.y.is_some() {
            self.set_position(Point::new(
                update.x.unwrap_or(self.x),
                update.y.unwrap_or(self.y),
            ));
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        match &update.vendor {
            Some(VendorChange::Assign(vendor)) => {
                self.assign_vendor(vendor);
            }
            Some(VendorChange::Clear) => self.clear_vendor(),
            None => {}
        }
        Ok(())
    }
}

fn validate_size(width: u32, height: u32) -> Result<(), BoothError> {
    if width == 0 || height == 0 {
        return Err(BoothError::InvalidSize { width, height });
    }
    Ok(())
}

/// Change to a booth's vendor assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorChange {
    Assign(Vendor),
    Clear,
}

/// A patch from the property panel. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoothUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width_feet: Option<u32>,
    pub height_feet: Option<u32>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<Category>>,
    pub vendor: Option<VendorChange>,
}

impl BoothUpdate {
    pub fn size(width_feet: u32, height_feet: u32) -> Self {
        Self {
            width_feet: Some(width_feet),
            height_feet: Some(height_feet),
            ..Self::default()
        }
    }

    pub fn category(category: Option<Category>) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn vendor(change: VendorChange) -> Self {
        Self {
            vendor: Some(change),
            ..Self::default()
        }
    }
}

/// Produces booth ids of the form `booth-<n>`.
///
/// The sequence starts past the largest `<n>` already in use, and `<n>` is
/// printed without leading zeros, so a generated id can never equal an
/// existing one. Once the sequence reaches `u64::MAX` it continues with the
/// lowest unused `<n>`.
#[derive(Debug, Clone)]
pub struct BoothIdGenerator {
    next: Option<u64>,
    used: BTreeSet<u64>,
}

impl BoothIdGenerator {
    pub const PREFIX: &'static str = "booth-";

    /// Start after every id in `existing`.
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let used: BTreeSet<u64> = existing.into_iter().filter_map(Self::sequence_of).collect();
        let next = match used.last() {
            Some(&max) => max.checked_add(1),
            None => Some(1),
        };
        Self { next, used }
    }

    pub fn next_id(&mut self) -> BoothId {
        let n = match self.next {
            Some(n) => {
                self.next = n.checked_add(1);
                n
            }
            None => self.lowest_unused(),
        };
        self.used.insert(n);
        format!("{}{}", Self::PREFIX, n)
    }

    fn lowest_unused(&self) -> u64 {
        let mut candidate = 1;
        for &n in self.used.range(1..) {
            if n != candidate {
                break;
            }
            candidate = candidate.saturating_add(1);
        }
        candidate
    }

    fn sequence_of(id: &str) -> Option<u64> {
        id.strip_prefix(Self::PREFIX)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booth() -> Booth {
        Booth::new("booth-1".into(), Point::new(20.0, 30.0), 10, 20, 12.5).unwrap()
    }

    #[test]
    fn test_booth_creation_derives_pixels() {
        let b = booth();
        assert!((b.width_px() - 125.0).abs() < f64::EPSILON);
        assert!((b.height_px() - 250.0).abs() < f64::EPSILON);
        assert_eq!(b.rect(), Rect::new(20.0, 30.0, 145.0, 280.0));
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = Booth::new("b".into(), Point::ZERO, 0, 10, 10.0).unwrap_err();
        assert_eq!(err, BoothError::InvalidSize { width: 0, height: 10 });
    }

    #[test]
    fn test_position_clamped() {
        let mut b = booth();
        b.set_position(Point::new(-50.0, -20.0));
        assert_eq!(b.origin(), Point::ZERO);

        b.translate(Vec2::new(15.0, -3.0));
        assert_eq!(b.origin(), Point::new(15.0, 0.0));

        b.set_position(Point::new(f64::NAN, 5000.0));
        assert_eq!(b.origin(), Point::new(0.0, 5000.0));
    }

    #[test]
    fn test_recompute_keeps_feet_and_anchor() {
        let mut b = booth();
        b.recompute_pixel_size(4.0);
        assert_eq!(b.width_feet(), 10);
        assert_eq!(b.height_feet(), 20);
        assert_eq!(b.origin(), Point::new(20.0, 30.0));
        assert!((b.width_px() - 40.0).abs() < f64::EPSILON);
        assert!((b.height_px() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_assign_fills_empty_category() {
        let mut b = booth();
        let vendor = Vendor::new("v1", "Acme Roofing").with_category("Roofing");
        assert!(b.assign_vendor(&vendor));
        assert_eq!(b.category, Some(Category::Roofing));
        assert_eq!(b.vendor_id(), Some("v1"));
        assert_eq!(b.vendor_name(), Some("Acme Roofing"));
    }

    #[test]
    fn test_assign_keeps_operator_category() {
        let mut b = booth();
        b.category = Some(Category::Custom);
        let vendor = Vendor::new("v1", "Acme Roofing").with_category("Roofing");
        assert!(!b.assign_vendor(&vendor));
        assert_eq!(b.category, Some(Category::Custom));
    }

    #[test]
    fn test_clearing_vendor_clears_name() {
        let mut b = booth();
        b.assign_vendor(&Vendor::new("v1", "Acme"));
        b.apply(&BoothUpdate::vendor(VendorChange::Clear), 12.5).unwrap();
        assert_eq!(b.vendor_id(), None);
        assert_eq!(b.vendor_name(), None);
    }

    #[test]
    fn test_apply_is_atomic_on_invalid_size() {
        let mut b = booth();
        let before = b.clone();
        let update = BoothUpdate {
            x: Some(500.0),
            width_feet: Some(0),
            category: Some(Some(Category::Solar)),
            ..BoothUpdate::default()
        };
        assert!(b.apply(&update, 12.5).is_err());
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_category_before_vendor() {
        let mut b = booth();
        let update = BoothUpdate {
            category: Some(Some(Category::Custom)),
            vendor: Some(VendorChange::Assign(
                Vendor::new("v1", "Acme").with_category("Roofing"),
            )),
            ..BoothUpdate::default()
        };
        b.apply(&update, 12.5).unwrap();
        assert_eq!(b.category, Some(Category::Custom));
        assert_eq!(b.vendor_name(), Some("Acme"));
    }

    #[test]
    fn test_apply_resize() {
        let mut b = booth();
        b.apply(&BoothUpdate::size(20, 20), 12.5).unwrap();
        assert!((b.width_px() - 250.0).abs() < f64::EPSILON);
        assert!((b.height_px() - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_repairs_half_assignment() {
        let json = r#"{"id":"booth-3","x":-4,"y":10,"widthFeet":10,"heightFeet":10,
            "widthPx":1,"heightPx":1,"vendorId":"v9"}"#;
        let mut b: Booth = serde_json::from_str(json).unwrap();
        b.normalize(10.0);
        assert_eq!(b.vendor_id(), None);
        assert_eq!(b.x(), 0.0);
        assert!((b.width_px() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_id_generator_starts_after_existing() {
        let mut id_gen = BoothIdGenerator::after(["booth-3", "booth-11", "lobby", "booth-x"]);
        assert_eq!(id_gen.next_id(), "booth-12");
        assert_eq!(id_gen.next_id(), "booth-13");
    }

    #[test]
    fn test_id_generator_ignores_padded_ids() {
        let mut id_gen = BoothIdGenerator::after(["booth-007"]);
        let id = id_gen.next_id();
        assert_eq!(id, "booth-8");
        assert_ne!(id, "booth-007");
    }

    #[test]
    fn test_id_generator_at_max_suffix() {
        let max = format!("booth-{}", u64::MAX);
        let mut id_gen = BoothIdGenerator::after([max.as_str(), "booth-1", "booth-2"]);
        assert_eq!(id_gen.next_id(), "booth-3");
        assert_eq!(id_gen.next_id(), "booth-4");
    }

    #[test]
    fn test_id_generator_ids_stay_unique_past_max() {
        let near = format!("booth-{}", u64::MAX - 1);
        let mut id_gen = BoothIdGenerator::after([near.as_str(), "booth-1"]);
        let ids: Vec<BoothId> = (0..4).map(|_| id_gen.next_id()).collect();
        assert_eq!(ids, vec![format!("booth-{}", u64::MAX), "booth-2".into(), "booth-3".into(), "booth-4".into()]);
    }
}
