//! Category legend.

use boothplan_core::category::{AVAILABLE_COLOR, AVAILABLE_LABEL, Rgba};
use boothplan_core::{Category, FloorPlanConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
    /// `None` for the "Available" entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// One entry per category in use, sorted by label, then "Available".
///
/// Built from booth categories only; vendor identity never appears. With
/// `color_by_category` off every swatch uses the neutral fill, matching a
/// render without category colors.
pub fn legend(config: &FloorPlanConfig, color_by_category: bool) -> Vec<LegendEntry> {
    let categories: BTreeSet<(&'static str, Category)> = config
        .booths()
        .iter()
        .filter_map(|booth| booth.category)
        .map(|category| (category.label(), category))
        .collect();

    categories
        .into_iter()
        .map(|(label, category)| LegendEntry {
            label: label.to_string(),
            color: if color_by_category {
                category.color()
            } else {
                AVAILABLE_COLOR
            },
            category: Some(category),
        })
        .chain(std::iter::once(LegendEntry {
            label: AVAILABLE_LABEL.to_string(),
            color: AVAILABLE_COLOR,
            category: None,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boothplan_core::{BoothUpdate, Vendor, VendorChange};
    use kurbo::Point;

    fn config_with(categories: &[Option<Category>]) -> FloorPlanConfig {
        let mut config = FloorPlanConfig::new("show");
        for (i, category) in categories.iter().enumerate() {
            let id = config
                .create_booth(Point::new(i as f64 * 200.0, 0.0), 10, 10)
                .unwrap()
                .id()
                .to_string();
            config
                .update_booth(&id, &BoothUpdate::category(*category))
                .unwrap();
        }
        config
    }

    fn labels(entries: &[LegendEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn test_sorted_distinct_categories() {
        let config = config_with(&[
            Some(Category::Solar),
            None,
            Some(Category::Hvac),
            Some(Category::Solar),
            Some(Category::Flooring),
        ]);
        let entries = legend(&config, true);
        assert_eq!(labels(&entries), ["Flooring", "HVAC", "Solar", "Available"]);
        assert_eq!(entries[1].color, Category::Hvac.color());
    }

    #[test]
    fn test_empty_plan_has_available_only() {
        let entries = legend(&FloorPlanConfig::new("show"), true);
        assert_eq!(labels(&entries), ["Available"]);
        assert_eq!(entries[0].color, AVAILABLE_COLOR);
    }

    #[test]
    fn test_neutral_swatches() {
        let config = config_with(&[Some(Category::Roofing)]);
        let entries = legend(&config, false);
        assert!(entries.iter().all(|e| e.color == AVAILABLE_COLOR));
    }

    #[test]
    fn test_never_leaks_vendor_names() {
        let mut config = config_with(&[None]);
        let id = config.booth_ids().next().unwrap().to_string();
        config
            .update_booth(
                &id,
                &BoothUpdate::vendor(VendorChange::Assign(
                    Vendor::new("v1", "Secret Roofing Co").with_category("Roofing"),
                )),
            )
            .unwrap();

        let json = serde_json::to_string(&legend(&config, true)).unwrap();
        assert!(json.contains("Roofing"));
        assert!(!json.contains("Secret"));
    }
}
