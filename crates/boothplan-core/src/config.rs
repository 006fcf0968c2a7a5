//! Editor configuration.

use serde::{Deserialize, Serialize};

/// A draggable entry in the booth bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothPreset {
    pub label: String,
    pub width_feet: u32,
    pub height_feet: u32,
    /// Custom presets drop at the default size and are sized afterwards
    /// in the property panel.
    #[serde(default)]
    pub custom: bool,
}

impl BoothPreset {
    pub fn new(width_feet: u32, height_feet: u32) -> Self {
        Self {
            label: format!("{}x{}", width_feet, height_feet),
            width_feet,
            height_feet,
            custom: false,
        }
    }

    pub fn custom(default_feet: u32) -> Self {
        Self {
            label: "Custom".to_string(),
            width_feet: default_feet,
            height_feet: default_feet,
            custom: true,
        }
    }
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Side length in feet used by the custom preset.
    pub default_booth_feet: u32,
    /// Arrow-key step in layout pixels while the plan is uncalibrated.
    pub nudge_px: f64,
    /// Pointer hit tolerance in screen pixels.
    pub hit_tolerance: f64,
    /// Entries offered in the booth bank.
    pub presets: Vec<BoothPreset>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_booth_feet: 10,
            nudge_px: 1.0,
            hit_tolerance: 0.0,
            presets: vec![
                BoothPreset::new(10, 10),
                BoothPreset::new(10, 20),
                BoothPreset::new(20, 20),
                BoothPreset::custom(10),
            ],
        }
    }
}

impl EditorConfig {
    /// Parse from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn preset(&self, label: &str) -> Option<&BoothPreset> {
        self.presets.iter().find(|p| p.label == label)
    }
}
