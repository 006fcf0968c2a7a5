//! Booth categories and their display colors.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// CSS hex notation (`#rrggbb`), alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Fill used for booths without a category, and for the legend's "Available" entry.
pub const AVAILABLE_COLOR: Rgba = Rgba::opaque(229, 231, 235);

/// Label of the constant legend entry for unassigned space.
pub const AVAILABLE_LABEL: &str = "Available";

/// The fixed set of exhibit categories a booth can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Roofing")]
    Roofing,
    #[serde(rename = "Windows & Doors")]
    WindowsAndDoors,
    #[serde(rename = "Siding")]
    Siding,
    #[serde(rename = "Kitchen & Bath")]
    KitchenAndBath,
    #[serde(rename = "Flooring")]
    Flooring,
    #[serde(rename = "HVAC")]
    Hvac,
    #[serde(rename = "Solar")]
    Solar,
    #[serde(rename = "Landscaping")]
    Landscaping,
    #[serde(rename = "Pools & Spas")]
    PoolsAndSpas,
    #[serde(rename = "Home Security")]
    HomeSecurity,
    #[serde(rename = "Interior Design")]
    InteriorDesign,
    #[serde(rename = "Financing")]
    Financing,
    #[serde(rename = "Custom")]
    Custom,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 13] = [
        Category::Roofing,
        Category::WindowsAndDoors,
        Category::Siding,
        Category::KitchenAndBath,
        Category::Flooring,
        Category::Hvac,
        Category::Solar,
        Category::Landscaping,
        Category::PoolsAndSpas,
        Category::HomeSecurity,
        Category::InteriorDesign,
        Category::Financing,
        Category::Custom,
    ];

    /// Display label (also the persisted form).
    pub fn label(self) -> &'static str {
        match self {
            Category::Roofing => "Roofing",
            Category::WindowsAndDoors => "Windows & Doors",
            Category::Siding => "Siding",
            Category::KitchenAndBath => "Kitchen & Bath",
            Category::Flooring => "Flooring",
            Category::Hvac => "HVAC",
            Category::Solar => "Solar",
            Category::Landscaping => "Landscaping",
            Category::PoolsAndSpas => "Pools & Spas",
            Category::HomeSecurity => "Home Security",
            Category::InteriorDesign => "Interior Design",
            Category::Financing => "Financing",
            Category::Custom => "Custom",
        }
    }

    /// Fill color used when rendering by category.
    pub fn color(self) -> Rgba {
        match self {
            Category::Roofing => Rgba::opaque(239, 68, 68),
            Category::WindowsAndDoors => Rgba::opaque(59, 130, 246),
            Category::Siding => Rgba::opaque(168, 85, 247),
            Category::KitchenAndBath => Rgba::opaque(20, 184, 166),
            Category::Flooring => Rgba::opaque(180, 83, 9),
            Category::Hvac => Rgba::opaque(14, 165, 233),
            Category::Solar => Rgba::opaque(234, 179, 8),
            Category::Landscaping => Rgba::opaque(34, 197, 94),
            Category::PoolsAndSpas => Rgba::opaque(6, 182, 212),
            Category::HomeSecurity => Rgba::opaque(100, 116, 139),
            Category::InteriorDesign => Rgba::opaque(236, 72, 153),
            Category::Financing => Rgba::opaque(132, 204, 22),
            Category::Custom => Rgba::opaque(249, 115, 22),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive match on the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
