//! Visibility flags stored with a floor plan.
//!
//! The plan only carries the flags. Deciding whether a given viewer may see
//! the plan belongs to a [`VisibilityGate`] supplied by the embedding
//! application; operators are never gated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flags a viewer-side gate consults before rendering the public view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilitySettings {
    /// The plan is hidden from the public before this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_visible_date: Option<DateTime<Utc>>,
    /// Vendor viewers must have paid to see the plan.
    #[serde(default)]
    pub vendor_requires_paid: bool,
}

/// Who is asking to see a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Viewer {
    /// Show staff editing the plan.
    Operator,
    /// A registered vendor, with their payment status.
    Vendor { paid: bool },
    /// Anyone else.
    Public,
}

/// Why a viewer was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotYetPublic,
    PaymentRequired,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Deny(DenyReason),
}

impl GateDecision {
    pub fn is_render(self) -> bool {
        matches!(self, GateDecision::Render)
    }
}

/// Viewer-side rule set deciding whether to render a plan.
pub trait VisibilityGate {
    fn decide(&self, settings: &VisibilitySettings, viewer: Viewer, now: DateTime<Utc>) -> GateDecision;
}
