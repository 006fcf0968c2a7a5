//! Reference visibility gate for the public view.

use boothplan_core::{DenyReason, GateDecision, Viewer, VisibilityGate, VisibilitySettings};
use chrono::{DateTime, Utc};

/// Hides the plan before its public date, and from unpaid vendors when
/// payment is required. Operators always see it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatePaymentGate;

impl VisibilityGate for DatePaymentGate {
    fn decide(&self, settings: &VisibilitySettings, viewer: Viewer, now: DateTime<Utc>) -> GateDecision {
        match viewer {
            Viewer::Operator => GateDecision::Render,
            _ if settings.public_visible_date.is_some_and(|date| now < date) => {
                GateDecision::Deny(DenyReason::NotYetPublic)
            }
            Viewer::Vendor { paid: false } if settings.vendor_requires_paid => {
                GateDecision::Deny(DenyReason::PaymentRequired)
            }
            _ => GateDecision::Render,
        }
    }
}
