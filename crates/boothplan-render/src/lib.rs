//! BoothPlan Render Library
//!
//! Deterministic, backend-neutral rendering of floor plans. The editor and
//! the public viewer call the same [`render`] function and differ only in
//! [`RenderOptions`].

pub mod drawing;
mod legend;
mod preview;
mod renderer;
mod svg;

pub use drawing::{BoothMeta, DrawItem, Drawing, TextRole};
pub use legend::{LegendEntry, legend};
pub use preview::apply_drag_preview;
pub use renderer::{PLACEHOLDER_MESSAGE, RenderOptions, RenderStyle, feet_label, placeholder, render};
pub use svg::{to_svg, to_svg_with_images};
