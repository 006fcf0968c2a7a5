//! SVG serialisation of a [`Drawing`].

use crate::drawing::{DrawItem, Drawing};
use boothplan_core::category::Rgba;
use std::fmt;

/// Serialise a drawing to a standalone SVG document.
///
/// Image items reference their stored reference verbatim.
pub fn to_svg(drawing: &Drawing) -> String {
    to_svg_with_images(drawing, |reference| reference.to_string())
}

/// Serialise a drawing, resolving image references to URLs with `image_href`.
pub fn to_svg_with_images(drawing: &Drawing, image_href: impl Fn(&str) -> String) -> String {
    SvgDocument { drawing, image_href }.to_string()
}

struct SvgDocument<'a, F> {
    drawing: &'a Drawing,
    image_href: F,
}

impl<F: Fn(&str) -> String> fmt::Display for SvgDocument<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (self.drawing.size.width, self.drawing.size.height);
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        for item in &self.drawing.items {
            write_item(f, item, &self.image_href)?;
        }
        writeln!(f, "</svg>")
    }
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &DrawItem, image_href: impl Fn(&str) -> String) -> fmt::Result {
    match item {
        DrawItem::Image { reference, rect } => writeln!(
            f,
            r#"  <image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"/>"#,
            escape(&image_href(reference)),
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        ),
        DrawItem::Rect {
            rect,
            fill,
            stroke,
            stroke_width,
            meta,
        } => {
            let id = meta
                .as_ref()
                .map(|m| format!(r#" data-booth-id="{}""#, escape(&m.booth_id)))
                .unwrap_or_default();
            writeln!(
                f,
                r#"  <rect x="{}" y="{}" width="{}" height="{}"{}{}{}/>"#,
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height(),
                paint("fill", *fill),
                stroke_attrs(*stroke, *stroke_width),
                id
            )
        }
        DrawItem::Line {
            from,
            to,
            color,
            width,
        } => writeln!(
            f,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attrs(Some(*color), *width)
        ),
        DrawItem::Text {
            position,
            content,
            font_size,
            color,
            ..
        } => writeln!(
            f,
            r#"  <text x="{}" y="{}" font-size="{}" font-family="sans-serif" text-anchor="middle" dominant-baseline="middle"{}>{}</text>"#,
            position.x,
            position.y,
            font_size,
            paint("fill", Some(*color)),
            escape(content)
        ),
    }
}

fn paint(attr: &str, color: Option<Rgba>) -> String {
    match color {
        None => format!(r#" {attr}="none""#),
        Some(c) if c.a == 255 => format!(r#" {attr}="{}""#, c.to_hex()),
        Some(c) => format!(
            r#" {attr}="{}" {attr}-opacity="{:.3}""#,
            c.to_hex(),
            f64::from(c.a) / 255.0
        ),
    }
}

fn stroke_attrs(color: Option<Rgba>, width: f64) -> String {
    match color {
        Some(_) if width > 0.0 => format!(r#"{} stroke-width="{}""#, paint("stroke", color), width),
        _ => String::new(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
