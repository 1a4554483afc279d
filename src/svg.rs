//! SVG visualization of a tiling result.
//!
//! Draws the screen as one scaled panel with every cell colored by kind:
//! standard cases green, premade custom cases red, new custom sizes orange,
//! module fills blue, and uncovered gaps hatched. Counts and warnings are
//! listed below the panel.
//!
//! # Example
//!
//! ```
//! use casetile::{TilingConfig, plan, svg::render_tiling_svg};
//!
//! let result = plan(&TilingConfig::default(), 2240, 1280).unwrap();
//! let svg = render_tiling_svg(&result);
//!
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("2240×1280"));
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::layout::{CellKind, Size};
use crate::plan::TilingResult;

/// Maximum pixel width of the screen panel.
const MAX_PANEL_W: f64 = 600.0;
/// Maximum pixel height of the screen panel.
const MAX_PANEL_H: f64 = 400.0;
/// Horizontal margin.
const MARGIN_X: f64 = 40.0;
/// Top margin.
const MARGIN_TOP: f64 = 30.0;
/// Height of the label line above the panel.
const LABEL_H: f64 = 22.0;
/// Height of one annotation line below the panel.
const LINE_H: f64 = 16.0;

const KINDS: [CellKind; 5] = [
    CellKind::Standard,
    CellKind::CustomPremade,
    CellKind::CustomNew,
    CellKind::ModuleFilled,
    CellKind::Missing,
];

/// Render a complete SVG document of `result`.
pub fn render_tiling_svg(result: &TilingResult) -> String {
    let annotations = annotations(result);

    let (sw, sh, scale) = scale_to_fit(result.screen);
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;
    let total_h =
        MARGIN_TOP + LABEL_H + sh + 8.0 + LINE_H * annotations.len() as f64 + MARGIN_TOP;

    let mut svg = String::with_capacity(2048 + result.cells.len() * 160);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {:.1}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .warning { font-size: 11px; fill: #b03030; }
  .screen { fill: none; stroke: #333; stroke-width: 1.5; }
  .standard { fill: #5cb85c; stroke: #2d6a2d; stroke-width: 1; }
  .custom-premade { fill: #d9534f; stroke: #8a2522; stroke-width: 1; }
  .custom-new { fill: #f0ad4e; stroke: #a06a1c; stroke-width: 1; }
  .module { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 0.5; }
  .missing { fill: url(#hatch); stroke: #999; stroke-width: 1; stroke-dasharray: 4,2; }
  .hatch-line { stroke: #999; stroke-width: 1; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .warning { fill: #ff8080; }
    .screen { stroke: #ccc; }
    .standard { fill: #3d7d3d; stroke: #6cc46c; }
    .custom-premade { fill: #9e3330; stroke: #e27c79; }
    .custom-new { fill: #a87428; stroke: #f0c07a; }
    .module { fill: #3a72a4; stroke: #5a9fd4; }
    .hatch-line { stroke: #666; }
  }
</style>
"##,
    );

    svg.push_str(
        r##"<defs>
  <pattern id="hatch" width="8" height="8" patternUnits="userSpaceOnUse" patternTransform="rotate(45)">
    <line x1="0" y1="0" x2="0" y2="8" class="hatch-line"/>
  </pattern>
</defs>
"##,
    );

    let center_x = total_w / 2.0;
    let mut y = MARGIN_TOP;

    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        center_x,
        y + 14.0,
        escape_xml(&format!(
            "Screen  {}  {:?}  {:?}",
            result.screen, result.orientation, result.status
        ))
    ));
    svg.push('\n');
    y += LABEL_H;

    let panel_x = center_x - sw / 2.0;
    let panel_y = y;

    for cell in &result.cells {
        let title = match &cell.catalog_id {
            Some(id) => format!("{} {}×{} ({id})", cell.kind.name(), cell.width, cell.height),
            None => format!("{} {}×{}", cell.kind.name(), cell.width, cell.height),
        };
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{}"><title>{}</title></rect>"#,
            panel_x + f64::from(cell.x) * scale,
            panel_y + f64::from(cell.y) * scale,
            f64::from(cell.width) * scale,
            f64::from(cell.height) * scale,
            cell.kind.name(),
            escape_xml(&title)
        ));
        svg.push('\n');
    }

    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="screen"/>"#,
        panel_x, panel_y, sw, sh
    ));
    svg.push('\n');

    y += sh + 8.0;
    for (class, text) in &annotations {
        y += LINE_H;
        svg.push_str(&format!(
            r#"<text x="{}" y="{:.1}" class="{}" text-anchor="middle">{}</text>"#,
            center_x,
            y - 4.0,
            class,
            escape_xml(text)
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

/// Lines listed under the panel, with their CSS class.
fn annotations(result: &TilingResult) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();

    let counts: Vec<String> = KINDS
        .iter()
        .map(|&kind| (kind, result.count(kind)))
        .filter(|&(_, n)| n > 0)
        .map(|(kind, n)| format!("{} {n}", kind.name()))
        .collect();
    if !counts.is_empty() {
        lines.push(("annotation", counts.join(", ")));
    }

    let mut totals = format!("modules {:.2}", result.total_modules);
    if result.missing_area > 0 {
        totals.push_str(&format!(", missing {} mm²", result.missing_area));
    }
    if let Some(watts) = result.consumption_watts {
        totals.push_str(&format!(", {watts:.0} W"));
    }
    lines.push(("annotation", totals));

    for warning in &result.warnings {
        lines.push(("warning", format!("{warning}")));
    }
    lines
}

/// Scale a Size to fit within MAX_PANEL_W × MAX_PANEL_H, preserving aspect ratio.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    if w == 0.0 || h == 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
