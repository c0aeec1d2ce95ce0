//! Diagram renderer: `DiagramSpec` → SVG → in-memory raster.
//!
//! DESIGN
//! ======
//! The figure is 12in × 10in at 300 DPI. Logical coordinates are mapped
//! through a fixed axes rectangle inside the figure, so x and y have
//! different pixel scales while text keeps its natural proportions. The
//! SVG viewport is cropped to the drawn content plus a small pad (a tight
//! bounding box), then rasterized with `resvg`. Nothing here touches the
//! filesystem.

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use resvg::usvg::fontdb::{Database, Family, Query, Weight};

use super::PrismaError;
use super::layout::{ArrowSpec, BoxSpec, CANVAS_H, CANVAS_W, DiagramSpec, LabelSpec, Point};

pub const DPI: u32 = 300;
const FIG_W_IN: f64 = 12.0;
const FIG_H_IN: f64 = 10.0;

// Axes rectangle as figure fractions.
const AXES_LEFT: f64 = 0.125;
const AXES_BOTTOM: f64 = 0.11;
const AXES_WIDTH: f64 = 0.775;
const AXES_HEIGHT: f64 = 0.77;

const FONT_PT: f64 = 10.0;
const LINE_SPACING: f64 = 1.2;
/// Average glyph advance as a fraction of the font size.
const CHAR_ADVANCE: f64 = 0.6;
/// Shift from the vertical centre of a line to its baseline.
const BASELINE_SHIFT: f64 = 0.35;
const STROKE_PT: f64 = 1.0;
const PAD_IN: f64 = 0.1;

const PREFERRED_FAMILIES: [&str; 2] = ["DejaVu Sans", "Arial"];
const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";
const BOX_FILL: &str = "#ADD8E6";
const EDGE_COLOR: &str = "#000000";
const BACKGROUND: &str = "#FFFFFF";

/// Pixels per meter at `DPI`, as stored in the PNG `pHYs` chunk.
pub const PIXELS_PER_METER: u32 = 11_811;

// =============================================================================
// RASTER IMAGE
// =============================================================================

/// A rendered diagram held in memory.
#[derive(Debug)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Encode as an 8-bit RGBA PNG tagged with 300 DPI.
    ///
    /// # Errors
    ///
    /// Returns [`PrismaError::Render`] if the PNG encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, PrismaError> {
        let data: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.width(), self.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: PIXELS_PER_METER,
            yppu: PIXELS_PER_METER,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder
            .write_header()
            .map_err(|e| PrismaError::Render(format!("png header: {e}")))?;
        writer
            .write_image_data(&data)
            .map_err(|e| PrismaError::Render(format!("png data: {e}")))?;
        writer
            .finish()
            .map_err(|e| PrismaError::Render(format!("png finish: {e}")))?;
        Ok(out)
    }
}

// =============================================================================
// RENDER
// =============================================================================

/// Rasterize a diagram with the system font database.
///
/// # Errors
///
/// Returns [`PrismaError::Render`] if no usable font face is installed, the
/// generated SVG cannot be parsed, or the pixmap cannot be allocated.
pub fn render(spec: &DiagramSpec) -> Result<RasterImage, PrismaError> {
    render_with_fonts(spec, system_fonts())
}

/// Rasterize a diagram against an explicit font database.
///
/// Text without a resolvable face would be dropped silently by `usvg`, so a
/// database that cannot serve the label family in regular and bold weight is
/// an error.
///
/// # Errors
///
/// Same as [`render`].
pub fn render_with_fonts(spec: &DiagramSpec, fontdb: Arc<Database>) -> Result<RasterImage, PrismaError> {
    let family = resolve_label_family(&fontdb)?;
    let svg = render_svg(spec);

    let mut options = usvg::Options::default();
    options.font_family = family;
    options.fontdb = fontdb;

    let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| PrismaError::Render(format!("svg parse: {e}")))?;
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        PrismaError::Render(format!("failed to allocate {}x{} pixmap", size.width(), size.height()))
    })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    Ok(RasterImage { pixmap })
}

/// Compose the SVG document for a diagram.
#[must_use]
pub fn render_svg(spec: &DiagramSpec) -> String {
    let m = Metrics::new();
    let mut body = String::new();
    let mut bounds = Bounds::default();

    for b in &spec.boxes {
        draw_box(&mut body, &mut bounds, &m, b);
    }
    for a in &spec.arrows {
        draw_arrow(&mut body, &mut bounds, &m, a);
    }
    for l in &spec.labels {
        draw_label(&mut body, &mut bounds, &m, l);
    }

    let pad = PAD_IN * f64::from(DPI);
    let min_x = (bounds.min_x - pad).floor();
    let min_y = (bounds.min_y - pad).floor();
    let width = (bounds.max_x + pad - min_x).ceil().max(1.0);
    let height = (bounds.max_y + pad - min_y).ceil().max(1.0);

    let mut svg = String::with_capacity(body.len() + 512);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{min_x} {min_y} {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<rect class="background" x="{min_x}" y="{min_y}" width="{width}" height="{height}" fill="{BACKGROUND}"/>"#
    );
    svg.push_str(&body);
    svg.push_str("</svg>\n");
    svg
}

// =============================================================================
// PRIMITIVES
// =============================================================================

fn draw_box(svg: &mut String, bounds: &mut Bounds, m: &Metrics, b: &BoxSpec) {
    let top_left = m.to_px(Point { x: b.x, y: b.y + b.height });
    let w = b.width * m.sx;
    let h = b.height * m.sy;
    let half_stroke = m.stroke / 2.0;
    bounds.include(top_left.x - half_stroke, top_left.y - half_stroke);
    bounds.include(top_left.x + w + half_stroke, top_left.y + h + half_stroke);

    let _ = write!(
        svg,
        r#"<rect class="box" x="{:.2}" y="{:.2}" width="{w:.2}" height="{h:.2}" fill="{BOX_FILL}" stroke="{EDGE_COLOR}" stroke-width="{:.2}"/>"#,
        top_left.x, top_left.y, m.stroke
    );

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let max_chars = ((w / m.char_w).floor() as usize).max(1);
    let lines: Vec<String> = b
        .label()
        .lines()
        .flat_map(|line| {
            textwrap::wrap(line, max_chars)
                .into_iter()
                .map(std::borrow::Cow::into_owned)
                .collect::<Vec<_>>()
        })
        .collect();

    let centre = m.to_px(b.center());
    #[allow(clippy::cast_precision_loss)]
    let n = lines.len() as f64;
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let text_w = widest as f64 * m.char_w;
    bounds.include(centre.x - text_w / 2.0, centre.y - n * m.line_h / 2.0);
    bounds.include(centre.x + text_w / 2.0, centre.y + n * m.line_h / 2.0);

    let first_baseline = centre.y - (n - 1.0) * m.line_h / 2.0 + BASELINE_SHIFT * m.font_px;
    let _ = write!(
        svg,
        r#"<text class="box-label" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="{:.2}" fill="{EDGE_COLOR}">"#,
        m.font_px
    );
    for (i, line) in lines.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = first_baseline + i as f64 * m.line_h;
        let _ = write!(svg, r#"<tspan x="{:.2}" y="{y:.2}">{}</tspan>"#, centre.x, escape_xml(line));
    }
    svg.push_str("</text>");
}

fn draw_arrow(svg: &mut String, bounds: &mut Bounds, m: &Metrics, a: &ArrowSpec) {
    let base = a.head_base();
    let dx = a.end.x - a.start.x;
    let dy = a.end.y - a.start.y;
    let len = dx.hypot(dy).max(f64::EPSILON);
    // Perpendicular in logical units, so head width scales like the canvas.
    let half = a.head_width / 2.0;
    let left = Point { x: base.x - dy / len * half, y: base.y + dx / len * half };
    let right = Point { x: base.x + dy / len * half, y: base.y - dx / len * half };

    let start = m.to_px(a.start);
    let shaft_end = m.to_px(base);
    let tip = m.to_px(a.end);
    let left = m.to_px(left);
    let right = m.to_px(right);
    for p in [start, tip, left, right] {
        bounds.include(p.x, p.y);
    }

    let _ = write!(
        svg,
        r#"<line class="arrow" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{EDGE_COLOR}" stroke-width="{:.2}"/>"#,
        start.x, start.y, shaft_end.x, shaft_end.y, m.stroke
    );
    let _ = write!(
        svg,
        r#"<polygon class="arrow-head" points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{EDGE_COLOR}"/>"#,
        tip.x, tip.y, left.x, left.y, right.x, right.y
    );
}

fn draw_label(svg: &mut String, bounds: &mut Bounds, m: &Metrics, l: &LabelSpec) {
    let at = m.to_px(l.at);
    #[allow(clippy::cast_precision_loss)]
    let run = l.text.chars().count() as f64 * m.char_w;
    // Rotated by 90 degrees the text runs vertically.
    bounds.include(at.x - m.line_h / 2.0, at.y - run / 2.0);
    bounds.include(at.x + m.line_h / 2.0, at.y + run / 2.0);

    let baseline = at.y + BASELINE_SHIFT * m.font_px;
    let _ = write!(
        svg,
        r#"<text class="stage-label" x="{:.2}" y="{baseline:.2}" transform="rotate({:.2} {:.2} {:.2})" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="{:.2}" font-weight="bold" fill="{EDGE_COLOR}">{}</text>"#,
        at.x,
        -l.rotation_deg,
        at.x,
        at.y,
        m.font_px,
        escape_xml(l.text)
    );
}

// ---- helpers ----

/// Pixel geometry of the figure.
struct Metrics {
    fig_h: f64,
    origin_x: f64,
    origin_y: f64,
    sx: f64,
    sy: f64,
    font_px: f64,
    line_h: f64,
    char_w: f64,
    stroke: f64,
}

impl Metrics {
    fn new() -> Self {
        let dpi = f64::from(DPI);
        let fig_w = FIG_W_IN * dpi;
        let fig_h = FIG_H_IN * dpi;
        let font_px = FONT_PT * dpi / 72.0;
        Self {
            fig_h,
            origin_x: AXES_LEFT * fig_w,
            origin_y: AXES_BOTTOM * fig_h,
            sx: AXES_WIDTH * fig_w / CANVAS_W,
            sy: AXES_HEIGHT * fig_h / CANVAS_H,
            font_px,
            line_h: font_px * LINE_SPACING,
            char_w: font_px * CHAR_ADVANCE,
            stroke: STROKE_PT * dpi / 72.0,
        }
    }

    /// Logical (y up) to SVG pixel (y down) coordinates.
    fn to_px(&self, p: Point) -> Point {
        Point { x: self.origin_x + p.x * self.sx, y: self.fig_h - (self.origin_y + p.y * self.sy) }
    }
}

/// Running extent of everything drawn, in pixels.
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { min_x: f64::INFINITY, min_y: f64::INFINITY, max_x: f64::NEG_INFINITY, max_y: f64::NEG_INFINITY }
    }
}

impl Bounds {
    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// System fonts, loaded once. When neither preferred family is installed,
/// `sans-serif` is pointed at the first available face.
pub(crate) fn system_fonts() -> Arc<Database> {
    static DB: OnceLock<Arc<Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        let preferred: Vec<Family<'_>> = PREFERRED_FAMILIES.iter().map(|name| Family::Name(*name)).collect();
        let has_preferred = db.query(&Query { families: &preferred, ..Query::default() }).is_some();
        if !has_preferred {
            let fallback = db.faces().find_map(|face| face.families.first().map(|(name, _)| name.clone()));
            if let Some(name) = fallback {
                db.set_sans_serif_family(name);
            }
        }
        tracing::debug!(faces = db.len(), has_preferred, "font database loaded");
        Arc::new(db)
    })
    .clone()
}

/// Family name of the face serving labels, checked for both weights in use.
fn resolve_label_family(db: &Database) -> Result<String, PrismaError> {
    if db.is_empty() {
        return Err(PrismaError::Render("no font faces available".into()));
    }
    let families: Vec<Family<'_>> = PREFERRED_FAMILIES
        .iter()
        .map(|name| Family::Name(*name))
        .chain(std::iter::once(Family::SansSerif))
        .collect();

    let mut regular = None;
    for (weight, name) in [(Weight::NORMAL, "regular"), (Weight::BOLD, "bold")] {
        let id = db
            .query(&Query { families: &families, weight, ..Query::default() })
            .ok_or_else(|| PrismaError::Render(format!("no {name} font face for {FONT_FAMILY}")))?;
        regular.get_or_insert(id);
    }

    regular
        .and_then(|id| db.face(id))
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .ok_or_else(|| PrismaError::Render("font face has no family name".into()))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
