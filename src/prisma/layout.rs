//! Layout engine: converts review counts into PRISMA diagram primitives.
//!
//! All positions are fixed constants on a logical canvas of
//! `CANVAS_W` × `CANVAS_H` units with the y axis pointing up.

use super::counts::ReviewCounts;

// Layout constants (logical units).
pub const CANVAS_W: f64 = 3.0;
pub const CANVAS_H: f64 = 6.0;
const BOX_H: f64 = 0.5;
const MAIN_X: f64 = 0.5;
const MAIN_W: f64 = 1.5;
const SIDE_X: f64 = 2.25;
const SIDE_W: f64 = 1.0;
const LABEL_X: f64 = 0.1;
const ARROW_HEAD_W: f64 = 0.05;
const ARROW_HEAD_L: f64 = 0.1;
const DOWN_SHAFT: f64 = 0.4;
const SIDE_SHAFT: f64 = 0.15;

/// A point in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Which column a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// The inclusion flow, top to bottom.
    Main,
    /// Exclusion boxes attached to the right of a main stage.
    Side,
}

/// A labeled rectangle. `(x, y)` is the lower-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpec {
    pub column: Column,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title: &'static str,
    pub count: u64,
}

impl BoxSpec {
    /// The rendered label, `"<title>\n(n = <count>)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}\n(n = {})", self.title, self.count)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }
}

/// A straight arrow whose head tip sits exactly on `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowSpec {
    pub start: Point,
    pub end: Point,
    pub head_width: f64,
    pub head_length: f64,
}

impl ArrowSpec {
    /// Where the shaft stops and the head begins.
    #[must_use]
    pub fn head_base(&self) -> Point {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = dx.hypot(dy);
        if len <= f64::EPSILON {
            return self.start;
        }
        Point { x: self.end.x - dx / len * self.head_length, y: self.end.y - dy / len * self.head_length }
    }
}

/// A bold stage name drawn rotated, centered on `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub at: Point,
    pub text: &'static str,
    pub rotation_deg: f64,
}

/// Everything the renderer needs to draw one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSpec {
    pub boxes: Vec<BoxSpec>,
    pub arrows: Vec<ArrowSpec>,
    pub labels: Vec<LabelSpec>,
    pub excluded: u64,
    pub included: u64,
}

/// Lay out the PRISMA flow for `counts`.
#[must_use]
pub fn layout(counts: &ReviewCounts) -> DiagramSpec {
    let excluded = counts.excluded();
    let included = counts.included();

    let boxes = vec![
        main_box(5.0, "Records identified", counts.total_volume()),
        main_box(4.0, "Records after deduplication", counts.post_deduplication()),
        main_box(3.0, "Records screened", counts.post_deduplication()),
        main_box(2.0, "Full-text articles assessed", counts.hundred_percent_match()),
        main_box(1.0, "Studies included", included),
        side_box(4.0, "Duplicates removed", counts.duplicates()),
        side_box(3.0, "Records excluded", excluded),
        // Full-text exclusions are not tracked; everything assessed is included.
        side_box(2.0, "Full-text articles excluded", 0),
    ];

    let centre_x = MAIN_X + MAIN_W / 2.0;
    let mut arrows: Vec<ArrowSpec> = [5.0, 4.0, 3.0, 2.0]
        .into_iter()
        .map(|y| make_arrow(Point { x: centre_x, y }, 0.0, -DOWN_SHAFT))
        .collect();
    arrows.extend(
        [4.0, 3.0, 2.0]
            .into_iter()
            .map(|y| make_arrow(Point { x: MAIN_X + MAIN_W, y: y + BOX_H / 2.0 }, SIDE_SHAFT, 0.0)),
    );

    let labels = [
        (5.0, "Identification"),
        (4.0, "Deduplication"),
        (3.0, "Screening"),
        (2.0, "Eligibility"),
        (1.0, "Included"),
    ]
    .into_iter()
    .map(|(y, text)| LabelSpec { at: Point { x: LABEL_X, y: y + BOX_H / 2.0 }, text, rotation_deg: 90.0 })
    .collect();

    DiagramSpec { boxes, arrows, labels, excluded, included }
}

// ---- helpers ----

fn main_box(y: f64, title: &'static str, count: u64) -> BoxSpec {
    BoxSpec { column: Column::Main, x: MAIN_X, y, width: MAIN_W, height: BOX_H, title, count }
}

fn side_box(y: f64, title: &'static str, count: u64) -> BoxSpec {
    BoxSpec { column: Column::Side, x: SIDE_X, y, width: SIDE_W, height: BOX_H, title, count }
}

/// Arrow with a shaft of `(dx, dy)` from `start`; the head extends past the shaft.
fn make_arrow(start: Point, dx: f64, dy: f64) -> ArrowSpec {
    let len = dx.hypot(dy);
    let end = Point { x: start.x + dx + dx / len * ARROW_HEAD_L, y: start.y + dy + dy / len * ARROW_HEAD_L };
    ArrowSpec { start, end, head_width: ARROW_HEAD_W, head_length: ARROW_HEAD_L }
}
