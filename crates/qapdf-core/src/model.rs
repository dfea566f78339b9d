use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimals page coordinates are rounded to when a page is indexed.
pub const COORDINATE_PRECISION: i32 = 2;

/// An axis-aligned bounding box in PDF page space (origin bottom-left, y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    /// Round every coordinate to [`COORDINATE_PRECISION`] decimals.
    pub fn rounded(&self) -> Self {
        BBox {
            x0: round_coordinate(self.x0),
            y0: round_coordinate(self.y0),
            x1: round_coordinate(self.x1),
            y1: round_coordinate(self.y1),
        }
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x0, self.y0)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x0, self.y0, self.x1, self.y1)
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Point::new(v[0], v[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// One positioned string produced by a PDF decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub page_index: usize,
    pub bbox: BBox,
    pub text: String,
}

impl TextRun {
    pub fn new(page_index: usize, bbox: BBox, text: impl Into<String>) -> Self {
        TextRun {
            page_index,
            bbox,
            text: text.into(),
        }
    }
}

/// Halves round to even, so exact `.xx5` coordinates land where Python's
/// `round(v, 2)` puts them.
fn round_coordinate(v: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (v * factor).round_ties_even() / factor
}
