use crate::error::QaPdfError;
use crate::model::{BBox, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search tolerance used when a field does not specify one.
pub const DEFAULT_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Which reference point of a block's bounding box is compared against a
/// query position.
///
/// Written as `"<vertical>-<horizontal>"`, e.g. `"top-right"`. A bare
/// `"center"` means `"center-center"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alignment {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Alignment {
    pub const BOTTOM_LEFT: Alignment = Alignment::new(Vertical::Bottom, Horizontal::Left);
    pub const TOP_LEFT: Alignment = Alignment::new(Vertical::Top, Horizontal::Left);
    pub const CENTER: Alignment = Alignment::new(Vertical::Center, Horizontal::Center);

    pub const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Alignment {
            vertical,
            horizontal,
        }
    }

    /// All nine combinations, top row first.
    pub fn all() -> [Alignment; 9] {
        let mut out = [Alignment::CENTER; 9];
        let verticals = [Vertical::Top, Vertical::Center, Vertical::Bottom];
        let horizontals = [Horizontal::Left, Horizontal::Center, Horizontal::Right];
        for (i, v) in verticals.iter().enumerate() {
            for (j, h) in horizontals.iter().enumerate() {
                out[i * 3 + j] = Alignment::new(*v, *h);
            }
        }
        out
    }

    /// The reference point of `bbox` selected by this alignment.
    pub fn point(&self, bbox: &BBox) -> Point {
        let x = match self.horizontal {
            Horizontal::Left => bbox.x0,
            Horizontal::Right => bbox.x1,
            Horizontal::Center => (bbox.x0 + bbox.x1) / 2.0,
        };
        let y = match self.vertical {
            Vertical::Bottom => bbox.y0,
            Vertical::Top => bbox.y1,
            Vertical::Center => (bbox.y0 + bbox.y1) / 2.0,
        };
        Point::new(x, y)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::BOTTOM_LEFT
    }
}

impl FromStr for Alignment {
    type Err = QaPdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let mode = if lower == "center" {
            "center-center"
        } else {
            lower.as_str()
        };

        let (v, h) = mode
            .split_once('-')
            .ok_or_else(|| QaPdfError::InvalidAlignment(s.to_string()))?;

        let vertical = match v {
            "top" => Vertical::Top,
            "center" => Vertical::Center,
            "bottom" => Vertical::Bottom,
            _ => return Err(QaPdfError::InvalidAlignment(s.to_string())),
        };
        let horizontal = match h {
            "left" => Horizontal::Left,
            "center" => Horizontal::Center,
            "right" => Horizontal::Right,
            _ => return Err(QaPdfError::InvalidAlignment(s.to_string())),
        };

        Ok(Alignment::new(vertical, horizontal))
    }
}

impl TryFrom<String> for Alignment {
    type Error = QaPdfError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Alignment> for String {
    fn from(a: Alignment) -> Self {
        a.to_string()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.vertical {
            Vertical::Top => "top",
            Vertical::Center => "center",
            Vertical::Bottom => "bottom",
        };
        let h = match self.horizontal {
            Horizontal::Left => "left",
            Horizontal::Center => "center",
            Horizontal::Right => "right",
        };
        write!(f, "{v}-{h}")
    }
}

/// Maximum per-axis distance between a block's reference point and the query
/// position. JSON form is either a number or `[x_tol, y_tol]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tolerance {
    Uniform(f64),
    PerAxis(f64, f64),
}

impl Tolerance {
    pub fn x(&self) -> f64 {
        match self {
            Tolerance::Uniform(t) => *t,
            Tolerance::PerAxis(x, _) => *x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            Tolerance::Uniform(t) => *t,
            Tolerance::PerAxis(_, y) => *y,
        }
    }

    /// True if `point` lies strictly inside `anchor ± tolerance` on both axes.
    pub fn contains(&self, anchor: Point, point: Point) -> bool {
        is_in_tolerance(point.x, anchor.x, self.x()) && is_in_tolerance(point.y, anchor.y, self.y())
    }

    pub fn is_valid(&self) -> bool {
        let ok = |t: f64| t.is_finite() && t >= 0.0;
        ok(self.x()) && ok(self.y())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Uniform(DEFAULT_TOLERANCE)
    }
}

impl From<f64> for Tolerance {
    fn from(t: f64) -> Self {
        Tolerance::Uniform(t)
    }
}

impl From<(f64, f64)> for Tolerance {
    fn from((x, y): (f64, f64)) -> Self {
        Tolerance::PerAxis(x, y)
    }
}

/// Exclusive bounds check: `expected - tolerance < value < expected + tolerance`.
pub fn is_in_tolerance(value: f64, expected: f64, tolerance: f64) -> bool {
    expected + tolerance > value && value > expected - tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Alignment {
        s.parse().unwrap()
    }

    #[test]
    fn test_alignment_points_for_all_modes() {
        let b = BBox::new(0.0, 1.0, 2.0, 3.0);
        let cases = [
            ("top-left", (0.0, 3.0)),
            ("top-center", (1.0, 3.0)),
            ("top-right", (2.0, 3.0)),
            ("center-left", (0.0, 2.0)),
            ("center-center", (1.0, 2.0)),
            ("center-right", (2.0, 2.0)),
            ("bottom-left", (0.0, 1.0)),
            ("bottom-center", (1.0, 1.0)),
            ("bottom-right", (2.0, 1.0)),
            ("center", (1.0, 2.0)),
        ];
        for (mode, (x, y)) in cases {
            assert_eq!(parse(mode).point(&b), Point::new(x, y), "mode {mode}");
        }
    }

    #[test]
    fn test_alignment_display_round_trips() {
        for a in Alignment::all() {
            assert_eq!(parse(&a.to_string()), a);
        }
    }

    #[test]
    fn test_alignment_is_case_insensitive() {
        assert_eq!(parse(" Top-Right "), parse("top-right"));
    }

    #[test]
    fn test_invalid_alignment_rejected() {
        assert!("left".parse::<Alignment>().is_err());
        assert!("top-middle".parse::<Alignment>().is_err());
        assert!("upper-left".parse::<Alignment>().is_err());
        assert!("".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_is_in_tolerance_is_exclusive() {
        assert!(is_in_tolerance(10.0, 12.0, 3.0));
        assert!(!is_in_tolerance(10.1, 12.1, 1.0));
        assert!(!is_in_tolerance(15.0, 12.0, 3.0));
        assert!(is_in_tolerance(14.999, 12.0, 3.0));
    }

    #[test]
    fn test_zero_tolerance_matches_nothing() {
        let t = Tolerance::Uniform(0.0);
        assert!(!t.contains(Point::new(1.0, 1.0), Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_tolerance_json_forms() {
        let t: Tolerance = serde_json::from_str("5").unwrap();
        assert_eq!(t, Tolerance::Uniform(5.0));
        let t: Tolerance = serde_json::from_str("[1000, 10]").unwrap();
        assert_eq!(t, Tolerance::PerAxis(1000.0, 10.0));
        assert_eq!(t.x(), 1000.0);
        assert_eq!(t.y(), 10.0);
    }

    #[test]
    fn test_alignment_json() {
        let a: Alignment = serde_json::from_str("\"top-right\"").unwrap();
        assert_eq!(a, Alignment::new(Vertical::Top, Horizontal::Right));
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"top-right\"");
        assert!(serde_json::from_str::<Alignment>("\"sideways\"").is_err());
    }
}
