use crate::geometry::{Alignment, Tolerance};
use crate::model::Point;
use std::collections::BTreeSet;

/// Transform applied to every matched block's text before filtering.
///
/// When a query has no cleaner, surrounding whitespace is trimmed.
pub type TextCleaner = dyn Fn(&str) -> String + Send + Sync;

/// A proximity query against one page.
#[derive(Clone, Copy)]
pub struct BlockQuery<'a> {
    pub pos: Point,
    pub tolerance: Tolerance,
    pub alignment: Alignment,
    pub cleaner: Option<&'a TextCleaner>,
    /// `Some(true)` keeps only numeric text, `Some(false)` only non-numeric.
    pub numeric: Option<bool>,
    pub ignored: Option<&'a BTreeSet<String>>,
}

impl<'a> BlockQuery<'a> {
    /// A query with the default tolerance and bottom-left alignment.
    pub fn new(pos: impl Into<Point>) -> Self {
        BlockQuery {
            pos: pos.into(),
            tolerance: Tolerance::default(),
            alignment: Alignment::default(),
            cleaner: None,
            numeric: None,
            ignored: None,
        }
    }

    pub fn tolerance(mut self, tolerance: impl Into<Tolerance>) -> Self {
        self.tolerance = tolerance.into();
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn cleaner(mut self, cleaner: Option<&'a TextCleaner>) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn numeric(mut self, numeric: Option<bool>) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn ignored(mut self, ignored: &'a BTreeSet<String>) -> Self {
        self.ignored = Some(ignored);
        self
    }

    /// Clean and filter one matched block's text. `None` means the block is
    /// dropped from the result.
    pub(crate) fn accept(&self, text: &str) -> Option<String> {
        let clean = match self.cleaner {
            Some(cleaner) => cleaner(text),
            None => text.trim().to_string(),
        };

        if clean.is_empty() {
            return None;
        }
        if self.ignored.is_some_and(|ignored| ignored.contains(&clean)) {
            return None;
        }
        if let Some(numeric) = self.numeric {
            if is_numeric(&clean) != numeric {
                return None;
            }
        }
        Some(clean)
    }
}

/// True if `s` parses as a real number.
pub fn is_numeric(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok()
}
