use crate::index::query::BlockQuery;
use crate::model::TextRun;
use std::fmt;

/// One page's text runs in reading order.
///
/// Runs are ordered top to bottom by the bottom edge of their bounding box,
/// and left to right among runs sharing that edge. Report tables are laid out
/// on shared baselines, so this reproduces their natural reading order
/// without any layout analysis.
#[derive(Debug, Clone)]
pub struct PageIndex {
    page_index: usize,
    runs: Vec<TextRun>,
}

impl PageIndex {
    pub fn new(page_index: usize, runs: Vec<TextRun>) -> Self {
        let mut runs: Vec<TextRun> = runs
            .into_iter()
            .map(|r| TextRun {
                page_index,
                bbox: r.bbox.rounded(),
                text: r.text,
            })
            .collect();

        // Stable, so runs with identical origins keep decoder order.
        runs.sort_by(|a, b| {
            b.bbox
                .y0
                .total_cmp(&a.bbox.y0)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        PageIndex { page_index, runs }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// All block texts whose alignment point falls inside the query window,
    /// cleaned and filtered, in page order. An empty result means no match.
    pub fn query(&self, query: &BlockQuery<'_>) -> Vec<String> {
        let hits: Vec<String> = self
            .runs
            .iter()
            .filter(|run| {
                let point = query.alignment.point(&run.bbox);
                query.tolerance.contains(query.pos, point)
            })
            .filter_map(|run| query.accept(&run.text))
            .collect();

        tracing::trace!(
            page = self.page_index,
            x = query.pos.x,
            y = query.pos.y,
            mode = %query.alignment,
            hits = hits.len(),
            "block query"
        );

        hits
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, run) in self.runs.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "page_index: {}, data_index: {}\nbbox: {}\n{}",
                self.page_index,
                index,
                run.bbox,
                run.text.trim_end()
            )?;
        }
        Ok(())
    }
}
