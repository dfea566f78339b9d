use crate::extraction::RawPage;
use crate::index::page::PageIndex;
use crate::index::query::BlockQuery;
use crate::model::BBox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A run located by text search, used as a landmark for relative addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub page: usize,
    pub bbox: BBox,
    pub text: String,
}

/// All pages of one PDF file, indexed for geometric queries.
#[derive(Debug, Clone)]
pub struct Document {
    file_path: PathBuf,
    pages: Vec<PageIndex>,
}

impl Document {
    pub fn new(file_path: impl Into<PathBuf>, pages: Vec<PageIndex>) -> Self {
        Document {
            file_path: file_path.into(),
            pages,
        }
    }

    /// Index decoded pages. Page positions in `raw` define page numbering.
    pub fn from_raw_pages(file_path: impl Into<PathBuf>, raw: Vec<RawPage>) -> Self {
        let pages = raw
            .into_iter()
            .enumerate()
            .map(|(i, page)| PageIndex::new(i, page.runs))
            .collect();
        Document::new(file_path, pages)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn pages(&self) -> &[PageIndex] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageIndex> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// First run, in document order, whose text contains `needle`.
    pub fn find_anchor(&self, needle: &str) -> Option<Anchor> {
        self.anchors(needle).next()
    }

    /// Every run whose text contains `needle`, in document order.
    pub fn find_anchors(&self, needle: &str) -> Vec<Anchor> {
        self.anchors(needle).collect()
    }

    fn anchors<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = Anchor> + 'a {
        self.pages.iter().enumerate().flat_map(move |(p, page)| {
            page.runs()
                .iter()
                .filter(move |run| run.text.contains(needle))
                .map(move |run| Anchor {
                    page: p,
                    bbox: run.bbox,
                    text: run.text.clone(),
                })
        })
    }

    /// Query one page. A page index past the end yields no matches.
    pub fn query(&self, page: usize, query: &BlockQuery<'_>) -> Vec<String> {
        match self.pages.get(page) {
            Some(p) => p.query(query),
            None => {
                tracing::debug!(
                    page,
                    page_count = self.pages.len(),
                    file = %self.file_path.display(),
                    "query on missing page"
                );
                Vec::new()
            }
        }
    }

    /// All run texts in reading order, one per line.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|p| p.runs().iter().map(|r| r.text.trim_end()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{page}")?;
        }
        Ok(())
    }
}
