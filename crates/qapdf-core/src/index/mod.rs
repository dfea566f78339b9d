pub mod document;
pub mod page;
pub mod query;

pub use document::{Anchor, Document};
pub use page::PageIndex;
pub use query::{is_numeric, BlockQuery, TextCleaner};
