//! PaperBrief academic search
//!
//! arXiv export API client behind the `PaperSource` trait

pub mod arxiv;
pub mod source;
pub mod types;

pub use arxiv::{parse_feed, ArxivClient};
pub use source::PaperSource;
pub use types::{collapse_whitespace, PaperRecord};
