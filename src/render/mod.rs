//! Rendering of search results and extracted documents.

mod html;
mod json;

pub use html::{escape_html, to_html, write_summary, SUMMARY_FILE};
pub use json::{to_json, JsonFormat};
