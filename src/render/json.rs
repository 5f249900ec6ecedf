//! JSON rendering for documents and search results.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize documents, search matches or any other model value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, TocEntry};
    use crate::search::DocumentMatches;
    use std::path::PathBuf;

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::pdf("/docs/report.pdf");
        doc.metadata.title = "Annual report".to_string();
        doc.paragraphs.push("Hello".to_string());
        doc.table_of_contents.push(TocEntry::new(1, "Intro"));

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Annual report"));
        assert!(json.contains("\"kind\": \"pdf\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let matches = vec![DocumentMatches {
            path: PathBuf::from("/docs/a.pdf"),
            paragraphs: vec!["Revenue grew.".to_string()],
            tables: Vec::new(),
        }];

        let json = to_json(&matches, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.starts_with("[{\"path\":\"/docs/a.pdf\""));
    }
}
