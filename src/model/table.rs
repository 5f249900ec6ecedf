//! Table types.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// Detection confidence a table must strictly exceed to be kept.
pub const MIN_TABLE_CONFIDENCE: f32 = 90.0;

/// A table detected on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRegion {
    /// Page number (1-indexed)
    pub page: u32,

    /// Region bounds in normalized page space
    pub bbox: BoundingBox,

    /// Detection confidence in [0, 100]
    pub confidence: f32,

    /// Rows in the table
    pub rows: Vec<TableRow>,
}

impl TableRegion {
    /// Create a new empty table region.
    pub fn new(page: u32, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            page,
            bbox,
            confidence: confidence.clamp(0.0, 100.0),
            rows: Vec::new(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Whether this region passes the confidence threshold (exclusive).
    pub fn is_confident(&self) -> bool {
        self.confidence > MIN_TABLE_CONFIDENCE
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell texts of one column, top to bottom. Short rows are skipped.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.cells.get(index))
            .map(|cell| cell.text.as_str())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Drop every region at or below the confidence threshold.
pub fn retain_confident(tables: Vec<TableRegion>) -> Vec<TableRegion> {
    tables
        .into_iter()
        .filter(|table| {
            let keep = table.is_confident();
            if !keep {
                log::debug!(
                    "Discarding table on page {} with confidence {:.1}",
                    table.page,
                    table.confidence
                );
            }
            keep
        })
        .collect()
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text
    pub text: String,

    /// Cell bounds in normalized page space
    pub bbox: BoundingBox,
}

impl TableCell {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}
