//! Table detection from text positions (stream mode).
//!
//! Tables are found by looking for runs of rows whose spans start at the
//! same X positions, without relying on ruling lines. Each detected region
//! carries a confidence derived from how well its rows align and how many
//! of them actually span several cells.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::Result;
use crate::model::{BoundingBox, TableCell, TableRegion, TableRow};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::{LayoutAnalyzer, TextSpan};
use super::options::{LayoutParams, TableParams};

/// Bucket width when grouping left edges into candidate columns (points).
const EDGE_BUCKET: f32 = 5.0;
/// A span is aligned with a column when its left edge is this close (points).
const ALIGN_TOLERANCE: f32 = 5.0;

/// Contract for anything that can pull tables out of a PDF artifact.
pub trait TableExtractor: Send + Sync {
    /// Detect tables on the selected pages of the PDF at `source`.
    ///
    /// No filtering by confidence happens here.
    fn extract_tables(&self, source: &Path, params: &TableParams) -> Result<Vec<TableRegion>>;
}

/// Default [`TableExtractor`]: stream-mode detection over lopdf text positions.
#[derive(Debug, Clone, Default)]
pub struct StreamTableExtractor {
    layout: LayoutParams,
}

impl StreamTableExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    /// Detect tables on an already opened backend.
    pub fn extract_from_backend(
        &self,
        backend: &dyn PdfBackend,
        params: &TableParams,
    ) -> Result<Vec<TableRegion>> {
        let analyzer = LayoutAnalyzer::new(backend, self.layout.clone());
        let detector = TableDetector::with_config(params.detector.clone());
        let mut regions = Vec::new();

        for &page in backend.pages().keys() {
            if !params.pages.includes(page) {
                continue;
            }
            let content = analyzer.extract_page_content(page)?;
            let (tables, _) = detector.detect(content.spans);
            regions.extend(
                tables
                    .iter()
                    .map(|table| detector.to_table_region(table, page, content.height)),
            );
        }

        log::debug!("Stream detector found {} table candidate(s)", regions.len());
        Ok(regions)
    }
}

impl TableExtractor for StreamTableExtractor {
    fn extract_tables(&self, source: &Path, params: &TableParams) -> Result<Vec<TableRegion>> {
        let backend = LopdfBackend::load_file(source)?;
        self.extract_from_backend(&backend, params)
    }
}

/// A detected table region with its content, in PDF user space.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first (top) row
    pub top_y: f32,
    /// Baseline of the last (bottom) row
    pub bottom_y: f32,
    /// Left X boundary
    pub left_x: f32,
    /// Right X boundary
    pub right_x: f32,
    /// Column left edges (X coordinates)
    pub columns: Vec<f32>,
    /// Rows of text spans grouped by Y position
    pub rows: Vec<TableRowData>,
    /// Mean alignment of the rows against `columns`, in [0, 1]
    pub alignment: f32,
    /// Share of rows holding at least `min_columns` spans, in [0, 1]
    pub filled_ratio: f32,
}

impl DetectedTable {
    /// Detection confidence on a 0-100 scale.
    pub fn confidence(&self) -> f32 {
        self.alignment * self.filled_ratio * 100.0
    }
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Y position of this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given spans.
    ///
    /// Returns detected tables and the spans that were NOT part of tables.
    pub fn detect(&self, spans: Vec<TextSpan>) -> (Vec<DetectedTable>, Vec<TextSpan>) {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return (vec![], spans);
        }

        let rows = self.group_into_rows(&spans);
        if rows.len() < self.config.min_rows {
            return (vec![], spans);
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, candidate columns at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return (vec![], spans);
        }

        let mut detected_tables = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();

        for (start_row, end_row) in self.find_table_regions(&rows, &columns) {
            let table_rows: Vec<TableRowData> = rows[start_row..=end_row].to_vec();

            // Re-detect columns for this specific region
            let table_columns = self.detect_columns(&table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(&table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            for span in table_rows.iter().flat_map(|r| r.spans.iter()) {
                if let Some(i) = spans.iter().position(|orig| {
                    (orig.x - span.x).abs() < 0.1
                        && (orig.y - span.y).abs() < 0.1
                        && orig.text == span.text
                }) {
                    used.insert(i);
                }
            }

            let alignment = table_rows
                .iter()
                .map(|row| self.calculate_alignment_score(row, &table_columns))
                .sum::<f32>()
                / table_rows.len() as f32;
            let filled_ratio = table_rows.iter().filter(|row| self.is_multi_cell(row)).count()
                as f32
                / table_rows.len() as f32;

            let all_spans = || table_rows.iter().flat_map(|r| r.spans.iter());
            detected_tables.push(DetectedTable {
                top_y: table_rows.first().map(|r| r.y).unwrap_or(0.0),
                bottom_y: table_rows.last().map(|r| r.y).unwrap_or(0.0),
                left_x: all_spans().map(|s| s.x).fold(f32::MAX, f32::min),
                right_x: all_spans().map(TextSpan::right).fold(f32::MIN, f32::max),
                columns: table_columns,
                alignment,
                filled_ratio,
                rows: table_rows,
            });
        }

        let unused_spans: Vec<TextSpan> = spans
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, span)| span)
            .collect();

        (detected_tables, unused_spans)
    }

    /// Group spans into rows by Y position.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted_spans = spans.to_vec();
        sorted_spans.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        fn close(rows: &mut Vec<TableRowData>, spans: Vec<TextSpan>) {
            if spans.is_empty() {
                return;
            }
            let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
            rows.push(TableRowData { y, spans });
        }

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current_row_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted_spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => current_row_spans.push(span),
                _ => {
                    close(&mut rows, std::mem::take(&mut current_row_spans));
                    current_y = Some(span.y);
                    current_row_spans.push(span);
                }
            }
        }
        close(&mut rows, current_row_spans);

        rows
    }

    /// Detect column boundaries from left edges that recur across rows.
    ///
    /// Rows holding two or more spans are the best evidence; when there are
    /// too few of them, every row votes.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let voters = if multi_span_rows.len() >= self.config.min_rows {
            // Each bucket counts once per row
            for row in &multi_span_rows {
                let buckets: HashSet<i32> = row
                    .spans
                    .iter()
                    .map(|s| (s.x / EDGE_BUCKET).round() as i32)
                    .collect();
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
            multi_span_rows.len()
        } else {
            for span in rows.iter().flat_map(|r| r.spans.iter()) {
                *edge_counts
                    .entry((span.x / EDGE_BUCKET).round() as i32)
                    .or_insert(0) += 1;
            }
            rows.len()
        };

        let min_occurrences =
            ((voters as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * EDGE_BUCKET)
            .collect();
        column_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge edges closer than the minimum column gap
        let mut merged_edges: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged_edges.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged_edges.push(edge),
            }
        }
        merged_edges
    }

    /// Find contiguous row regions that form tables.
    ///
    /// A region starts and ends on a row with at least `min_columns` spans.
    /// A single lone row with fewer spans may sit between two such rows
    /// (a wrapped cell or an empty row); a second one closes the region.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        // (first row, last multi-cell row)
        let mut current: Option<(usize, usize)> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned =
                self.calculate_alignment_score(row, columns) >= self.config.min_alignment_ratio;
            let multi_cell = self.is_multi_cell(row);

            current = match current {
                Some((start, _)) if aligned && multi_cell => Some((start, i)),
                Some((start, last)) if aligned && i - last < 2 => Some((start, last)),
                None if aligned && multi_cell => Some((i, i)),
                Some(region) => {
                    self.push_region(&mut regions, rows, region);
                    None
                }
                None => None,
            };
        }

        if let Some(region) = current {
            self.push_region(&mut regions, rows, region);
        }

        regions
    }

    fn push_region(
        &self,
        regions: &mut Vec<(usize, usize)>,
        rows: &[TableRowData],
        (start, end): (usize, usize),
    ) {
        let multi_cell_rows = rows[start..=end]
            .iter()
            .filter(|row| self.is_multi_cell(row))
            .count();
        if multi_cell_rows >= self.config.min_rows {
            regions.push((start, end));
        }
    }

    fn is_multi_cell(&self, row: &TableRowData) -> bool {
        row.spans.len() >= self.config.min_columns
    }

    /// Fraction of a row's spans whose left edge sits on a column.
    fn calculate_alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let aligned_spans = row
            .spans
            .iter()
            .filter(|span| {
                columns
                    .iter()
                    .any(|col| (span.x - col).abs() <= ALIGN_TOLERANCE)
            })
            .count();

        aligned_spans as f32 / row.spans.len() as f32
    }

    /// Convert a detected table into a [`TableRegion`] in normalized page space.
    ///
    /// The first row becomes the header when the table has more than one row.
    pub fn to_table_region(&self, detected: &DetectedTable, page: u32, page_height: f32) -> TableRegion {
        let columns = &detected.columns;

        let all_spans = || detected.rows.iter().flat_map(|r| r.spans.iter());
        let top = all_spans().map(TextSpan::top).fold(f32::MIN, f32::max);
        let bottom = all_spans().map(TextSpan::bottom).fold(f32::MAX, f32::min);
        let bbox = BoundingBox::from_pdf_rect(detected.left_x, bottom, detected.right_x, top, page_height);

        let mut region = TableRegion::new(page, bbox, detected.confidence());
        let has_header = detected.rows.len() > 1;

        for (row_idx, row_data) in detected.rows.iter().enumerate() {
            let mut cell_spans: Vec<Vec<&TextSpan>> = vec![Vec::new(); columns.len()];
            for span in &row_data.spans {
                let col_idx = self.find_column_for_span(span.x, columns, detected.right_x);
                if let Some(cell) = cell_spans.get_mut(col_idx) {
                    cell.push(span);
                }
            }

            let row_top = row_data.spans.iter().map(TextSpan::top).fold(f32::MIN, f32::max);
            let row_bottom = row_data.spans.iter().map(TextSpan::bottom).fold(f32::MAX, f32::min);

            let cells: Vec<TableCell> = cell_spans
                .into_iter()
                .enumerate()
                .map(|(i, spans)| {
                    let text = spans
                        .iter()
                        .map(|s| s.text.trim())
                        .collect::<Vec<_>>()
                        .join(" ");
                    let x0 = columns[i];
                    let x1 = columns.get(i + 1).copied().unwrap_or(detected.right_x);
                    TableCell::new(
                        text,
                        BoundingBox::from_pdf_rect(x0, row_bottom, x1, row_top, page_height),
                    )
                })
                .collect();

            region.add_row(if row_idx == 0 && has_header {
                TableRow::header(cells)
            } else {
                TableRow::new(cells)
            });
        }

        region
    }

    /// Find which column a span belongs to based on its X position.
    fn find_column_for_span(&self, span_x: f32, columns: &[f32], right_x: f32) -> usize {
        // Allow 10pt of slack for spans starting slightly before the column edge
        for (i, &col_start) in columns.iter().enumerate() {
            let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
            if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
                return i;
            }
        }

        columns
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (span_x - **a)
                    .abs()
                    .partial_cmp(&(span_x - **b).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Check if detected rows are really a numbered or bulleted list.
    ///
    /// A list like "1. Item" splits the marker and the text into separate
    /// spans at different X positions, which looks like a two-column table.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            let first_span = row
                .spans
                .iter()
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

            if let Some(span) = first_span {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        // Bullets are almost never table data; numbered first columns are,
        // so only two-column numbered regions are rejected.
        bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
    }
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□" | "◆" | "◇" | "▶" | "▷" | "➤" | "➜"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    // "1.", "12.", "1)"
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    // "a.", "B)"
    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 12.0)
    }

    fn grid() -> Vec<TextSpan> {
        vec![
            make_span("Name", 10.0, 100.0),
            make_span("Age", 60.0, 100.0),
            make_span("Alice", 10.0, 85.0),
            make_span("30", 60.0, 85.0),
            make_span("Bob", 10.0, 70.0),
            make_span("25", 60.0, 70.0),
        ]
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let rows = detector.group_into_rows(&grid());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.spans.len() == 2));
        assert_eq!(rows[0].y, 100.0);
    }

    #[test]
    fn test_detect_simple_table() {
        let detector = TableDetector::new();
        let (tables, remaining) = detector.detect(grid());
        assert_eq!(tables.len(), 1);
        assert!(remaining.is_empty());

        let table = &tables[0];
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.columns, vec![10.0, 60.0]);
        assert_eq!(table.alignment, 1.0);
    }

    #[test]
    fn test_table_region_conversion() {
        let detector = TableDetector::new();
        let (tables, _) = detector.detect(grid());
        let region = detector.to_table_region(&tables[0], 2, 200.0);

        assert_eq!(region.page, 2);
        assert_eq!(region.confidence, 100.0);
        assert!(region.is_confident());
        assert!(region.rows[0].is_header);
        assert_eq!(region.column(0).collect::<Vec<_>>(), vec!["Name", "Alice", "Bob"]);
        assert_eq!(region.column(1).collect::<Vec<_>>(), vec!["Age", "30", "25"]);

        // Top row baseline at 100 with 12pt text: top edge 109.6 -> 90.4 from the top
        assert!((region.bbox.y0 - 90.4).abs() < 0.01);
        assert!(region.bbox.y1 > region.bbox.y0);
        let first_cell = &region.rows[0].cells[0];
        assert_eq!(first_cell.bbox.x0, 10.0);
        assert_eq!(first_cell.bbox.x1, 60.0);
    }

    #[test]
    fn test_partially_aligned_region_has_lower_confidence() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Name", 10.0, 100.0),
            make_span("Age", 60.0, 100.0),
            make_span("Alice", 10.0, 85.0),
            make_span("30", 60.0, 85.0),
            make_span("Bob", 10.0, 70.0),
            make_span("25", 60.0, 70.0),
            make_span("note", 140.0, 70.0),
        ];
        let (tables, _) = detector.detect(spans);
        assert_eq!(tables.len(), 1);
        let region = detector.to_table_region(&tables[0], 1, 200.0);
        assert!(region.confidence < 100.0);
        assert!(!region.is_confident());
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Line 1", 10.0, 100.0),
            make_span("Line 2", 10.0, 85.0),
            make_span("Line 3", 10.0, 70.0),
        ];

        let (tables, remaining) = detector.detect(spans);
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 3);
    }

    #[test]
    fn test_prose_with_indented_first_lines_is_not_a_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Revenue grew in every region this year.", 90.0, 700.0),
            make_span("The board expects the trend to continue.", 72.0, 686.0),
            make_span("Costs were kept under control.", 72.0, 672.0),
            make_span("A second paragraph opens with an indent.", 90.0, 650.0),
            make_span("It closes the annual summary.", 72.0, 636.0),
        ];

        let (tables, remaining) = detector.detect(spans);
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 5);
    }

    #[test]
    fn test_surrounding_prose_is_trimmed_from_region() {
        let detector = TableDetector::new();
        let mut spans = vec![make_span("Results for the year are shown below.", 10.0, 130.0)];
        spans.extend(grid());
        spans.push(make_span("All figures are unaudited.", 10.0, 40.0));

        let (tables, remaining) = detector.detect(spans);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 3);
        assert_eq!(tables[0].confidence(), 100.0);
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_two_single_span_rows_split_regions() {
        let detector = TableDetector::new();
        let mut spans = grid();
        spans.push(make_span("Notes on the first table.", 10.0, 55.0));
        spans.push(make_span("The second table follows.", 10.0, 40.0));
        spans.extend([
            make_span("City", 10.0, 25.0),
            make_span("Size", 60.0, 25.0),
            make_span("Kranj", 10.0, 10.0),
            make_span("55", 60.0, 10.0),
        ]);

        let (tables, _) = detector.detect(spans);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows.len(), 3);
        assert_eq!(tables[1].rows.len(), 2);
    }

    #[test]
    fn test_lone_single_span_row_lowers_confidence() {
        let detector = TableDetector::new();
        let mut spans = grid();
        spans.push(make_span("continued", 10.0, 55.0));
        spans.extend([make_span("Eve", 10.0, 40.0), make_span("41", 60.0, 40.0)]);

        let (tables, _) = detector.detect(spans);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 5);
        assert!((tables[0].filled_ratio - 0.8).abs() < 1e-6);
        assert!(tables[0].confidence() <= 90.0);
    }

    #[test]
    fn test_lists_not_detected_as_tables() {
        let detector = TableDetector::new();
        let numbered = vec![
            make_span("1.", 50.0, 400.0),
            make_span("Introduction", 80.0, 400.0),
            make_span("2.", 50.0, 370.0),
            make_span("Scope", 80.0, 370.0),
            make_span("3.", 50.0, 340.0),
            make_span("Results", 80.0, 340.0),
        ];
        let (tables, remaining) = detector.detect(numbered);
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 6);

        let bullets = vec![
            make_span("-", 50.0, 400.0),
            make_span("Management", 80.0, 400.0),
            make_span("-", 50.0, 370.0),
            make_span("Firmware", 80.0, 370.0),
        ];
        let (tables, _) = detector.detect(bullets);
        assert!(tables.is_empty());
    }

    #[test]
    fn test_list_markers() {
        for marker in ["1.", "12.", "1)", "1 .", "3", "a.", "B)"] {
            assert!(is_number_marker(marker), "{}", marker);
        }
        for marker in ["-", "•", "*", "–"] {
            assert!(is_bullet_marker(marker), "{}", marker);
        }
        for text in ["Name", "Hello World", ""] {
            assert!(!is_number_marker(text) && !is_bullet_marker(text), "{}", text);
        }
    }
}
