//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream, tracks the text and graphics state, and
//! produces positioned text spans and image placements. Spans are grouped
//! into lines and blocks; the result is a [`PageLayout`] tree in the
//! normalized (top-left origin) coordinate convention.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, LayoutElement, PageLayout};

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};
use super::options::LayoutParams;

/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// A text span with position information, in PDF user space (y up).
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span. Width is estimated from the character count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * GLYPH_WIDTH_FACTOR;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// An image XObject drawn on a page, in PDF user space.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub name: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Raw positioned content of one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TextSpan>,
    pub images: Vec<PlacedImage>,
}

/// A text line composed of multiple spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans,
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Get the combined text of all spans with appropriate spacing.
    ///
    /// Inserts spaces between spans based on their X coordinate gaps.
    /// No space is inserted between adjacent CJK characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - prev_span.right();

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * GLYPH_WIDTH_FACTOR
            };
            let space_threshold = avg_char_width * 0.2;

            let should_insert_space = gap > space_threshold && {
                let prev_is_cjk = prev_span
                    .text
                    .chars()
                    .last()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                let curr_is_cjk = span
                    .text
                    .chars()
                    .next()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                !(prev_is_cjk && curr_is_cjk)
            };

            let prev_ends_with_space =
                prev_span.text.ends_with(' ') || prev_span.text.ends_with('\u{00A0}');
            let curr_starts_with_space =
                span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

            if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }

    fn top(&self) -> f32 {
        self.spans.iter().map(TextSpan::top).fold(f32::MIN, f32::max)
    }

    fn bottom(&self) -> f32 {
        self.spans.iter().map(TextSpan::bottom).fold(f32::MAX, f32::min)
    }

    fn right(&self) -> f32 {
        self.spans.iter().map(TextSpan::right).fold(f32::MIN, f32::max)
    }
}

/// A detected column in the page layout.
#[derive(Debug, Clone)]
pub struct Column {
    /// Left boundary X coordinate
    pub left: f32,
    /// Right boundary X coordinate
    pub right: f32,
    /// Column index (0 = leftmost)
    pub index: usize,
}

impl Column {
    /// Check if an X coordinate falls within this column.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// A span belongs to a column if its left edge or its center is inside.
    pub fn contains_span(&self, span: &TextSpan) -> bool {
        let center = span.x + span.width / 2.0;
        self.contains(span.x) || self.contains(center)
    }
}

/// 2D affine transform `[a b c d e f]` as used by PDF content streams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_op(op: &ContentOp) -> Option<Self> {
        if op.operands.len() < 6 {
            return None;
        }
        Some(Self::new(
            op.number(0)?,
            op.number(1)?,
            op.number(2)?,
            op.number(3)?,
            op.number(4)?,
            op.number(5)?,
        ))
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Text state between BT and ET.
#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    font_name: Vec<u8>,
    font_size: f32,
    leading: Option<f32>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_name: Vec::new(),
            font_size: 12.0,
            leading: None,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn set_matrix(&mut self, m: Matrix) {
        self.matrix = m;
        self.line_matrix = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        self.translate(0.0, -leading);
    }

    /// Move the text cursor right by `width` unscaled text-space units.
    fn advance(&mut self, width: f32) {
        self.matrix = Matrix::translation(width, 0.0).then(&self.matrix);
    }
}

/// Layout analyzer producing layout trees from a [`PdfBackend`].
pub struct LayoutAnalyzer<'a> {
    backend: &'a dyn PdfBackend,
    params: LayoutParams,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a dyn PdfBackend, params: LayoutParams) -> Self {
        Self { backend, params }
    }

    /// Layouts of every page, in page order.
    pub fn page_layouts(&self) -> Result<Vec<PageLayout>> {
        self.backend
            .pages()
            .keys()
            .map(|&number| self.page_layout(number))
            .collect()
    }

    /// Layout of one page (1-indexed).
    pub fn page_layout(&self, page_num: u32) -> Result<PageLayout> {
        let content = self.extract_page_content(page_num)?;
        let mut elements = self.text_elements(&content);

        elements.extend(content.images.iter().map(|img| {
            let bbox = BoundingBox::from_pdf_rect(img.x0, img.y0, img.x1, img.y1, content.height);
            LayoutElement::image(bbox, img.name.clone())
        }));

        log::debug!(
            "Page {}: {} spans, {} images -> {} top-level elements",
            page_num,
            content.spans.len(),
            content.images.len(),
            elements.len()
        );

        Ok(PageLayout::new(page_num, content.width, content.height).with_elements(elements))
    }

    /// Extract positioned spans and images from a page.
    pub fn extract_page_content(&self, page_num: u32) -> Result<PageContent> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let (width, height) = self.backend.page_size(page_id);
        let data = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&data)?;

        let image_names: HashSet<Vec<u8>> =
            self.backend.page_image_names(page_id).into_iter().collect();

        let (spans, images) = self.interpret(page_id, &ops, &image_names);
        Ok(PageContent {
            width,
            height,
            spans,
            images,
        })
    }

    /// Run the content stream operators, collecting spans and image placements.
    fn interpret(
        &self,
        page_id: PageId,
        ops: &[ContentOp],
        image_names: &HashSet<Vec<u8>>,
    ) -> (Vec<TextSpan>, Vec<PlacedImage>) {
        let mut spans = Vec::new();
        let mut images = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut text = TextState::default();
        let mut in_text_block = false;

        for op in ops {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => ctm = ctm_stack.pop().unwrap_or(Matrix::IDENTITY),
                "cm" => {
                    if let Some(m) = Matrix::from_op(op) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    text.begin();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        text.font_name = name.clone();
                    }
                    text.font_size = op.number(1).unwrap_or(12.0);
                }
                "TL" => text.leading = op.number(0),
                "Td" => {
                    text.translate(op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                }
                "TD" => {
                    let ty = op.number(1).unwrap_or(0.0);
                    text.leading = Some(-ty);
                    text.translate(op.number(0).unwrap_or(0.0), ty);
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_op(op) {
                        text.set_matrix(m);
                    }
                }
                "T*" => text.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        text.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }
                    let (content, advance) = self.shown_text(page_id, op, &text);
                    if !content.trim().is_empty() {
                        let trm = text.matrix.then(&ctm);
                        let size = text.font_size * trm.scale();
                        spans.push(TextSpan::new(content, trm.e, trm.f, size));
                    }
                    text.advance(advance);
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        if image_names.contains(name) {
                            images.push(place_image(name, &ctm));
                        }
                    }
                }
                _ => {}
            }
        }

        (spans, images)
    }

    /// Decode the string operand(s) of a text-showing operator.
    ///
    /// Returns the text and the horizontal advance in unscaled text-space units.
    fn shown_text(&self, page_id: PageId, op: &ContentOp, state: &TextState) -> (String, f32) {
        let decode = |bytes: &[u8]| self.backend.decode_text(page_id, &state.font_name, bytes);
        let glyph_advance =
            |s: &str| s.chars().count() as f32 * state.font_size * GLYPH_WIDTH_FACTOR;

        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return (String::new(), 0.0);
                };
                // Adjustments beyond this many thousandths of an em read as word spaces.
                let space_threshold = 200.0;
                let mut combined = String::new();
                let mut advance = 0.0;

                for item in items {
                    match item {
                        PdfValue::Str(bytes) => {
                            let decoded = decode(bytes);
                            advance += glyph_advance(&decoded);
                            combined.push_str(&decoded);
                        }
                        other => {
                            let Some(n) = get_number_from_value(other) else {
                                continue;
                            };
                            advance -= n / 1000.0 * state.font_size;
                            let adjustment = -n;
                            if adjustment > space_threshold
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                                && !combined.ends_with('\u{00A0}')
                                && !combined
                                    .chars()
                                    .last()
                                    .map(is_spaceless_script_char)
                                    .unwrap_or(false)
                            {
                                combined.push(' ');
                            }
                        }
                    }
                }
                (combined, advance)
            }
            _ => {
                let index = if op.operator == "\"" { 2 } else { 0 };
                match op.operands.get(index) {
                    Some(PdfValue::Str(bytes)) => {
                        let decoded = decode(bytes);
                        let advance = glyph_advance(&decoded);
                        (decoded, advance)
                    }
                    _ => (String::new(), 0.0),
                }
            }
        }
    }

    /// Group spans into text blocks, one container per column on multi-column pages.
    fn text_elements(&self, content: &PageContent) -> Vec<LayoutElement> {
        if content.spans.is_empty() {
            return Vec::new();
        }

        let columns = if self.params.detect_columns {
            self.detect_columns(&content.spans)
        } else {
            Vec::new()
        };

        if columns.len() <= 1 {
            let lines = self.group_spans_into_lines(content.spans.clone());
            return self.group_lines_into_blocks(lines, content.height);
        }

        let mut column_spans: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
        for span in &content.spans {
            let col_idx = columns
                .iter()
                .position(|c| c.contains_span(span))
                .unwrap_or(0);
            column_spans[col_idx].push(span.clone());
        }

        column_spans
            .into_iter()
            .filter(|spans| !spans.is_empty())
            .map(|spans| {
                let lines = self.group_spans_into_lines(spans);
                LayoutElement::container(self.group_lines_into_blocks(lines, content.height))
            })
            .collect()
    }

    /// Detect columns in a page based on vertical gap (gutter) detection.
    ///
    /// Returns columns sorted from left to right.
    pub fn detect_columns(&self, spans: &[TextSpan]) -> Vec<Column> {
        if spans.is_empty() {
            return vec![];
        }

        let min_x = spans.iter().map(|s| s.x).fold(f32::MAX, f32::min);
        let max_x = spans.iter().map(TextSpan::right).fold(f32::MIN, f32::max);
        let page_width = max_x - min_x;

        let single = || {
            vec![Column {
                left: min_x - 10.0,
                right: max_x + 10.0,
                index: 0,
            }]
        };

        if page_width < 250.0 {
            return single();
        }

        // Divide the text extent into vertical slices and count occupancy
        let slice_width = 3.0;
        let num_slices = ((page_width / slice_width) as usize) + 1;
        let mut slice_occupancy = vec![0usize; num_slices];

        for span in spans {
            let start_slice = ((span.x - min_x) / slice_width) as usize;
            let end_slice = ((span.right() - min_x) / slice_width) as usize;

            for slot in slice_occupancy
                .iter_mut()
                .take(end_slice.min(num_slices - 1) + 1)
                .skip(start_slice)
            {
                *slot += 1;
            }
        }

        // Largest empty run in the middle 70% of the page, preferring runs near the center
        let search_start = num_slices * 15 / 100;
        let search_end = num_slices * 85 / 100;
        let page_center = num_slices / 2;

        let mut best_gap_start = 0;
        let mut best_gap_len = 0;
        let mut best_gap_center_dist = f32::MAX;
        let mut current_gap_start = 0;
        let mut current_gap_len = 0;

        let consider = |start: usize,
                        len: usize,
                        best_start: &mut usize,
                        best_len: &mut usize,
                        best_dist: &mut f32| {
            let gap_center = start + len / 2;
            let center_dist = (gap_center as i32 - page_center as i32).abs() as f32;
            let gap_width = len as f32 * slice_width;
            let best_width = *best_len as f32 * slice_width;

            if gap_width >= 10.0
                && (gap_width > best_width * 1.5
                    || (gap_width >= best_width * 0.7 && center_dist < *best_dist))
            {
                *best_start = start;
                *best_len = len;
                *best_dist = center_dist;
            }
        };

        for (i, &occupancy) in slice_occupancy
            .iter()
            .enumerate()
            .take(search_end)
            .skip(search_start)
        {
            if occupancy == 0 {
                if current_gap_len == 0 {
                    current_gap_start = i;
                }
                current_gap_len += 1;
            } else {
                if current_gap_len > 0 {
                    consider(
                        current_gap_start,
                        current_gap_len,
                        &mut best_gap_start,
                        &mut best_gap_len,
                        &mut best_gap_center_dist,
                    );
                }
                current_gap_len = 0;
            }
        }
        if current_gap_len > 0 {
            consider(
                current_gap_start,
                current_gap_len,
                &mut best_gap_start,
                &mut best_gap_len,
                &mut best_gap_center_dist,
            );
        }

        let gap_width = best_gap_len as f32 * slice_width;
        if gap_width < 12.0 {
            log::debug!("Gap too small ({:.1}pt), treating as single column", gap_width);
            return single();
        }

        let gutter_center =
            min_x + (best_gap_start as f32 + best_gap_len as f32 / 2.0) * slice_width;

        if gutter_center - min_x < 80.0 || max_x - gutter_center < 80.0 {
            log::debug!("Column too narrow, treating as single column");
            return single();
        }

        // Both columns should hold at least 10% of the spans
        let left_spans = spans
            .iter()
            .filter(|s| s.x + s.width / 2.0 < gutter_center)
            .count();
        let right_spans = spans.len() - left_spans;
        let min_spans = (spans.len() / 10).max(2);
        if left_spans < min_spans || right_spans < min_spans {
            log::debug!(
                "Spans too imbalanced (left={}, right={}), treating as single column",
                left_spans,
                right_spans
            );
            return single();
        }

        log::debug!("Detected gutter at x={:.1}", gutter_center);
        vec![
            Column {
                left: min_x - 10.0,
                right: gutter_center,
                index: 0,
            },
            Column {
                left: gutter_center,
                right: max_x + 10.0,
                index: 1,
            },
        ]
    }

    /// Y-based line grouping, top to bottom.
    pub fn group_spans_into_lines(&self, mut spans: Vec<TextSpan>) -> Vec<TextLine> {
        if spans.is_empty() {
            return vec![];
        }

        // PDF Y grows upward: sort descending, then by X
        spans.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<TextLine> = Vec::new();
        let mut current_line_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let y_tolerance = span.font_size * 0.3;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => current_line_spans.push(span),
                _ => {
                    if !current_line_spans.is_empty() {
                        lines.push(TextLine::from_spans(std::mem::take(
                            &mut current_line_spans,
                        )));
                    }
                    current_y = Some(span.y);
                    current_line_spans.push(span);
                }
            }
        }

        if !current_line_spans.is_empty() {
            lines.push(TextLine::from_spans(current_line_spans));
        }

        lines
    }

    /// Group lines into text blocks based on spacing.
    pub fn group_lines_into_blocks(&self, lines: Vec<TextLine>, page_height: f32) -> Vec<LayoutElement> {
        let mut blocks = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if self.should_break_block(prev, &line) {
                    blocks.push(text_block(std::mem::take(&mut current), page_height));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(text_block(current, page_height));
        }

        blocks
    }

    /// Determine if a new block should start.
    fn should_break_block(&self, prev_line: &TextLine, curr_line: &TextLine) -> bool {
        // Whitespace between the previous line's descent and this line's ascent
        let gap = prev_line.bottom() - curr_line.top();
        if gap > self.params.line_margin * prev_line.font_size {
            return true;
        }

        // Significant font size change
        if (prev_line.font_size - curr_line.font_size).abs() > 1.0 {
            return true;
        }

        // Significant left margin change (indentation)
        (prev_line.x - curr_line.x).abs() > 20.0
    }
}

/// Build a text block element from its lines.
fn text_block(lines: Vec<TextLine>, page_height: f32) -> LayoutElement {
    let x0 = lines.iter().map(|l| l.x).fold(f32::MAX, f32::min);
    let x1 = lines.iter().map(TextLine::right).fold(f32::MIN, f32::max);
    let top = lines.iter().map(TextLine::top).fold(f32::MIN, f32::max);
    let bottom = lines.iter().map(TextLine::bottom).fold(f32::MAX, f32::min);

    let text = lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n");

    LayoutElement::text(BoundingBox::from_pdf_rect(x0, bottom, x1, top, page_height), text)
}

/// Image XObjects are drawn into the unit square mapped by the CTM.
fn place_image(name: &[u8], ctm: &Matrix) -> PlacedImage {
    let corners = [
        ctm.apply(0.0, 0.0),
        ctm.apply(1.0, 0.0),
        ctm.apply(0.0, 1.0),
        ctm.apply(1.0, 1.0),
    ];
    let xs = corners.iter().map(|c| c.0);
    let ys = corners.iter().map(|c| c.1);

    PlacedImage {
        name: String::from_utf8_lossy(name).to_string(),
        x0: xs.clone().fold(f32::MAX, f32::min),
        x1: xs.fold(f32::MIN, f32::max),
        y0: ys.clone().fold(f32::MAX, f32::min),
        y1: ys.fold(f32::MIN, f32::max),
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory backend driven by a pre-built operator list.
    struct OpsBackend {
        ops: Vec<ContentOp>,
        images: Vec<Vec<u8>>,
    }

    impl PdfBackend for OpsBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }
        fn page_size(&self, _page: PageId) -> (f32, f32) {
            (612.0, 792.0)
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }
        fn page_image_names(&self, _page: PageId) -> Vec<Vec<u8>> {
            self.images.clone()
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
    }

    fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    fn s(text: &str) -> PdfValue {
        PdfValue::Str(text.as_bytes().to_vec())
    }

    fn show_at(x: f32, y: f32, text: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(12.0)]),
            ContentOp::new("Td", vec![num(x), num(y)]),
            ContentOp::new("Tj", vec![s(text)]),
            ContentOp::new("ET", vec![]),
        ]
    }

    fn analyze(ops: Vec<ContentOp>, images: Vec<Vec<u8>>) -> PageLayout {
        let backend = OpsBackend { ops, images };
        LayoutAnalyzer::new(&backend, LayoutParams::default())
            .page_layout(1)
            .unwrap()
    }

    #[test]
    fn test_matrix_composition() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 20.0);
        // scale first, then shift
        assert_eq!(scale.then(&shift).apply(1.0, 1.0), (12.0, 22.0));
        // shift first, then scale
        assert_eq!(shift.then(&scale).apply(1.0, 1.0), (22.0, 42.0));
    }

    #[test]
    fn test_lines_grouped_into_one_block() {
        let mut ops = show_at(72.0, 700.0, "First line of a para-");
        ops.extend(show_at(72.0, 686.0, "graph continues here."));
        let layout = analyze(ops, vec![]);

        assert_eq!(layout.elements.len(), 1);
        match &layout.elements[0] {
            LayoutElement::TextBlock { text, bbox } => {
                assert_eq!(text, "First line of a para-\ngraph continues here.");
                // Baseline 700 with 12pt text: top edge ~ 792 - 709.6
                assert!((bbox.y0 - 82.4).abs() < 0.01);
                assert_eq!(bbox.x0, 72.0);
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_large_gap_starts_new_block() {
        let mut ops = show_at(72.0, 700.0, "Heading");
        ops.extend(show_at(72.0, 640.0, "Body text"));
        let layout = analyze(ops, vec![]);
        assert_eq!(layout.elements.len(), 2);
    }

    #[test]
    fn test_ctm_applies_to_text() {
        let mut ops = vec![
            ContentOp::new("q", vec![]),
            ContentOp::new(
                "cm",
                vec![num(1.0), num(0.0), num(0.0), num(1.0), num(100.0), num(0.0)],
            ),
        ];
        ops.extend(show_at(0.0, 700.0, "Shifted"));
        ops.push(ContentOp::new("Q", vec![]));

        let layout = analyze(ops, vec![]);
        assert_eq!(layout.elements[0].bbox().x0, 100.0);
    }

    #[test]
    fn test_image_placement() {
        let ops = vec![
            ContentOp::new("q", vec![]),
            ContentOp::new(
                "cm",
                vec![num(200.0), num(0.0), num(0.0), num(100.0), num(50.0), num(600.0)],
            ),
            ContentOp::new("Do", vec![PdfValue::Name(b"Im0".to_vec())]),
            ContentOp::new("Do", vec![PdfValue::Name(b"Fm0".to_vec())]),
            ContentOp::new("Q", vec![]),
        ];
        let layout = analyze(ops, vec![b"Im0".to_vec()]);

        assert_eq!(layout.elements.len(), 1);
        assert_eq!(
            layout.elements[0],
            LayoutElement::image(BoundingBox::new(50.0, 92.0, 250.0, 192.0), "Im0")
        );
    }

    #[test]
    fn test_tj_array_inserts_word_spaces() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("Td", vec![num(72.0), num(500.0)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![s("Hello"), PdfValue::Integer(-300), s("World")])],
            ),
            ContentOp::new("ET", vec![]),
        ];
        let layout = analyze(ops, vec![]);
        match &layout.elements[0] {
            LayoutElement::TextBlock { text, .. } => assert_eq!(text, "Hello World"),
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_two_columns_become_containers() {
        let mut ops = Vec::new();
        for i in 0..6 {
            let y = 700.0 - i as f32 * 14.0;
            ops.extend(show_at(50.0, y, "left column text"));
            ops.extend(show_at(350.0, y, "right column text"));
        }
        let layout = analyze(ops, vec![]);

        assert_eq!(layout.elements.len(), 2);
        assert!(layout.elements.iter().all(LayoutElement::is_container));
        assert!(layout.elements[0].bbox().x1 < layout.elements[1].bbox().x0);
    }

    #[test]
    fn test_column_contains_span() {
        let col = Column {
            left: 100.0,
            right: 200.0,
            index: 0,
        };
        assert!(col.contains(100.0));
        assert!(!col.contains(201.0));

        let inside = TextSpan::new("Test", 120.0, 0.0, 12.0);
        assert!(col.contains_span(&inside));

        let mut straddling = TextSpan::new("Test", 90.0, 0.0, 12.0);
        straddling.width = 40.0; // center at 110
        assert!(col.contains_span(&straddling));

        assert!(!col.contains_span(&TextSpan::new("Test", 250.0, 0.0, 12.0)));
    }

    #[test]
    fn test_missing_page_is_out_of_range() {
        let backend = OpsBackend {
            ops: vec![],
            images: vec![],
        };
        let analyzer = LayoutAnalyzer::new(&backend, LayoutParams::default());
        assert!(matches!(
            analyzer.page_layout(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }
}
