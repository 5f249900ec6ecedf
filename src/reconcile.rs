//! Reconciliation of page layouts against detected tables.
//!
//! Text and images already covered by a table on the same page are dropped
//! so the table content is not reported twice. Everything else becomes
//! document paragraphs and image elements.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Document, ImageElement, LayoutElement, PageLayout, TableRegion};

/// Paragraphs and images collected from a set of page layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub paragraphs: Vec<String>,
    pub images: Vec<ImageElement>,
}

/// Walks layout trees and filters out everything covered by a table.
#[derive(Debug, Clone, Copy)]
pub struct LayoutReconciler<'a> {
    tables: &'a [TableRegion],
}

impl<'a> LayoutReconciler<'a> {
    pub fn new(tables: &'a [TableRegion]) -> Self {
        Self { tables }
    }

    /// Reconcile pages in order.
    ///
    /// Pages are numbered by their position in `layouts`, starting at 1.
    pub fn reconcile(&self, layouts: &[PageLayout]) -> Reconciled {
        let mut out = Reconciled::default();
        for (index, layout) in layouts.iter().enumerate() {
            let page = index as u32 + 1;
            for element in &layout.elements {
                self.visit(element, page, &mut out);
            }
        }
        log::debug!(
            "Reconciled {} pages into {} paragraphs and {} images",
            layouts.len(),
            out.paragraphs.len(),
            out.images.len()
        );
        out
    }

    fn covered(&self, element: &LayoutElement, page: u32) -> bool {
        self.tables
            .iter()
            .any(|table| table.page == page && element.bbox().overlaps(&table.bbox))
    }

    fn visit(&self, element: &LayoutElement, page: u32, out: &mut Reconciled) {
        match element {
            // Containers are never emitted; their children are tested one by one.
            LayoutElement::Container { children, .. } => {
                for child in children {
                    self.visit(child, page, out);
                }
            }
            _ if self.covered(element, page) => {
                log::debug!("Skipping element on page {} inside a table", page);
            }
            LayoutElement::TextBlock { text, .. } => {
                let text = normalize_ocr_text(text);
                if !text.trim().is_empty() {
                    out.paragraphs.push(text);
                }
            }
            LayoutElement::ImageBlock { bbox, name } => {
                out.images.push(ImageElement {
                    page,
                    bbox: *bbox,
                    name: name.clone(),
                });
            }
        }
    }
}

/// Reconcile `layouts` against the document's tables and append the result.
pub fn reconcile_into(document: &mut Document, layouts: &[PageLayout]) {
    let reconciled = LayoutReconciler::new(&document.tables).reconcile(layouts);
    document.paragraphs.extend(reconciled.paragraphs);
    document.images.extend(reconciled.images);
}

fn hyphen_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\s").expect("valid regex"))
}

/// Repair common OCR artifacts in extracted text.
///
/// Spacing carons are folded into the Slovene letters they belong to,
/// hyphenated line breaks are joined and the result is NFC-normalized.
pub fn normalize_ocr_text(text: &str) -> String {
    let text = text
        .replace("ˇs", "š")
        .replace("ˇc", "č")
        .replace("ˇz", "ž");
    let text = hyphen_break().replace_all(&text, "");
    text.nfc().collect()
}
