//! Integration tests for searching extracted documents and reporting matches.

use pdfsearch::render::{to_json, JsonFormat};
use pdfsearch::search::PartialRatio;
use pdfsearch::{
    BoundingBox, Combinator, Document, DocumentMatches, FuzzyScorer, SearchMatcher, SearchQuery,
    TableCell, TableRegion, TableRow,
};

fn cell(text: &str) -> TableCell {
    TableCell::new(text, BoundingBox::default())
}

fn table(header: &[&str], rows: &[&[&str]]) -> TableRegion {
    let mut region = TableRegion::new(1, BoundingBox::new(0.0, 0.0, 300.0, 100.0), 97.5);
    region.add_row(TableRow::header(header.iter().map(|c| cell(c)).collect()));
    for row in rows {
        region.add_row(TableRow::new(row.iter().map(|c| cell(c)).collect()));
    }
    region
}

fn annual_report() -> Document {
    let mut doc = Document::pdf("/archive/2023/annual-report.pdf");
    doc.paragraphs = vec![
        "Revenue increased in all regions. The forecast for next year is cautious.".to_string(),
        "Operating costs remained stable.".to_string(),
        "The board proposes a dividend.".to_string(),
    ];
    doc.tables = vec![
        table(&["Region", "Revenue"], &[&["North", "120"], &["South", "98"]]),
        table(&["Employee", "Office"], &[&["Marko", "Ljubljana"]]),
    ];
    doc
}

fn scanned_letter() -> Document {
    let mut doc = Document::raster("/archive/inbox/letter.png");
    doc.paragraphs = vec!["Dear customer, your invoice is attached.".to_string()];
    doc
}

#[test]
fn test_search_keeps_only_matching_documents() {
    let query = SearchQuery::parse("revenue", Combinator::All).unwrap();
    let docs = [annual_report(), scanned_letter()];

    let matches = pdfsearch::search(&docs, &query);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].path, docs[0].path);
    assert_eq!(matches[0].paragraphs.len(), 1);
    assert!(matches[0].paragraphs[0].starts_with("Revenue increased"));
    assert_eq!(matches[0].tables.len(), 1);
    assert_eq!(matches[0].tables[0].rows[0].cells[1].text, "Revenue");
}

#[test]
fn test_any_combinator_spans_documents() {
    let query = SearchQuery::parse("dividend,invoice", Combinator::Any).unwrap();
    let docs = [annual_report(), scanned_letter()];

    let matches = SearchMatcher::new(&query).search_all(&docs);

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].paragraphs, vec!["The board proposes a dividend."]);
    assert_eq!(
        matches[1].paragraphs,
        vec!["Dear customer, your invoice is attached."]
    );
}

#[test]
fn test_all_combinator_needs_every_term_in_one_paragraph() {
    // "revenue" and "dividend" occur in the document, but never together.
    let query = SearchQuery::parse("revenue,dividend", Combinator::All).unwrap();
    let matches = pdfsearch::search(&[annual_report()], &query);
    assert!(matches.is_empty());

    let query = SearchQuery::parse("revenue,forecast", Combinator::All).unwrap();
    let matches = pdfsearch::search(&[annual_report()], &query);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].paragraphs.len(), 1);
}

#[test]
fn test_misspelled_term_still_matches() {
    let query = SearchQuery::parse("lubljana", Combinator::All).unwrap();
    let matches = pdfsearch::search(&[annual_report()], &query);

    assert_eq!(matches.len(), 1);
    assert!(matches[0].paragraphs.is_empty());
    assert_eq!(matches[0].tables.len(), 1);
    assert_eq!(matches[0].tables[0].rows[1].cells[1].text, "Ljubljana");
}

#[test]
fn test_threshold_controls_fuzziness() {
    let strict = SearchQuery::parse("lubljana", Combinator::All)
        .unwrap()
        .with_threshold(99);
    assert!(pdfsearch::search(&[annual_report()], &strict).is_empty());

    let scorer = PartialRatio;
    assert_eq!(scorer.score("lubljana", "Ljubljana"), 88);
}

#[test]
fn test_terms_longer_than_every_sentence_do_not_match() {
    let query = SearchQuery::parse(
        "operating costs remained stable over the entire period",
        Combinator::All,
    )
    .unwrap();
    let matches = pdfsearch::search(&[annual_report()], &query);
    assert!(matches.iter().all(|m| m.paragraphs.is_empty()));
}

/// Scores every pair the same, to check the scorer is pluggable.
struct Constant(u8);

impl FuzzyScorer for Constant {
    fn score(&self, _a: &str, _b: &str) -> u8 {
        self.0
    }
}

#[test]
fn test_custom_scorer() {
    let query = SearchQuery::parse("anything", Combinator::All).unwrap();
    let docs = [annual_report()];

    let everything = SearchMatcher::with_scorer(&query, Box::new(Constant(100))).search_all(&docs);
    assert_eq!(everything[0].paragraphs.len(), 3);
    assert_eq!(everything[0].tables.len(), 2);

    let nothing = SearchMatcher::with_scorer(&query, Box::new(Constant(80))).search_all(&docs);
    assert!(nothing.is_empty());
}

#[test]
fn test_report_rendering() {
    let query = SearchQuery::parse("revenue", Combinator::All).unwrap();
    let matches = pdfsearch::search(&[annual_report(), scanned_letter()], &query);

    let html = pdfsearch::to_html(&matches);
    assert!(html.contains(
        "<h2>Found in document with location: /archive/2023/annual-report.pdf</h2>"
    ));
    assert!(!html.contains("letter.png"));
    assert!(html.contains("<th>Region</th><th>Revenue</th>"));
    assert!(html.contains("<td>North</td><td>120</td>"));

    let dir = tempfile::tempdir().unwrap();
    let path = pdfsearch::write_summary(dir.path(), &matches).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), html);
}

#[test]
fn test_json_report_round_trips() {
    let query = SearchQuery::parse("invoice", Combinator::Any).unwrap();
    let matches = pdfsearch::search(&[scanned_letter()], &query);

    let json = to_json(&matches, JsonFormat::Compact).unwrap();
    let parsed: Vec<DocumentMatches> = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].path, matches[0].path);
    assert_eq!(parsed[0].paragraphs, matches[0].paragraphs);
}
