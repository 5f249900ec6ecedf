//! Multi-term fuzzy search over extracted paragraphs and tables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Document, TableRegion};

/// Default minimum score a term must exceed to count as found.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// How per-term results are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Every term must be found
    #[default]
    All,
    /// At least one term must be found
    Any,
}

impl Combinator {
    /// Combine per-term results, stopping as soon as the outcome is decided.
    pub fn combine<I>(self, mut results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        match self {
            Combinator::All => results.all(|found| found),
            Combinator::Any => results.any(|found| found),
        }
    }
}

impl FromStr for Combinator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "and" | "&" | "all" | "true" | "t" | "y" | "1" => Ok(Combinator::All),
            "or" | "|" | "any" | "false" | "f" | "n" | "0" => Ok(Combinator::Any),
            _ => Err(Error::InvalidSearchCombinator(s.to_string())),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::All => write!(f, "and"),
            Combinator::Any => write!(f, "or"),
        }
    }
}

/// Search terms with their combinator and score threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    terms: Vec<String>,
    combinator: Combinator,
    threshold: u8,
}

impl SearchQuery {
    /// Build a query. Terms are trimmed and lowercased; blank terms are dropped.
    pub fn new<I, S>(terms: I, combinator: Combinator) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return Err(Error::InvalidSearchQuery(
                "at least one search term is required".to_string(),
            ));
        }

        Ok(Self {
            terms,
            combinator,
            threshold: DEFAULT_THRESHOLD,
        })
    }

    /// Build a query from a comma-separated list of terms.
    ///
    /// ```
    /// use pdfsearch::search::{Combinator, SearchQuery};
    ///
    /// let query = SearchQuery::parse("Revenue, net income,", Combinator::Any).unwrap();
    /// assert_eq!(query.terms(), &["revenue", "net income"]);
    /// ```
    pub fn parse(terms: &str, combinator: Combinator) -> Result<Self> {
        Self::new(terms.split(','), combinator)
    }

    /// Set the score a match must exceed (clamped to 100).
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(100);
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

/// Similarity scorer used by the matcher.
pub trait FuzzyScorer: Send + Sync {
    /// Similarity of `a` and `b` in [0, 100].
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Best similarity of the shorter string against every equally long window
/// of the longer one, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl FuzzyScorer for PartialRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let a: Vec<char> = a.to_lowercase().chars().collect();
        let b: Vec<char> = b.to_lowercase().chars().collect();
        let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

        if short.is_empty() {
            return if long.is_empty() { 100 } else { 0 };
        }

        let needle: String = short.iter().collect();
        let mut best = 0.0f64;
        for window in long.windows(short.len()) {
            let candidate: String = window.iter().collect();
            let similarity = strsim::normalized_levenshtein(&needle, &candidate);
            if similarity > best {
                best = similarity;
                if best >= 1.0 {
                    break;
                }
            }
        }

        (best * 100.0).round() as u8
    }
}

/// Paragraphs and tables of one document that matched a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMatches {
    /// Original location of the document
    pub path: PathBuf,
    pub paragraphs: Vec<String>,
    pub tables: Vec<TableRegion>,
}

impl DocumentMatches {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty()
    }
}

/// Applies a [`SearchQuery`] to document content.
pub struct SearchMatcher<'q> {
    query: &'q SearchQuery,
    scorer: Box<dyn FuzzyScorer>,
}

impl<'q> SearchMatcher<'q> {
    /// Matcher using [`PartialRatio`].
    pub fn new(query: &'q SearchQuery) -> Self {
        Self::with_scorer(query, Box::new(PartialRatio))
    }

    pub fn with_scorer(query: &'q SearchQuery, scorer: Box<dyn FuzzyScorer>) -> Self {
        Self { query, scorer }
    }

    fn above_threshold(&self, term: &str, text: &str) -> bool {
        self.scorer.score(term, text) > self.query.threshold
    }

    /// Whether a paragraph matches.
    ///
    /// The paragraph is split into sentences on `.`; a term is found when
    /// a sentence at least as long as the term scores above the threshold.
    pub fn paragraph_matches(&self, paragraph: &str) -> bool {
        let sentences: Vec<&str> = paragraph.split('.').collect();
        self.query.combinator.combine(self.query.terms.iter().map(|term| {
            let term_len = term.chars().count();
            sentences
                .iter()
                .any(|s| s.chars().count() >= term_len && self.above_threshold(term, s))
        }))
    }

    /// Whether any cell of any column matches each term as the combinator requires.
    pub fn table_matches(&self, table: &TableRegion) -> bool {
        let columns = table.column_count();
        self.query.combinator.combine(self.query.terms.iter().map(|term| {
            (0..columns).any(|i| table.column(i).any(|cell| self.above_threshold(term, cell)))
        }))
    }

    /// Matching paragraphs in their original order.
    pub fn match_paragraphs(&self, paragraphs: &[String]) -> Vec<String> {
        paragraphs
            .iter()
            .filter(|p| self.paragraph_matches(p))
            .cloned()
            .collect()
    }

    /// Matching tables in their original order.
    pub fn match_tables(&self, tables: &[TableRegion]) -> Vec<TableRegion> {
        tables
            .iter()
            .filter(|t| self.table_matches(t))
            .cloned()
            .collect()
    }

    /// Search one document.
    pub fn search(&self, document: &Document) -> DocumentMatches {
        let matches = DocumentMatches {
            path: document.path.clone(),
            paragraphs: self.match_paragraphs(&document.paragraphs),
            tables: self.match_tables(&document.tables),
        };
        log::debug!(
            "{}: {} paragraphs and {} tables matched",
            document.path.display(),
            matches.paragraphs.len(),
            matches.tables.len()
        );
        matches
    }

    /// Search every document, keeping only those with at least one match.
    pub fn search_all(&self, documents: &[Document]) -> Vec<DocumentMatches> {
        documents
            .iter()
            .map(|doc| self.search(doc))
            .filter(|m| !m.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, TableCell, TableRow};

    fn paragraphs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn table(rows: &[&[&str]]) -> TableRegion {
        let mut region = TableRegion::new(1, BoundingBox::default(), 95.0);
        for cells in rows {
            region.add_row(TableRow::new(
                cells
                    .iter()
                    .map(|c| TableCell::new(*c, BoundingBox::default()))
                    .collect(),
            ));
        }
        region
    }

    #[test]
    fn test_combinator_parsing() {
        for s in ["and", "AND", "&", "all", "true", "t", "Y", "1"] {
            assert_eq!(s.parse::<Combinator>().unwrap(), Combinator::All, "{}", s);
        }
        for s in ["or", "Or", "|", "any", "false", "f", "n", "0"] {
            assert_eq!(s.parse::<Combinator>().unwrap(), Combinator::Any, "{}", s);
        }
        assert!(matches!(
            "maybe".parse::<Combinator>(),
            Err(Error::InvalidSearchCombinator(_))
        ));
    }

    #[test]
    fn test_query_normalizes_terms() {
        let query = SearchQuery::parse(" Revenue ,, Net Income ", Combinator::All).unwrap();
        assert_eq!(query.terms(), &["revenue", "net income"]);
        assert_eq!(query.threshold(), DEFAULT_THRESHOLD);
        assert!(SearchQuery::parse(" , ", Combinator::All).is_err());
    }

    #[test]
    fn test_partial_ratio() {
        let scorer = PartialRatio;
        assert_eq!(scorer.score("revenue", "Total REVENUE grew"), 100);
        assert_eq!(scorer.score("Total revenue grew", "revenue"), 100);
        assert!(scorer.score("revenue", "revenu grew") >= 80);
        assert!(scorer.score("revenue", "weather report") < 60);
        assert_eq!(scorer.score("", "text"), 0);
    }

    #[test]
    fn test_all_requires_every_term() {
        let query = SearchQuery::parse("revenue,forecast", Combinator::All).unwrap();
        let matcher = SearchMatcher::new(&query);

        let found = matcher.match_paragraphs(&paragraphs(&[
            "Revenue grew. The forecast is stable.",
            "Revenue grew strongly this year.",
            "Nothing relevant here.",
        ]));
        assert_eq!(found, vec!["Revenue grew. The forecast is stable."]);
    }

    #[test]
    fn test_any_requires_one_term() {
        let query = SearchQuery::parse("revenue,forecast", Combinator::Any).unwrap();
        let matcher = SearchMatcher::new(&query);

        let found = matcher.match_paragraphs(&paragraphs(&[
            "The forecast is stable.",
            "Nothing relevant here.",
            "Revenue grew strongly.",
        ]));
        assert_eq!(found, vec!["The forecast is stable.", "Revenue grew strongly."]);
    }

    #[test]
    fn test_sentence_shorter_than_term_is_ignored() {
        let query = SearchQuery::parse("revenue", Combinator::All).unwrap();
        let matcher = SearchMatcher::new(&query);
        // every sentence fragment is shorter than the term
        assert!(!matcher.paragraph_matches("rev. enue. re"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        struct Fixed(u8);
        impl FuzzyScorer for Fixed {
            fn score(&self, _: &str, _: &str) -> u8 {
                self.0
            }
        }

        let query = SearchQuery::parse("term", Combinator::All).unwrap();
        let at = SearchMatcher::with_scorer(&query, Box::new(Fixed(80)));
        let above = SearchMatcher::with_scorer(&query, Box::new(Fixed(81)));
        assert!(!at.paragraph_matches("some sentence"));
        assert!(above.paragraph_matches("some sentence"));
    }

    #[test]
    fn test_table_search_uses_all_terms() {
        let tables = vec![
            table(&[&["Region", "Revenue"], &["North", "120"]]),
            table(&[&["Name", "Forecast"], &["Revenue", "10"]]),
        ];

        let all = SearchQuery::parse("revenue,forecast", Combinator::All).unwrap();
        let found = SearchMatcher::new(&all).match_tables(&tables);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rows[0].cells[1].text, "Forecast");

        let any = SearchQuery::parse("revenue,forecast", Combinator::Any).unwrap();
        assert_eq!(SearchMatcher::new(&any).match_tables(&tables).len(), 2);
    }

    #[test]
    fn test_search_document() {
        let mut doc = Document::pdf("/docs/report.pdf");
        doc.paragraphs = paragraphs(&["Quarterly revenue report.", "Unrelated text."]);
        doc.tables.push(table(&[&["Item", "Revenue"]]));

        let query = SearchQuery::parse("revenue", Combinator::All).unwrap();
        let matcher = SearchMatcher::new(&query);
        let matches = matcher.search(&doc);
        assert_eq!(matches.path, PathBuf::from("/docs/report.pdf"));
        assert_eq!(matches.paragraphs, vec!["Quarterly revenue report."]);
        assert_eq!(matches.tables.len(), 1);

        let empty = Document::pdf("/docs/empty.pdf");
        assert_eq!(matcher.search_all(&[doc, empty]).len(), 1);
    }
}
