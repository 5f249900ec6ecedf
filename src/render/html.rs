//! HTML summary report of search results.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{TableRegion, TableRow};
use crate::search::DocumentMatches;

/// File name of the report inside the output directory.
pub const SUMMARY_FILE: &str = "summary.html";

const STYLE: &str = "\
body { font-family: Helvetica, Arial, sans-serif; color: #5e5d52; }
.container { margin: 2em 3%; }
.responsive-table { width: 100%; margin-bottom: 1.5em; border-spacing: 0; }
.responsive-table thead { background: #337aa8; color: #fff; }
.responsive-table th, .responsive-table td { padding: .5em; text-align: left; vertical-align: top; }
.responsive-table tbody tr:nth-of-type(even) { background: rgba(94, 93, 82, .1); }
";

/// Render the report for every document with at least one match.
pub fn to_html(matches: &[DocumentMatches]) -> String {
    let mut output = String::new();
    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    output.push_str("<title>Summary of search results</title>\n");
    output.push_str("<style>\n");
    output.push_str(STYLE);
    output.push_str("</style>\n</head>\n<body>\n");
    output.push_str("<h1 id=\"heading\">Summary of search results</h1>\n");

    for (index, doc) in matches.iter().filter(|m| !m.is_empty()).enumerate() {
        render_document(&mut output, index, doc);
    }

    output.push_str("</body>\n</html>\n");
    output
}

/// Write the report as `summary.html` into `out_dir`, returning its path.
pub fn write_summary(out_dir: &Path, matches: &[DocumentMatches]) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(SUMMARY_FILE);
    fs::write(&path, to_html(matches))
        .map_err(|e| Error::Render(format!("cannot write {}: {}", path.display(), e)))?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

fn render_document(output: &mut String, index: usize, doc: &DocumentMatches) {
    output.push_str(&format!("<div id=\"{}\">\n", index));
    output.push_str(&format!(
        "<h2>Found in document with location: {}</h2>\n",
        escape_html(&doc.path.display().to_string())
    ));

    for paragraph in &doc.paragraphs {
        output.push_str("<p>");
        output.push_str(&escape_html(paragraph));
        output.push_str("</p>\n");
    }

    for (table_index, table) in doc.tables.iter().enumerate() {
        output.push_str(&format!(
            "<div id=\"table{}\" class=\"container\">\n",
            table_index
        ));
        render_table(output, table);
        output.push_str("</div>\n");
    }

    output.push_str("</div>\n");
}

fn render_table(output: &mut String, table: &TableRegion) {
    output.push_str("<table class=\"responsive-table\">\n");

    let (header, body): (Vec<&TableRow>, Vec<&TableRow>) =
        table.rows.iter().partition(|row| row.is_header);

    if !header.is_empty() {
        output.push_str("<thead>\n");
        for row in header {
            render_row(output, row, "th");
        }
        output.push_str("</thead>\n");
    }

    output.push_str("<tbody>\n");
    for row in body {
        render_row(output, row, "td");
    }
    output.push_str("</tbody>\n");
    output.push_str("</table>\n");
}

fn render_row(output: &mut String, row: &TableRow, tag: &str) {
    output.push_str("<tr>");
    for cell in &row.cells {
        output.push_str(&format!("<{}>", tag));
        output.push_str(&cell_html(&cell.text));
        output.push_str(&format!("</{}>", tag));
    }
    output.push_str("</tr>\n");
}

/// Escaped cell text with line breaks kept as `<br>`.
fn cell_html(text: &str) -> String {
    text.trim()
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
