//! pdfsearch CLI - search text and tables across PDFs and scanned images

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use pdfsearch::{
    BatchRunner, Collaborators, Combinator, DocumentOutcome, JsonFormat, PipelineOptions,
    SearchQuery,
};

#[derive(Parser)]
#[command(name = "pdfsearch")]
#[command(version)]
#[command(
    about = "Extract text and tables from PDFs and images, with OCR fallback, and search them",
    long_about = None
)]
struct Cli {
    /// Directory (or single file) to process
    #[arg(long, value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Directory the report is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Comma-separated search terms
    #[arg(long, value_name = "TERMS")]
    search: Option<String>,

    /// How terms are combined (and, or)
    #[arg(long, value_name = "MODE", default_value = "and")]
    search_mode: String,

    /// Minimum fuzzy score (0-100) a term must exceed
    #[arg(long, default_value_t = pdfsearch::search::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Tesseract language data directory
    #[arg(
        long,
        value_name = "DIR",
        env = "TESSDATA_PREFIX",
        default_value = "/usr/share/tessdata"
    )]
    tessdata: PathBuf,

    /// Extract and search tables
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    tables: bool,

    /// Process documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "html")]
    format: ReportFormat,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// HTML summary written to summary.html
    Html,
    /// JSON written to stdout
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Critical | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();

    let result = match &cli.command {
        Some(Commands::Info { input }) => cmd_info(input),
        None => cmd_search(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_search(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let query = match cli.search.as_deref() {
        Some(terms) => {
            let combinator = Combinator::from_str(&cli.search_mode)?;
            Some(SearchQuery::parse(terms, combinator)?.with_threshold(cli.threshold))
        }
        None => None,
    };

    let mut options = PipelineOptions::default().with_tables(cli.tables);
    options.ocr = options.ocr.with_tessdata_dir(&cli.tessdata);
    if cli.sequential {
        options = options.sequential();
    }

    let documents = pdfsearch::find_documents(&cli.path)?;
    if documents.is_empty() {
        println!(
            "{} {}",
            "No PDFs or images found in".yellow(),
            cli.path.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("Extracting...");

    let collaborators = Collaborators::standard(&options);
    let report = BatchRunner::new(&collaborators, &options).run(documents, |outcome| {
        if let DocumentOutcome::Skipped { document, reason } = outcome {
            pb.println(format!(
                "{} {}: {}",
                "skipped".yellow(),
                document.path.display(),
                reason
            ));
        }
        pb.inc(1);
    });
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            pb.abandon_with_message("Aborted");
            return Err(e.into());
        }
    };
    pb.finish_with_message("Done!");

    println!("\n{}", "Extraction".green().bold());
    println!(
        "  {} {} processed",
        "├─".dimmed(),
        report.processed_count()
    );
    println!("  {} {} via OCR", "├─".dimmed(), report.ocr_count());
    println!("  {} {} skipped", "└─".dimmed(), report.skipped_count());

    let matches = match &query {
        Some(query) => {
            let matches = pdfsearch::search(report.documents(), query);
            println!(
                "\n{} {} document(s) match {} ({})",
                "Search:".green().bold(),
                matches.len(),
                query.terms().join(", ").bold(),
                query.combinator()
            );
            matches
        }
        None => Vec::new(),
    };

    // The summary is written even without a query, with the heading only.
    match cli.format {
        ReportFormat::Html => {
            let path = pdfsearch::write_summary(&cli.out, &matches)?;
            println!("{} {}", "Saved to".green(), path.display());
        }
        ReportFormat::Json => {
            let json = pdfsearch::render::to_json(&matches, JsonFormat::Pretty)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !pdfsearch::is_pdf(input) {
        return Err(format!("not a PDF file: {}", input.display()).into());
    }
    let doc = pdfsearch::inspect(input)?;
    let size = fs::metadata(input)?.len();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {} bytes", "Size".bold(), size);
    println!("{}: PDF {}", "Format".bold(), doc.metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), doc.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if doc.metadata.encrypted { "Yes" } else { "No" }
    );
    println!(
        "{}: {}",
        "Extractable".bold(),
        if doc.extractable { "Yes" } else { "No" }
    );

    println!("{}: {}", "Title".bold(), doc.metadata.title);
    println!("{}: {}", "Author".bold(), doc.metadata.author);
    println!("{}: {}", "Subject".bold(), doc.metadata.subject);
    println!("{}: {}", "Creator".bold(), doc.metadata.creator);
    println!("{}: {}", "Producer".bold(), doc.metadata.producer);
    if let Some(created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Table of Contents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if doc.table_of_contents.is_empty() {
        println!("{}", "(none)".dimmed());
    } else {
        println!("{}", doc.table_of_contents_text());
    }

    Ok(())
}
