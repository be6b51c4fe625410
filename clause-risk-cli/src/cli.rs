use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clause_risk::DEFAULT_BUDGET_SEC;
use clause_risk_ingest::{CHAR_CAP, DEFAULT_MAX_PAGES};

#[derive(Parser, Debug)]
#[command(name = "clause-risk")]
#[command(about = "Clause segmentation and risk scoring for contracts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a txt, pdf or docx contract
    Analyze(AnalyzeArgs),

    /// Render a saved JSON analysis result as Markdown or PDF
    Report {
        /// JSON file written by `analyze --format json`
        result: PathBuf,

        /// Include summary tables and per-clause sections
        #[arg(long)]
        detailed: bool,

        /// Write the detailed report as a PDF
        #[arg(long, conflicts_with = "detailed")]
        pdf: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the risk rules with their effective weights
    Rules {
        /// Weight override file (JSON or TOML)
        #[arg(long)]
        weights: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Contract to analyze
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Time budget in seconds
    #[arg(long, default_value_t = DEFAULT_BUDGET_SEC)]
    pub budget: u64,

    /// Language for LLM explanations
    #[arg(long, default_value = "English")]
    pub lang: String,

    /// Ask the configured LLM to explain each clause
    #[arg(long)]
    pub llm: bool,

    /// PDF pages to read
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Characters of extracted text to keep
    #[arg(long, default_value_t = CHAR_CAP)]
    pub max_chars: usize,

    /// Weight override file (JSON or TOML)
    #[arg(long)]
    pub weights: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed analysis result
    Json,
    /// Short Markdown report
    Markdown,
    /// Markdown report with per-clause sections
    Detailed,
    /// Detailed report as a PDF document
    Pdf,
}

impl OutputFormat {
    /// Format for `report`: `--pdf` wins, then `--detailed`.
    pub fn for_report(detailed: bool, pdf: bool) -> Self {
        if pdf {
            OutputFormat::Pdf
        } else if detailed {
            OutputFormat::Detailed
        } else {
            OutputFormat::Markdown
        }
    }
}
