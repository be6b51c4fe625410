use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clause_risk::{AnalysisOptions, AnalysisResult, Analyzer, RuleEngine, RuleId, RuleWeights};
use clause_risk_ingest::{extract_file, ExtractOptions};
use clause_risk_llm::GroqExplainer;
use clause_risk_report::{build_detailed_markdown, build_markdown, build_pdf};
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, OutputFormat};

/// Command output: text for the terminal, or a binary document.
#[derive(Debug)]
pub enum Rendered {
    Text(String),
    Binary(Vec<u8>),
}

impl Rendered {
    fn bytes(&self) -> &[u8] {
        match self {
            Rendered::Text(text) => text.as_bytes(),
            Rendered::Binary(bytes) => bytes,
        }
    }
}

pub fn analyze(args: &AnalyzeArgs) -> Result<Rendered> {
    let extract_options = ExtractOptions {
        max_pages: args.max_pages,
        max_chars: args.max_chars,
    };
    let extracted = extract_file(&args.file, &extract_options)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    info!(
        file = %args.file.display(),
        format = %extracted.format,
        chars = extracted.text.chars().count(),
        "extracted text"
    );

    let mut analyzer = Analyzer::new(RuleEngine::new(load_weights(args.weights.as_deref())?));
    if args.llm {
        let explainer = GroqExplainer::from_env();
        if !explainer.has_credentials() {
            warn!("no LLM API key configured, clauses will carry placeholder notes");
        }
        analyzer = analyzer.with_explainer(explainer);
    }

    let options = AnalysisOptions {
        time_budget_sec: args.budget,
        lang: args.lang.clone(),
        use_llm: args.llm,
    };
    let result = analyzer.analyze(&extracted.text, &options);
    render(&result, args.format)
}

pub fn report(path: &Path, format: OutputFormat) -> Result<Rendered> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let result: AnalysisResult = serde_json::from_str(&content)
        .with_context(|| format!("{} is not an analysis result", path.display()))?;
    render(&result, format)
}

pub fn rules(weights: Option<&Path>) -> Result<String> {
    let weights = load_weights(weights)?;
    let width = RuleId::ALL
        .iter()
        .map(|id| id.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for id in RuleId::ALL {
        let marker = if id.is_severe() { "!" } else { " " };
        out.push_str(&format!(
            "{:<width$} {:>3} {} {}\n",
            id.as_str(),
            weights.get(id),
            marker,
            id.description(),
            width = width
        ));
    }
    Ok(out)
}

/// Write to `output`, or stdout when no path is given.
pub fn emit(rendered: &Rendered, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        return fs::write(path, rendered.bytes())
            .with_context(|| format!("failed to write {}", path.display()));
    }

    let mut stdout = io::stdout().lock();
    match rendered {
        Rendered::Text(text) => writeln!(stdout, "{}", text.trim_end_matches('\n'))?,
        Rendered::Binary(bytes) => stdout.write_all(bytes)?,
    }
    stdout.flush()?;
    Ok(())
}

/// An explicit weights file must load; otherwise the environment override
/// is tried and falls back to the defaults.
fn load_weights(path: Option<&Path>) -> Result<RuleWeights> {
    match path {
        Some(path) => Ok(RuleWeights::load(path)?),
        None => Ok(RuleWeights::from_env()),
    }
}

fn render(result: &AnalysisResult, format: OutputFormat) -> Result<Rendered> {
    Ok(match format {
        OutputFormat::Json => Rendered::Text(serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => Rendered::Text(build_markdown(result)),
        OutputFormat::Detailed => Rendered::Text(build_detailed_markdown(result)),
        OutputFormat::Pdf => {
            Rendered::Binary(build_pdf(result).context("failed to render pdf report")?)
        }
    })
}
