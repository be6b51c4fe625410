//! A4 PDF rendering of the detailed report.
//!
//! The layout follows [`build_detailed_markdown`](crate::build_detailed_markdown):
//! summary table, top-risks table, then one section per clause. Text uses
//! the standard Helvetica and Courier fonts with `WinAnsiEncoding`, so
//! characters outside that code page are written as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use thiserror::Error;

use clause_risk::{AnalysisResult, ClauseReport};

use crate::{non_empty, prefix, risk_label, ALT_CLAUSE_PREVIEW_CHARS, BODY_PREVIEW_CHARS, UNTITLED};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_LEFT: f32 = 40.0;
const MARGIN_RIGHT: f32 = 40.0;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 40.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

const SUMMARY_COLUMNS: [f32; 2] = [150.0, 250.0];
const TOP_RISK_COLUMNS: [f32; 3] = [180.0, 60.0, 200.0];
const CELL_PADDING: f32 = 6.0;

/// Errors that can occur while writing a PDF report.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to build pdf: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write pdf: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Mono];

    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Mono => "Courier",
        }
    }

    /// Average glyph advance as a fraction of the font size.
    fn advance(self) -> f32 {
        match self {
            Font::Regular => 0.5,
            Font::Bold => 0.55,
            Font::Mono => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Style {
    font: Font,
    size: f32,
}

impl Style {
    fn leading(self) -> f32 {
        self.size * 1.4
    }

    /// Characters that fit in `width` points.
    fn fit(self, width: f32) -> usize {
        ((width / (self.size * self.font.advance())).floor() as usize).max(1)
    }
}

const TITLE: Style = Style {
    font: Font::Bold,
    size: 18.0,
};
const SECTION: Style = Style {
    font: Font::Bold,
    size: 14.0,
};
const HEADING: Style = Style {
    font: Font::Bold,
    size: 12.0,
};
const BODY: Style = Style {
    font: Font::Regular,
    size: 10.0,
};
const LABEL: Style = Style {
    font: Font::Bold,
    size: 10.0,
};
const MONO: Style = Style {
    font: Font::Mono,
    size: 9.0,
};

/// Render `result` as a PDF document.
pub fn build_pdf(result: &AnalysisResult) -> Result<Vec<u8>, PdfError> {
    let mut layout = Layout::new();
    layout.report(result);
    write_document(layout.finish())
}

fn write_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Contract Analysis Report"),
        "Producer" => Object::string_literal("clause-risk"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Top-down text placement with page breaks.
struct Layout {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    fn report(&mut self, result: &AnalysisResult) {
        self.text("Contract Analysis Report", TITLE);
        self.gap(8.0);

        self.text("Summary", SECTION);
        self.table(
            &SUMMARY_COLUMNS,
            &["Field", "Value"],
            &[
                vec!["Overall Score".to_string(), format!("{} / 10", result.overall_score)],
                vec!["Risk Bucket".to_string(), result.bucket.to_string()],
                vec!["Duration".to_string(), format!("{} ms", result.duration_ms)],
            ],
        );
        self.gap(16.0);

        if !result.top_risks.is_empty() {
            self.text("Top Risks", SECTION);
            let rows: Vec<Vec<String>> = result
                .top_risks
                .iter()
                .map(|risk| vec![risk.title.clone(), risk.score.to_string(), risk.reason.clone()])
                .collect();
            self.table(&TOP_RISK_COLUMNS, &["Clause Title", "Score", "Reason"], &rows);
            self.gap(16.0);
        }

        if !result.clauses.is_empty() {
            self.text("Clauses", SECTION);
            self.gap(8.0);
            for report in &result.clauses {
                self.clause(report);
                self.gap(14.0);
            }
        }
    }

    fn clause(&mut self, report: &ClauseReport) {
        let clause = &report.clause;
        let title = if clause.title.is_empty() {
            UNTITLED
        } else {
            clause.title.as_str()
        };
        self.text(
            &format!("{} — {} ({}/10)", title, risk_label(clause.risk), clause.risk),
            HEADING,
        );

        let body = prefix(&clause.text, BODY_PREVIEW_CHARS);
        self.text(if body.is_empty() { "-" } else { body }, BODY);
        self.gap(4.0);

        if let Some(hits) = clause.joined_hits() {
            self.text(&format!("Rule hits: {}", hits), BODY);
        }
        if !report.entities.is_empty() {
            self.text(&format!("Entities: {}", report.entities.join(", ")), BODY);
        }

        let note = match &report.llm {
            Some(note) => note,
            None => return,
        };
        if !note.explanation.is_empty() {
            self.text("Explanation:", LABEL);
            self.text(&note.explanation, BODY);
        }
        if let Some(issue) = non_empty(&note.issue) {
            self.text("Issue:", LABEL);
            self.text(issue, BODY);
        }
        if let Some(alt) = non_empty(&note.alt_clause) {
            self.text("Suggested Alternative:", LABEL);
            self.text(prefix(alt, ALT_CLAUSE_PREVIEW_CHARS), MONO);
        }
    }

    /// Wrapped paragraph text across the full text width.
    fn text(&mut self, text: &str, style: Style) {
        for line in wrap(text, style.fit(TEXT_WIDTH)) {
            self.advance(style.leading());
            if !line.is_empty() {
                self.show(MARGIN_LEFT, &line, style);
            }
        }
    }

    /// One line per row, cells clipped to their column.
    fn table(&mut self, columns: &[f32], header: &[&str], rows: &[Vec<String>]) {
        let table_width: f32 = columns.iter().sum();

        self.advance(LABEL.leading());
        self.cells(columns, header.iter().copied(), LABEL);
        self.rule(table_width);

        for row in rows {
            self.advance(BODY.leading());
            self.cells(columns, row.iter().map(String::as_str), BODY);
        }
        self.rule(table_width);
    }

    fn cells<'a>(&mut self, columns: &[f32], cells: impl Iterator<Item = &'a str>, style: Style) {
        let mut x = MARGIN_LEFT;
        for (cell, width) in cells.zip(columns) {
            let fit = style.fit(width - CELL_PADDING);
            self.show(x, &clip(cell, fit), style);
            x += width;
        }
    }

    /// Horizontal line just below the current baseline.
    fn rule(&mut self, width: f32) {
        let y = self.y - 3.0;
        self.ops.extend([
            Operation::new("w", vec![0.5f32.into()]),
            Operation::new("m", vec![MARGIN_LEFT.into(), y.into()]),
            Operation::new("l", vec![(MARGIN_LEFT + width).into(), y.into()]),
            Operation::new("S", vec![]),
        ]);
    }

    fn show(&mut self, x: f32, text: &str, style: Style) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![style.font.resource().into(), style.size.into()]),
            Operation::new("Td", vec![x.into(), self.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Move the baseline down by `height`, starting a new page if the line
    /// would cross the bottom margin.
    fn advance(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM {
            self.break_page();
        }
        self.y -= height;
    }

    fn gap(&mut self, height: f32) {
        self.y = (self.y - height).max(MARGIN_BOTTOM);
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN_TOP;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }
}

/// Greedy word wrap to `width` characters. Explicit newlines are kept as
/// line breaks and overlong words are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_chars = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if line_chars > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_chars = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if line_chars > 0 && line_chars + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            if line_chars > 0 {
                line.push(' ');
                line_chars += 1;
            }
            line_chars += word.len();
            line.extend(word);
        }
        lines.push(line);
    }
    lines
}

fn clip(text: &str, width: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= width {
        return text;
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// Encode `text` for a `WinAnsiEncoding` font.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
