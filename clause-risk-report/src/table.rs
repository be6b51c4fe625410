use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

/// A pipe table whose columns are padded to their display width.
pub(crate) struct MarkdownTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(|header| cell(&header.into())).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(|value| cell(&value.into())).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    fn widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().map(|row| &row[col]))
                    .map(|value| UnicodeWidthStr::width(value.as_str()))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect()
    }
}

/// Cell text on a single line with pipes escaped.
fn cell(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    f.write_char('|')?;
    for (value, width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(UnicodeWidthStr::width(value.as_str()));
        write!(f, " {}{} |", value, " ".repeat(padding))?;
    }
    f.write_char('\n')
}

impl fmt::Display for MarkdownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_row(f, &self.headers, &widths)?;

        f.write_char('|')?;
        for width in &widths {
            write!(f, " {} |", "-".repeat(*width))?;
        }
        f.write_char('\n')?;

        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}
