use lopdf::Document;
use tracing::debug;

use crate::errors::IngestError;

/// Separator inserted between PDF pages.
pub const PAGE_MARK: &str = "\n\n===PAGE===\n\n";

/// Text of the first `max_pages` pages. Pages without a text layer
/// contribute empty strings.
pub(crate) fn pdf_text(raw: &[u8], max_pages: usize) -> Result<String, IngestError> {
    let doc = Document::load_mem(raw)?;
    let pages = doc.get_pages();
    debug!(pages = pages.len(), max_pages, "loaded pdf");

    let texts = pages
        .keys()
        .take(max_pages)
        .map(|page_number| doc.extract_text(&[*page_number]).unwrap_or_default())
        .collect::<Vec<_>>();

    Ok(join_pages(&texts))
}

/// Interleave [`PAGE_MARK`] between pages, join the pieces with a newline
/// and trim the result.
pub(crate) fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut pieces: Vec<&str> = Vec::with_capacity(pages.len() * 2);
    for (idx, page) in pages.iter().enumerate() {
        if idx > 0 {
            pieces.push(PAGE_MARK);
        }
        pieces.push(page.as_ref());
    }
    pieces.join("\n").trim().to_string()
}
