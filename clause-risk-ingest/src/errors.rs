use thiserror::Error;

/// Failure to read a document container. Never leaves this crate: the
/// public entry points log it and fall back to empty text.
#[derive(Debug, Error)]
pub(crate) enum IngestError {
    #[error("invalid pdf: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("invalid docx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid docx markup: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("could not read docx part: {0}")]
    Io(#[from] std::io::Error),
}
