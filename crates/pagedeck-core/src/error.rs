use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagedeckError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Document is encrypted")]
    Encrypted,

    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("Cannot delete the last remaining page")]
    LastPage,

    #[error("Move source and target are the same page")]
    NoOpMove,

    #[error("PDF operation failed: {0}")]
    OperationError(String),
}
