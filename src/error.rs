use thiserror::Error;

/// Failures while turning Typst markup into a PDF.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
