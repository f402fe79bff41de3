//! Error types for the pdf-stamp library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdf-stamp library
///
/// Every variant is fatal to the run: the tool produces either a complete
/// output document or none at all.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error (source open/parse, object graph access)
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error (covers output write failures)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Stamp image could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Stamp image decoded to a zero-size raster
    #[error("Malformed stamp image (zero dimension): {}", .0.display())]
    MalformedImage(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// A specific page could not be read
    #[error("Failed to read page {page} from source")]
    PageRead { page: u32 },
}
