//! PDF Stamp Library
//!
//! Overlays a raster image ("stamp") onto every page of a PDF at a
//! keypad-style anchor position. This library provides functionality to:
//! - Resolve the stamp's target size from millimeter inputs, preserving the
//!   aspect ratio when only one dimension is given
//! - Compute per-page placements for the 9 anchor positions
//! - Embed the image and composite it onto each page with a chosen opacity
//!
//! # Example
//!
//! ```no_run
//! use pdf_stamp::geometry::{Length, StampSpec};
//! use pdf_stamp::pdf::{stamp_pdf, StampOptions};
//! use std::path::Path;
//!
//! let options = StampOptions {
//!     spec: StampSpec {
//!         anchor: 9,
//!         offset_x: Length::from_mm(10.0),
//!         offset_y: Length::from_mm(10.0),
//!         width: Some(Length::from_mm(40.0)),
//!         height: None,
//!         opacity: 0.8,
//!     },
//!     verbose: false,
//! };
//!
//! stamp_pdf(
//!     Path::new("source.pdf"),
//!     Path::new("logo.png"),
//!     Path::new("stamped.pdf"),
//!     &options,
//! ).expect("Failed to stamp PDF");
//! ```

pub mod error;
pub mod geometry;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
