//! PDF manipulation module

pub mod image;
pub mod page;
pub mod stamp;

// Re-export commonly used items
pub use image::StampImage;
pub use page::page_dimensions;
pub use stamp::{stamp_pdf, StampOptions};
