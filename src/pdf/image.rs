//! Stamp image loading and embedding

use std::path::Path;

use lopdf::{dictionary, Document, ObjectId, Stream};

use crate::error::{Error, Result};

/// A decoded stamp raster, ready for embedding
///
/// Loaded once per run; the same embedded XObject is referenced by every
/// page.
#[derive(Debug, Clone)]
pub struct StampImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    /// 8-bit alpha plane, present only when the image has non-opaque pixels
    alpha: Option<Vec<u8>>,
}

impl StampImage {
    /// Load and decode a stamp image from disk
    ///
    /// The file's existence is checked explicitly so a missing stamp reports
    /// as `FileNotFound` rather than a decoder error. Zero-size rasters are
    /// rejected here, which keeps the geometry resolver free of division by
    /// zero.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();

        if width == 0 || height == 0 {
            return Err(Error::MalformedImage(path.to_path_buf()));
        }

        // widen before multiplying; u32 overflows above ~1 gigapixel
        let pixel_count = width as usize * height as usize;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in decoded.pixels() {
            rgb.push(pixel[0]);
            rgb.push(pixel[1]);
            rgb.push(pixel[2]);
            alpha.push(pixel[3]);
        }

        let alpha = if alpha.iter().any(|&a| a != u8::MAX) {
            Some(alpha)
        } else {
            None
        };

        Ok(StampImage {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// Natural width in pixels
    pub fn natural_width(&self) -> f64 {
        f64::from(self.width)
    }

    /// Natural height in pixels
    pub fn natural_height(&self) -> f64 {
        f64::from(self.height)
    }

    /// Embed the raster as an Image XObject in `doc`
    ///
    /// Images with transparency get a DeviceGray SMask stream alongside the
    /// DeviceRGB image stream. Returns the XObject's id for registration in
    /// page resources.
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(self.width),
            "Height" => i64::from(self.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };

        if let Some(alpha) = &self.alpha {
            let smask_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(self.width),
                    "Height" => i64::from(self.height),
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha.clone(),
            ));
            image_dict.set("SMask", smask_id);
        }

        doc.add_object(Stream::new(image_dict, self.rgb.clone()))
    }
}
