//! Stamp compositing across all pages of a document

use std::path::Path;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::geometry::{self, Length, PageDims, StampSpec};
use crate::pdf::image::StampImage;
use crate::pdf::page::page_dimensions;

/// Resource names our content streams refer to
const IMAGE_NAME: &str = "ImStamp";
const GSTATE_NAME: &str = "GStamp";

/// Options for a stamping run
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Placement, size and opacity of the stamp
    pub spec: StampSpec,
    /// Print diagnostic lines to stdout
    pub verbose: bool,
}

/// Overlay the stamp image onto every page of the source document
///
/// Single pass: the stamp is decoded and embedded once, the target size and
/// scale are resolved once, then each page gets its own placement computed
/// from that page's dimensions. Any failure aborts the run; no partial output
/// is written.
///
/// # Example
///
/// ```no_run
/// use pdf_stamp::geometry::{Length, StampSpec};
/// use pdf_stamp::pdf::{stamp_pdf, StampOptions};
/// use std::path::Path;
///
/// let options = StampOptions {
///     spec: StampSpec {
///         anchor: 9,
///         offset_x: Length::from_mm(10.0),
///         offset_y: Length::from_mm(10.0),
///         width: Some(Length::from_mm(40.0)),
///         height: None,
///         opacity: 0.8,
///     },
///     verbose: false,
/// };
///
/// stamp_pdf(
///     Path::new("source.pdf"),
///     Path::new("stamp.png"),
///     Path::new("output.pdf"),
///     &options,
/// ).expect("Failed to stamp");
/// ```
pub fn stamp_pdf(
    source: &Path,
    stamp: &Path,
    output: &Path,
    options: &StampOptions,
) -> Result<()> {
    debug_info(options, input_line(source));

    let image = StampImage::load(stamp)?;
    for line in stamp_size_lines(image.natural_width(), image.natural_height()) {
        debug_info(options, line);
    }

    if !source.exists() {
        return Err(Error::FileNotFound(source.to_path_buf()));
    }
    let mut doc = Document::load(source)?;

    // Page order from the page tree; BTreeMap iteration keeps it sorted
    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    if pages.is_empty() {
        return Err(Error::EmptyPdf(source.to_path_buf()));
    }

    let resolved = geometry::resolve(&options.spec, image.natural_width(), image.natural_height());

    // Shared by every page: the image XObject, the opacity graphics state,
    // and a one-operator stream that opens the isolation scope
    let image_id = image.embed(&mut doc);
    let gstate_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => options.spec.opacity as f32,
        "CA" => options.spec.opacity as f32,
    });
    let save_state_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

    for (page_num, page_id) in pages {
        let dims = page_dimensions(&doc, page_id, page_num)?;
        debug_info(options, page_size_line(page_num, dims));

        let placement = geometry::place(dims, &resolved, options.spec.anchor);

        add_stamp_resources(&mut doc, page_id, image_id, gstate_id)?;

        // The original content runs inside a q/Q pair: `q` prepended before
        // it, the matching `Q` leading our stream, so transformations left
        // behind by the page cannot skew the stamp
        let content = format!(
            "Q\nq\n/{} gs\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            GSTATE_NAME, resolved.width, resolved.height, placement.x, placement.y, IMAGE_NAME,
        );
        let stamp_content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        prepend_content_to_page(&mut doc, page_id, save_state_id)?;
        append_content_to_page(&mut doc, page_id, stamp_content_id)?;
    }

    doc.save(output)?;

    Ok(())
}

fn debug_info(options: &StampOptions, message: String) {
    if options.verbose {
        println!("{}", message);
    }
}

fn input_line(source: &Path) -> String {
    format!("Input PDF: {}", source.display())
}

fn stamp_size_lines(natural_width: f64, natural_height: f64) -> [String; 2] {
    [
        format!("Stamp Width  : {}", natural_width),
        format!("Stamp Height : {}", natural_height),
    ]
}

/// Page sizes are reported rounded to whole millimeters
fn page_size_line(page_num: u32, dims: PageDims) -> String {
    format!(
        "Page ({}) Width : {} [mm]   Height : {} [mm]",
        page_num,
        Length::from_pt(dims.width).mm().round(),
        Length::from_pt(dims.height).mm().round()
    )
}

/// Register the stamp XObject and opacity graphics state in a page's Resources
///
/// The Resources entry may be inline or an indirect reference shared between
/// pages; either way the page ends up with its own inline copy carrying our
/// additions, leaving other pages' view of the shared dictionary untouched.
fn add_stamp_resources(
    doc: &mut Document,
    page_id: ObjectId,
    image_id: ObjectId,
    gstate_id: ObjectId,
) -> Result<()> {
    let resources_dict = {
        let page_obj = doc.get_object(page_id)?;
        if let Object::Dictionary(page_dict) = page_obj {
            match page_dict.get(b"Resources") {
                Ok(Object::Dictionary(dict)) => dict.clone(),
                Ok(Object::Reference(res_id)) => {
                    if let Ok(Object::Dictionary(dict)) = doc.get_object(*res_id) {
                        dict.clone()
                    } else {
                        Dictionary::new()
                    }
                }
                _ => Dictionary::new(),
            }
        } else {
            Dictionary::new()
        }
    };

    let page_obj = doc.get_object_mut(page_id)?;

    if let Object::Dictionary(ref mut page_dict) = page_obj {
        let mut new_resources = resources_dict;

        let mut xobjects = if let Ok(Object::Dictionary(xo)) = new_resources.get(b"XObject") {
            xo.clone()
        } else {
            Dictionary::new()
        };
        xobjects.set(IMAGE_NAME, Object::Reference(image_id));
        new_resources.set("XObject", Object::Dictionary(xobjects));

        let mut gstates = if let Ok(Object::Dictionary(gs)) = new_resources.get(b"ExtGState") {
            gs.clone()
        } else {
            Dictionary::new()
        };
        gstates.set(GSTATE_NAME, Object::Reference(gstate_id));
        new_resources.set("ExtGState", Object::Dictionary(gstates));

        page_dict.set("Resources", Object::Dictionary(new_resources));
    }

    Ok(())
}

/// Prepend a content stream to a page's Contents
fn prepend_content_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    new_content_id: ObjectId,
) -> Result<()> {
    let page_obj = doc.get_object_mut(page_id)?;

    if let Object::Dictionary(ref mut page_dict) = page_obj {
        let existing_content = page_dict.get(b"Contents").ok().cloned();

        match existing_content {
            Some(Object::Reference(content_id)) => {
                let new_contents = vec![
                    Object::Reference(new_content_id),
                    Object::Reference(content_id),
                ];
                page_dict.set("Contents", Object::Array(new_contents));
            }
            Some(Object::Array(mut content_array)) => {
                content_array.insert(0, Object::Reference(new_content_id));
                page_dict.set("Contents", Object::Array(content_array));
            }
            _ => {
                page_dict.set("Contents", Object::Array(vec![Object::Reference(new_content_id)]));
            }
        }
    }

    Ok(())
}

/// Append a content stream to a page's Contents, so the stamp draws on top
fn append_content_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    new_content_id: ObjectId,
) -> Result<()> {
    let page_obj = doc.get_object_mut(page_id)?;

    if let Object::Dictionary(ref mut page_dict) = page_obj {
        let existing_content = page_dict.get(b"Contents").ok().cloned();

        match existing_content {
            Some(Object::Reference(content_id)) => {
                let new_contents = vec![
                    Object::Reference(content_id),
                    Object::Reference(new_content_id),
                ];
                page_dict.set("Contents", Object::Array(new_contents));
            }
            Some(Object::Array(mut content_array)) => {
                content_array.push(Object::Reference(new_content_id));
                page_dict.set("Contents", Object::Array(content_array));
            }
            _ => {
                page_dict.set("Contents", Object::Array(vec![Object::Reference(new_content_id)]));
            }
        }
    }

    Ok(())
}
