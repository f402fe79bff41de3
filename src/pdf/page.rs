//! Per-page dimension lookup

use lopdf::{Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::geometry::PageDims;

/// Read a page's effective dimensions from its MediaBox
///
/// The MediaBox may live on the page dictionary itself or be inherited from
/// an ancestor Pages node, and the box array may be an indirect reference.
/// A page whose MediaBox cannot be resolved is a fatal error: placement is
/// meaningless without page dimensions.
pub fn page_dimensions(doc: &Document, page_id: ObjectId, page_num: u32) -> Result<PageDims> {
    let mut current = Some(page_id);

    while let Some(id) = current {
        let dict = doc
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|_| Error::PageRead { page: page_num })?;

        if let Some(dims) = media_box_dims(doc, dict) {
            return Ok(dims);
        }

        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Err(Error::PageRead { page: page_num })
}

fn media_box_dims(doc: &Document, dict: &lopdf::Dictionary) -> Option<PageDims> {
    let raw = dict.get(b"MediaBox").ok()?;
    let resolved = match raw {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let arr = resolved.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }

    let llx = as_f64(&arr[0])?;
    let lly = as_f64(&arr[1])?;
    let urx = as_f64(&arr[2])?;
    let ury = as_f64(&arr[3])?;

    Some(PageDims {
        width: urx - llx,
        height: ury - lly,
    })
}

fn as_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_media_box_on_page() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });

        let dims = page_dimensions(&doc, page_id, 1).unwrap();
        assert_eq!(dims.width, 612.0);
        assert_eq!(dims.height, 792.0);
    }

    #[test]
    fn test_media_box_inherited_from_parent() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(595.276), Object::Real(841.89)],
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });

        let dims = page_dimensions(&doc, page_id, 1).unwrap();
        assert!((dims.width - 595.276).abs() < 1e-3);
        assert!((dims.height - 841.89).abs() < 1e-3);
    }

    #[test]
    fn test_media_box_with_nonzero_origin() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![10.into(), 20.into(), 110.into(), 220.into()],
        });

        let dims = page_dimensions(&doc, page_id, 1).unwrap();
        assert_eq!(dims.width, 100.0);
        assert_eq!(dims.height, 200.0);
    }

    #[test]
    fn test_missing_media_box_is_fatal() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });

        let result = page_dimensions(&doc, page_id, 3);
        assert!(matches!(result, Err(Error::PageRead { page: 3 })));
    }
}
