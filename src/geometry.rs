//! Stamp placement geometry
//!
//! Pure calculations: millimeter/point conversion, aspect-ratio resolution of
//! the target stamp size, and the per-page keypad placement. Nothing in here
//! touches a document or an image file.

/// Width substituted when neither target dimension is given, in millimeters.
pub const DEFAULT_WIDTH_MM: f64 = 50.0;

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from points (1/72 inch)
    pub fn from_pt(pt: f64) -> Self {
        Length(pt * 25.4 / 72.0)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Stamp configuration, built once from the CLI and immutable for the run
///
/// `anchor` is kept as a raw code rather than a validated enum: codes outside
/// 1-9 fall back to the anchor-1 placement without a diagnostic, matching the
/// tool's historical behavior.
#[derive(Debug, Clone)]
pub struct StampSpec {
    /// Position code 1-9, phone-keypad layout
    pub anchor: i32,
    /// Horizontal margin applied by the left/right-aligned anchors
    pub offset_x: Length,
    /// Vertical margin applied by the top/bottom-aligned anchors
    pub offset_y: Length,
    /// Target stamp width; `None` means infer from height (or default)
    pub width: Option<Length>,
    /// Target stamp height; `None` means infer from width
    pub height: Option<Length>,
    /// Stamp opacity, 0 (invisible) to 1 (opaque)
    pub opacity: f64,
}

/// Page dimensions in points, read fresh per page
#[derive(Debug, Clone, Copy)]
pub struct PageDims {
    pub width: f64,
    pub height: f64,
}

/// Stamp size, offsets and scale in points, resolved once per run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStamp {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Per-page insertion point and scale, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Resolve the stamp's target size against the image's natural dimensions
///
/// When only one dimension is given the other is inferred from the image's
/// aspect ratio; when neither is given a 50 mm width is substituted. When
/// both are given they pass through unchanged, so a mismatched pair stretches
/// the image non-uniformly.
///
/// `natural_width`/`natural_height` are the raster's pixel dimensions and
/// must be nonzero (zero-size images are rejected at load time).
pub fn resolve(spec: &StampSpec, natural_width: f64, natural_height: f64) -> ResolvedStamp {
    let (width_mm, height_mm) = match (spec.width, spec.height) {
        (None, None) => {
            let w = DEFAULT_WIDTH_MM;
            (w, natural_height / natural_width * w)
        }
        (None, Some(h)) => (natural_width / natural_height * h.mm(), h.mm()),
        (Some(w), None) => (w.mm(), natural_height / natural_width * w.mm()),
        (Some(w), Some(h)) => (w.mm(), h.mm()),
    };

    let width = Length::from_mm(width_mm).pt();
    let height = Length::from_mm(height_mm).pt();

    ResolvedStamp {
        width,
        height,
        offset_x: spec.offset_x.pt(),
        offset_y: spec.offset_y.pt(),
        scale_x: width / natural_width,
        scale_y: height / natural_height,
    }
}

/// Compute the stamp's insertion point on one page
///
/// The anchor is a 3x3 phone-keypad grid. Coordinates are in points with the
/// origin at the bottom-left of the page, y increasing upward. No clamping is
/// applied: an oversized stamp or a large offset yields off-page coordinates
/// and the viewer clips them.
pub fn place(page: PageDims, resolved: &ResolvedStamp, anchor: i32) -> Placement {
    let mut x = resolved.offset_x;
    let mut y = resolved.offset_y;

    match anchor {
        2 => {
            x = (page.width - resolved.width) / 2.0;
        }
        3 => {
            x = page.width - resolved.width - resolved.offset_x;
        }
        4 => {
            y = (page.height - resolved.height) / 2.0;
        }
        5 => {
            x = (page.width - resolved.width) / 2.0;
            y = (page.height - resolved.height) / 2.0;
        }
        6 => {
            x = page.width - resolved.width - resolved.offset_x;
            y = (page.height - resolved.height) / 2.0;
        }
        7 => {
            y = page.height - resolved.height - resolved.offset_y;
        }
        8 => {
            x = (page.width - resolved.width) / 2.0;
            y = page.height - resolved.height - resolved.offset_y;
        }
        9 => {
            x = page.width - resolved.width - resolved.offset_x;
            y = page.height - resolved.height - resolved.offset_y;
        }
        // 1 and anything out of range: offsets from the bottom-left as-is
        _ => {}
    }

    Placement {
        x,
        y,
        scale_x: resolved.scale_x,
        scale_y: resolved.scale_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    fn spec_with(width: Option<f64>, height: Option<f64>) -> StampSpec {
        StampSpec {
            anchor: 1,
            offset_x: Length::from_mm(0.0),
            offset_y: Length::from_mm(0.0),
            width: width.map(Length::from_mm),
            height: height.map(Length::from_mm),
            opacity: 0.8,
        }
    }

    fn a4() -> PageDims {
        PageDims {
            width: Length::from_mm(210.0).pt(),
            height: Length::from_mm(297.0).pt(),
        }
    }

    #[test]
    fn test_length_conversions() {
        let len = Length::from_mm(25.4);
        assert!((len.pt() - 72.0).abs() < 0.01);
        assert!((Length::from_pt(72.0).mm() - 25.4).abs() < 0.01);
    }

    #[test]
    fn test_mm_pt_round_trip() {
        for mm in [0.1, 1.0, 10.0, 50.0, 210.0, 1234.5] {
            let back = Length::from_pt(Length::from_mm(mm).pt()).mm();
            assert!((back - mm).abs() < 1e-9, "round trip failed for {} mm", mm);
        }
    }

    #[test]
    fn test_default_width_when_both_unset() {
        let resolved = resolve(&spec_with(None, None), 200.0, 100.0);
        assert!((resolved.width - Length::from_mm(50.0).pt()).abs() < TOL);
        // Height follows the 2:1 aspect ratio
        assert!((resolved.height - Length::from_mm(25.0).pt()).abs() < TOL);
    }

    #[test]
    fn test_aspect_ratio_driven_by_height() {
        let resolved = resolve(&spec_with(None, Some(20.0)), 200.0, 100.0);
        assert!((resolved.width - Length::from_mm(40.0).pt()).abs() < TOL);
        assert!((resolved.height - Length::from_mm(20.0).pt()).abs() < TOL);
    }

    #[test]
    fn test_aspect_ratio_driven_by_width() {
        let resolved = resolve(&spec_with(Some(40.0), None), 200.0, 100.0);
        assert!((resolved.height - Length::from_mm(20.0).pt()).abs() < TOL);
    }

    #[test]
    fn test_both_set_passes_through_without_aspect_correction() {
        // 200x100 image forced into a square: distortion is allowed
        let resolved = resolve(&spec_with(Some(30.0), Some(30.0)), 200.0, 100.0);
        assert!((resolved.width - Length::from_mm(30.0).pt()).abs() < TOL);
        assert!((resolved.height - Length::from_mm(30.0).pt()).abs() < TOL);
        assert!((resolved.scale_x - resolved.width / 200.0).abs() < TOL);
        assert!((resolved.scale_y - resolved.height / 100.0).abs() < TOL);
    }

    #[test]
    fn test_resolver_is_deterministic() {
        let spec = spec_with(None, Some(20.0));
        let a = resolve(&spec, 200.0, 100.0);
        let b = resolve(&spec, 200.0, 100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_nine_anchors_on_a4() {
        let page = a4();
        let resolved = resolve(&spec_with(Some(50.0), Some(30.0)), 500.0, 300.0);
        let (pw, ph) = (page.width, page.height);
        let (sw, sh) = (resolved.width, resolved.height);

        let expected = [
            (1, 0.0, 0.0),
            (2, (pw - sw) / 2.0, 0.0),
            (3, pw - sw, 0.0),
            (4, 0.0, (ph - sh) / 2.0),
            (5, (pw - sw) / 2.0, (ph - sh) / 2.0),
            (6, pw - sw, (ph - sh) / 2.0),
            (7, 0.0, ph - sh),
            (8, (pw - sw) / 2.0, ph - sh),
            (9, pw - sw, ph - sh),
        ];

        for (anchor, ex, ey) in expected {
            let p = place(page, &resolved, anchor);
            assert!(
                (p.x - ex).abs() < TOL && (p.y - ey).abs() < TOL,
                "anchor {}: got ({}, {}), expected ({}, {})",
                anchor,
                p.x,
                p.y,
                ex,
                ey
            );
        }
    }

    #[test]
    fn test_anchor_one_is_independent_of_page_size() {
        let mut spec = spec_with(Some(50.0), Some(30.0));
        spec.offset_x = Length::from_mm(10.0);
        spec.offset_y = Length::from_mm(15.0);
        let resolved = resolve(&spec, 500.0, 300.0);

        let small = PageDims {
            width: 200.0,
            height: 200.0,
        };
        let p1 = place(a4(), &resolved, 1);
        let p2 = place(small, &resolved, 1);

        assert!((p1.x - Length::from_mm(10.0).pt()).abs() < TOL);
        assert!((p1.y - Length::from_mm(15.0).pt()).abs() < TOL);
        assert!((p1.x - p2.x).abs() < TOL);
        assert!((p1.y - p2.y).abs() < TOL);
    }

    #[test]
    fn test_out_of_range_anchor_falls_back_to_default() {
        let mut spec = spec_with(Some(50.0), Some(30.0));
        spec.offset_x = Length::from_mm(10.0);
        spec.offset_y = Length::from_mm(10.0);
        let resolved = resolve(&spec, 500.0, 300.0);
        let page = a4();

        let reference = place(page, &resolved, 1);
        for anchor in [0, 10, -3, 42] {
            let p = place(page, &resolved, anchor);
            assert_eq!(p, reference, "anchor {} should behave like anchor 1", anchor);
        }
    }

    #[test]
    fn test_oversized_stamp_goes_off_page_without_clamping() {
        let resolved = resolve(&spec_with(Some(300.0), Some(400.0)), 300.0, 400.0);
        let p = place(a4(), &resolved, 5);
        // Stamp larger than the page: centered placement goes negative
        assert!(p.x < 0.0);
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_offsets_ignored_on_centered_axes() {
        let mut spec = spec_with(Some(50.0), Some(30.0));
        spec.offset_x = Length::from_mm(25.0);
        spec.offset_y = Length::from_mm(25.0);
        let resolved = resolve(&spec, 500.0, 300.0);
        let page = a4();

        let p = place(page, &resolved, 5);
        assert!((p.x - (page.width - resolved.width) / 2.0).abs() < TOL);
        assert!((p.y - (page.height - resolved.height) / 2.0).abs() < TOL);
    }
}
