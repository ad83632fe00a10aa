//! Conversion between physical millimetres and renderer device units.
//!
//! Device units are PostScript points (1/72 inch), the unit PDF canvases use.

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Converts millimetres to points.
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

/// Converts points to millimetres.
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_INCH * MM_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_inch_is_72_points() {
        assert_eq!(mm_to_pt(25.4), 72.0);
        assert_eq!(pt_to_mm(72.0), 25.4);
    }

    #[test]
    fn a4_height_matches_pdf_page_box() {
        assert!((mm_to_pt(297.0) - 841.889_763_779_527_7).abs() < 1e-9);
        assert!((mm_to_pt(210.0) - 595.275_590_551_181_2).abs() < 1e-9);
    }

    #[test]
    fn conversion_round_trips_within_float_error() {
        for mm in [0.0, 3.0, 5.0, 25.0, 50.8, 65.0] {
            assert!((pt_to_mm(mm_to_pt(mm)) - mm).abs() < 1e-9);
        }
    }
}
