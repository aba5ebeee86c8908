//! Screen-space projection of geographic offsets.
//!
//! Uses a local flat-earth approximation: degrees map linearly to pixels
//! across the visible span. Good enough for city-scale viewports, wrong for
//! anything spanning more than a few tens of kilometers. Not a geodesic
//! distance.

use serde::{Deserialize, Serialize};

use crate::models::{Point, ScreenSize, ViewportRegion};

/// Absolute on-screen separation of two points, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PixelOffset {
    pub fn length(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// Degrees of arc covered by one screen pixel, `(x, y)`.
///
/// `None` when the viewport or the screen is degenerate (zero, negative or
/// non-finite), so no division by zero can leak NaN or infinity downstream.
pub fn degrees_per_pixel(region: ViewportRegion, screen: ScreenSize) -> Option<(f64, f64)> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(region.latitude_delta)
        || !valid(region.longitude_delta)
        || !valid(screen.width)
        || !valid(screen.height)
    {
        return None;
    }
    Some((
        region.longitude_delta / screen.width,
        region.latitude_delta / screen.height,
    ))
}

/// Pixel offset between two coordinates under the given viewport.
pub fn offset_coords(
    a: (f64, f64),
    b: (f64, f64),
    region: ViewportRegion,
    screen: ScreenSize,
) -> Option<PixelOffset> {
    let (deg_per_px_x, deg_per_px_y) = degrees_per_pixel(region, screen)?;
    let (lat_a, lng_a) = a;
    let (lat_b, lng_b) = b;
    let dx = (lng_a - lng_b).abs() / deg_per_px_x;
    let dy = (lat_a - lat_b).abs() / deg_per_px_y;
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    Some(PixelOffset { dx, dy })
}

/// Pixel offset between two points. `None` means no collision is possible.
pub fn offset(
    a: &Point,
    b: &Point,
    region: ViewportRegion,
    screen: ScreenSize,
) -> Option<PixelOffset> {
    offset_coords(
        (a.latitude, a.longitude),
        (b.latitude, b.longitude),
        region,
        screen,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> Point {
        Point::new("p", lat, lng, 0)
    }

    fn square_screen() -> ScreenSize {
        ScreenSize::new(1000.0, 1000.0)
    }

    #[test]
    fn test_horizontal_offset() {
        let a = point(40.0, -74.0);
        let b = point(40.0, -74.0001);
        let off = offset(&a, &b, ViewportRegion::span(0.01, 0.01), square_screen()).unwrap();
        assert!((off.dx - 10.0).abs() < 1e-6);
        assert!(off.dy.abs() < 1e-9);
    }

    #[test]
    fn test_vertical_offset_uses_screen_height() {
        let a = point(40.0, -74.0);
        let b = point(40.001, -74.0);
        let screen = ScreenSize::new(390.0, 844.0);
        let off = offset(&a, &b, ViewportRegion::span(0.01, 0.01), screen).unwrap();
        assert!((off.dy - 84.4).abs() < 1e-6);
        assert!(off.dx.abs() < 1e-9);
    }

    #[test]
    fn test_offset_is_symmetric() {
        let a = point(51.5, -0.12);
        let b = point(51.501, -0.121);
        let region = ViewportRegion::span(0.02, 0.03);
        let ab = offset(&a, &b, region, square_screen()).unwrap();
        let ba = offset(&b, &a, region, square_screen()).unwrap();
        assert!((ab.dx - ba.dx).abs() < 1e-9);
        assert!((ab.dy - ba.dy).abs() < 1e-9);
    }

    #[test]
    fn test_zooming_in_grows_offset() {
        let a = point(40.0, -74.0);
        let b = point(40.0, -74.0001);
        let wide = offset(&a, &b, ViewportRegion::span(0.01, 0.01), square_screen()).unwrap();
        let close = offset(&a, &b, ViewportRegion::span(0.001, 0.001), square_screen()).unwrap();
        assert!((close.dx / wide.dx - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_delta_is_rejected() {
        let a = point(40.0, -74.0);
        let b = point(40.0, -74.0);
        assert!(offset(&a, &b, ViewportRegion::span(0.0, 0.01), square_screen()).is_none());
        assert!(offset(&a, &b, ViewportRegion::span(0.01, 0.0), square_screen()).is_none());
    }

    #[test]
    fn test_negative_and_nan_delta_is_rejected() {
        let a = point(40.0, -74.0);
        let b = point(40.0, -74.0001);
        assert!(offset(&a, &b, ViewportRegion::span(-0.01, 0.01), square_screen()).is_none());
        assert!(offset(&a, &b, ViewportRegion::span(f64::NAN, 0.01), square_screen()).is_none());
    }

    #[test]
    fn test_degenerate_screen_is_rejected() {
        let region = ViewportRegion::span(0.01, 0.01);
        assert!(degrees_per_pixel(region, ScreenSize::new(0.0, 800.0)).is_none());
        assert!(degrees_per_pixel(region, ScreenSize::new(400.0, -1.0)).is_none());
    }

    #[test]
    fn test_pixel_offset_length() {
        let off = PixelOffset { dx: 3.0, dy: 4.0 };
        assert!((off.length() - 5.0).abs() < 1e-9);
    }
}
