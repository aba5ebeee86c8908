use crate::modes::{config_for, Mode, PinSize};
use crate::projection::PixelOffset;

/// Elliptical overlap test.
///
/// The ellipse has semi-axes `pin.width + padding` and `pin.height + padding`.
/// Points exactly on the boundary do not collide. A non-positive radius
/// (possible with negative padding) never collides.
pub fn collides(offset: PixelOffset, pin: PinSize, padding: f64) -> bool {
    let rx = pin.width + padding;
    let ry = pin.height + padding;
    if !(rx > 0.0 && ry > 0.0) {
        return false;
    }
    let nx = offset.dx / rx;
    let ny = offset.dy / ry;
    nx * nx + ny * ny < 1.0
}

/// [`collides`] using the geometry configured for `mode`.
pub fn collides_in_mode(offset: PixelOffset, mode: Mode) -> bool {
    let cfg = config_for(mode);
    collides(offset, cfg.pin, cfg.cluster_padding)
}
