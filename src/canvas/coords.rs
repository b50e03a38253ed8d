//! Conversions between the three coordinate spaces of the sample view:
//! display pixels (what the operator sees), native image pixels (the full
//! resolution camera frame) and physical stage millimetres.

/// Pixels-per-millimetre conversion factors supplied by the instrument,
/// one per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelsPerMm {
    pub x: f64,
    pub y: f64,
}

impl PixelsPerMm {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ratio of native image width to displayed width. Recomputed whenever the
/// viewport width changes; always `native_width / display_width` as of the
/// last resize.
pub fn image_ratio(native_width: f64, display_width: f64) -> f64 {
    native_width / display_width
}

/// Display pixels to native image pixels.
///
/// Finite inputs are assumed; NaN and infinity propagate unchecked.
pub fn to_image_space(screen: (f64, f64), ratio: f64) -> (f64, f64) {
    (screen.0 * ratio, screen.1 * ratio)
}

/// Native image pixels to physical stage millimetres.
pub fn to_physical_space(image: (f64, f64), ppm: PixelsPerMm) -> (f64, f64) {
    (image.0 / ppm.x, image.1 / ppm.y)
}

/// Native image pixels to display pixels. Inverse of [`to_image_space`],
/// used when laying shapes out on the drawable surface.
pub fn to_display_space(image: (f64, f64), ratio: f64) -> (f64, f64) {
    (image.0 / ratio, image.1 / ratio)
}

/// Full display-to-physical composition used by the click handlers.
pub fn screen_to_physical(screen: (f64, f64), ratio: f64, ppm: PixelsPerMm) -> (f64, f64) {
    to_physical_space(to_image_space(screen, ratio), ppm)
}
