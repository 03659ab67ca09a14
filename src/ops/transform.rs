// ============================================================================
// PHOTO TRANSFORM — normalized placement state for the uploaded photo
// ============================================================================

/// Scale slider / wheel-zoom bounds.
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;

/// Wheel-zoom step per tick. Tuned by feel; configuration, not an invariant.
pub const WHEEL_ZOOM_STEP: f64 = 0.04;

/// Placement of the photo inside the digital frame.
///
/// Offsets are stored in digital-space pixels (387×516), never in any output
/// canvas's own pixel space. That one rule is what lets a single edit drive
/// the editor, the previews and every print sheet with identical framing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoTransform {
    pub scale_multiplier: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self {
            scale_multiplier: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl PhotoTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale multiplier, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn set_scale(&mut self, value: f64) {
        self.scale_multiplier = value.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Apply one wheel tick; positive `direction` zooms in.
    pub fn zoom_step(&mut self, direction: f64) {
        let step = if direction > 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            -WHEEL_ZOOM_STEP
        };
        self.set_scale(self.scale_multiplier + step);
    }

    /// Accumulate a drag given in display pixels. `to_digital_x` / `to_digital_y`
    /// are the display→digital conversion factors (`DIGITAL_W / display_w`,
    /// `DIGITAL_H / display_h`). Offsets are not clamped: the user may pan the
    /// photo fully out of frame.
    pub fn apply_drag(&mut self, dx_px: f64, dy_px: f64, to_digital_x: f64, to_digital_y: f64) {
        self.offset_x += dx_px * to_digital_x;
        self.offset_y += dy_px * to_digital_y;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_clamps_to_bounds_exactly() {
        let mut t = PhotoTransform::new();
        t.set_scale(0.2);
        assert_eq!(t.scale_multiplier, MIN_SCALE);
        t.set_scale(7.5);
        assert_eq!(t.scale_multiplier, MAX_SCALE);
        t.set_scale(1.25);
        assert_eq!(t.scale_multiplier, 1.25);
    }

    #[test]
    fn zoom_steps_accumulate_and_saturate() {
        let mut t = PhotoTransform::new();
        t.zoom_step(1.0);
        assert!((t.scale_multiplier - 1.04).abs() < 1e-12);
        for _ in 0..200 {
            t.zoom_step(-1.0);
        }
        assert_eq!(t.scale_multiplier, MIN_SCALE);
    }

    #[test]
    fn drag_is_unbounded_and_scaled_into_digital_space() {
        let mut t = PhotoTransform::new();
        // Display canvas twice the digital size: factors are 0.5.
        t.apply_drag(10.0, -6.0, 0.5, 0.5);
        assert_eq!(t.offset_x, 5.0);
        assert_eq!(t.offset_y, -3.0);
        // Pan far off-frame; nothing clamps.
        t.apply_drag(-100_000.0, 0.0, 0.5, 0.5);
        assert_eq!(t.offset_x, -49_995.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut t = PhotoTransform::new();
        t.set_scale(2.0);
        t.apply_drag(5.0, 5.0, 1.0, 1.0);
        t.reset();
        assert_eq!(t, PhotoTransform::default());
    }
}
