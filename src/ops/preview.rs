// ============================================================================
// PREVIEW SCALER — contain-fit a full-resolution render into a display canvas
// ============================================================================

use image::RgbaImage;

use crate::ops::compose::{blit_scaled, fill_white};

/// Scale `source` uniformly to fit inside `target` (contain-fit), centered on
/// a white background. Stateless; used for every on-screen preview.
pub fn fit_to_preview(target: &mut RgbaImage, source: &RgbaImage) {
    fill_white(target);
    if source.width() == 0 || source.height() == 0 {
        return;
    }

    let tw = target.width() as f64;
    let th = target.height() as f64;
    let scale = (tw / source.width() as f64).min(th / source.height() as f64);
    let dw = source.width() as f64 * scale;
    let dh = source.height() as f64 * scale;

    blit_scaled(
        target,
        source,
        (tw - dw) / 2.0,
        (th - dh) / 2.0,
        dw,
        dh,
        1.0,
    );
}
