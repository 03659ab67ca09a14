// ============================================================================
// COMPOSITOR — draws the ID-photo composition into any RGBA target
// ============================================================================

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::ops::transform::PhotoTransform;

/// Fixed pixel size of the digital composite (3:4 ID-photo aspect). Photo
/// offsets are defined in this coordinate space, so the same transform frames
/// identically at every output resolution. Print DPI never changes these.
pub const DIGITAL_W: u32 = 387;
pub const DIGITAL_H: u32 = 516;

/// Photo ghosting alpha used by the editor views while a photo is loaded, so
/// the reference underneath stays visible through it.
pub const EDITOR_OVERLAY_ALPHA: f32 = 0.5;

/// Which reference overlay to draw under the photo. Overlays are visual aids
/// only; they never participate in layout math.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceMode {
    #[default]
    None,
    Base,
    Guide,
    Both,
}

/// Per-call compositor options.
#[derive(Clone, Copy, Debug)]
pub struct ComposeOptions {
    /// Alpha multiplier applied to the photo (1.0 everywhere but the editor).
    pub image_alpha: f32,
    pub reference_mode: ReferenceMode,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            image_alpha: 1.0,
            reference_mode: ReferenceMode::None,
        }
    }
}

/// Borrowed view of everything the compositor reads.
pub struct ComposeInputs<'a> {
    pub source: Option<&'a RgbaImage>,
    pub reference_base: Option<&'a RgbaImage>,
    pub reference_guide: Option<&'a RgbaImage>,
    pub transform: &'a PhotoTransform,
}

/// Render the composition into `target` at whatever size it has. Pure
/// function of its inputs: identical state produces identical pixels.
///
/// Order: white background, optional reference overlays stretched to the full
/// target, then the photo cover-fit + scaled + offset. The digital→target
/// offset factors are computed here and nowhere else.
pub fn render_composite(target: &mut RgbaImage, inputs: &ComposeInputs, opts: &ComposeOptions) {
    let canvas_w = target.width() as f64;
    let canvas_h = target.height() as f64;

    fill_white(target);

    if matches!(opts.reference_mode, ReferenceMode::Base | ReferenceMode::Both)
        && let Some(overlay) = inputs.reference_base
    {
        blit_scaled(target, overlay, 0.0, 0.0, canvas_w, canvas_h, 1.0);
    }
    if matches!(opts.reference_mode, ReferenceMode::Guide | ReferenceMode::Both)
        && let Some(overlay) = inputs.reference_guide
    {
        blit_scaled(target, overlay, 0.0, 0.0, canvas_w, canvas_h, 1.0);
    }

    if let Some(photo) = inputs.source {
        let base_scale = cover_scale(
            canvas_w,
            canvas_h,
            photo.width() as f64,
            photo.height() as f64,
        );
        let draw_scale = base_scale * inputs.transform.scale_multiplier;
        let draw_w = photo.width() as f64 * draw_scale;
        let draw_h = photo.height() as f64 * draw_scale;

        // Offsets are stored in digital space; these named factors convert
        // them into this target's pixel space.
        let offset_scale_x = canvas_w / DIGITAL_W as f64;
        let offset_scale_y = canvas_h / DIGITAL_H as f64;

        let dx = (canvas_w - draw_w) / 2.0 + inputs.transform.offset_x * offset_scale_x;
        let dy = (canvas_h - draw_h) / 2.0 + inputs.transform.offset_y * offset_scale_y;

        blit_scaled(target, photo, dx, dy, draw_w, draw_h, opts.image_alpha);
    }
}

/// Cover-fit scale: the photo fully covers the frame, cropping overflow,
/// never letterboxing.
pub fn cover_scale(canvas_w: f64, canvas_h: f64, image_w: f64, image_h: f64) -> f64 {
    (canvas_w / image_w).max(canvas_h / image_h)
}

/// Opaque white fill. Keeps exports JPEG-safe: no transparent edges leak into
/// formats without an alpha channel.
pub fn fill_white(target: &mut RgbaImage) {
    for px in target.pixels_mut() {
        *px = Rgba([255, 255, 255, 255]);
    }
}

/// Draw `src` scaled into the rectangle `(dx, dy, dw, dh)` of `target`, with
/// `alpha` multiplied into the source alpha and source-over blending.
///
/// Placement is sub-pixel: each covered target pixel samples the source
/// bilinearly at its mapped position, so the same transform lands on the same
/// image content at every target resolution. Rows are processed in parallel.
pub fn blit_scaled(
    target: &mut RgbaImage,
    src: &RgbaImage,
    dx: f64,
    dy: f64,
    dw: f64,
    dh: f64,
    alpha: f32,
) {
    if dw <= 0.0 || dh <= 0.0 || alpha <= 0.0 || src.width() == 0 || src.height() == 0 {
        return;
    }
    let target_w = target.width() as i64;
    let target_h = target.height() as i64;

    // Target span actually covered by the draw rectangle.
    let x0 = (dx.floor() as i64).max(0);
    let y0 = (dy.floor() as i64).max(0);
    let x1 = ((dx + dw).ceil() as i64).min(target_w);
    let y1 = ((dy + dh).ceil() as i64).min(target_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_w = src.width() as f64;
    let src_h = src.height() as f64;
    let stride = target_w as usize * 4;
    let buf: &mut [u8] = &mut **target;

    buf[y0 as usize * stride..y1 as usize * stride]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(i, row)| {
            let ty = y0 + i as i64;
            // Map the pixel center back into source coordinates.
            let sy = ((ty as f64 + 0.5) - dy) / dh * src_h - 0.5;
            for tx in x0..x1 {
                let sx = ((tx as f64 + 0.5) - dx) / dw * src_w - 0.5;
                let sample = sample_bilinear(src, sx, sy);
                let at = tx as usize * 4;
                blend_over(&mut row[at..at + 4], sample, alpha);
            }
        });
}

/// Bilinear sample with edge clamping. Returns straight-alpha RGBA in 0–255.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> [f32; 4] {
    let w = src.width() as i64;
    let h = src.height() as i64;
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let clamp = |v: i64, hi: i64| v.clamp(0, hi - 1) as u32;
    let p00 = src.get_pixel(clamp(x0, w), clamp(y0, h)).0;
    let p10 = src.get_pixel(clamp(x0 + 1, w), clamp(y0, h)).0;
    let p01 = src.get_pixel(clamp(x0, w), clamp(y0 + 1, h)).0;
    let p11 = src.get_pixel(clamp(x0 + 1, w), clamp(y0 + 1, h)).0;

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        out[c] = top * (1.0 - fy) + bottom * fy;
    }
    out
}

/// Source-over blend onto an opaque destination pixel. Every compositor
/// target starts from an opaque white fill, so the result stays opaque.
#[inline]
fn blend_over(dst: &mut [u8], src: [f32; 4], alpha: f32) {
    let sa = (src[3] / 255.0) * alpha;
    if sa <= 0.0 {
        return;
    }
    let inv = 1.0 - sa;
    dst[0] = (src[0] * sa + dst[0] as f32 * inv).round() as u8;
    dst[1] = (src[1] * sa + dst[1] as f32 * inv).round() as u8;
    dst[2] = (src[2] * sa + dst[2] as f32 * inv).round() as u8;
    dst[3] = 255;
}
