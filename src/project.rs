// ============================================================================
// SESSION — all mutable state for one photo composition
// ============================================================================

use image::RgbaImage;

use crate::ops::compose::{
    self, ComposeInputs, ComposeOptions, DIGITAL_H, DIGITAL_W, EDITOR_OVERLAY_ALPHA, ReferenceMode,
};
use crate::ops::sheet::{self, SheetLayoutInfo, SheetSpec};
use crate::ops::transform::PhotoTransform;

/// Decoded source photo. Replaced wholesale on upload, never edited in place.
pub struct SourceImage {
    pub pixels: RgbaImage,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Everything the renderers read. Owned by the GUI app (one per process) or
/// built per input file in CLI mode; there are no ambient globals.
pub struct Session {
    pub source: Option<SourceImage>,
    pub reference_base: Option<RgbaImage>,
    pub reference_guide: Option<RgbaImage>,
    pub transform: PhotoTransform,
    pub dpi: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            source: None,
            reference_base: None,
            reference_guide: None,
            transform: PhotoTransform::new(),
            dpi: sheet::DEFAULT_DPI,
        }
    }

    /// Exports and editor interaction are gated on this.
    pub fn has_photo(&self) -> bool {
        self.source.is_some()
    }

    /// Install a freshly decoded photo and reset the placement.
    pub fn set_photo(&mut self, pixels: RgbaImage) {
        self.source = Some(SourceImage { pixels });
        self.transform.reset();
    }

    pub fn set_dpi(&mut self, dpi: u32) {
        self.dpi = sheet::clamp_dpi(Some(dpi));
    }

    fn compose_inputs(&self) -> ComposeInputs<'_> {
        ComposeInputs {
            source: self.source.as_ref().map(|s| &s.pixels),
            reference_base: self.reference_base.as_ref(),
            reference_guide: self.reference_guide.as_ref(),
            transform: &self.transform,
        }
    }

    /// Render the composition into an arbitrary target.
    pub fn render_into(&self, target: &mut RgbaImage, opts: &ComposeOptions) {
        compose::render_composite(target, &self.compose_inputs(), opts);
    }

    /// The digital composite: always exactly 387×516, no overlay, full alpha.
    pub fn render_digital(&self) -> RgbaImage {
        let mut out = RgbaImage::new(DIGITAL_W, DIGITAL_H);
        self.render_into(&mut out, &ComposeOptions::default());
        out
    }

    /// One editor view at digital resolution: the requested overlay
    /// underneath, photo ghosted while one is loaded so the reference stays
    /// visible through it.
    pub fn render_editor(&self, mode: ReferenceMode) -> RgbaImage {
        let mut out = RgbaImage::new(DIGITAL_W, DIGITAL_H);
        let alpha = if self.has_photo() {
            EDITOR_OVERLAY_ALPHA
        } else {
            1.0
        };
        self.render_into(
            &mut out,
            &ComposeOptions {
                image_alpha: alpha,
                reference_mode: mode,
            },
        );
        out
    }

    /// One print sheet at the session DPI. Re-renders the digital composite
    /// first so stamped cells always reflect current state.
    pub fn render_sheet(&self, spec: &SheetSpec) -> (RgbaImage, SheetLayoutInfo) {
        let digital = self.render_digital();
        sheet::render_sheet(&digital, spec, self.dpi)
    }
}
