// ============================================================================
// EDITOR CANVAS — one interactive view of the composition
// ============================================================================

use eframe::egui;
use egui::{Color32, ColorImage, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;

use crate::ops::compose::{DIGITAL_H, DIGITAL_W};
use crate::ops::transform::PhotoTransform;

/// Widest an editor view gets on screen; the height follows the digital
/// frame's aspect ratio.
const MAX_VIEW_WIDTH: f32 = 340.0;

/// One draggable/zoomable view of the composited photo. The app owns two of
/// these (base reference and guide reference); both mutate the same shared
/// `PhotoTransform`.
pub struct EditorCanvas {
    label: &'static str,
    texture: Option<TextureHandle>,
}

impl EditorCanvas {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            texture: None,
        }
    }

    /// Upload a freshly rendered composite for display. Reuses the existing
    /// texture allocation when one exists.
    pub fn set_image(&mut self, ctx: &egui::Context, img: &RgbaImage) {
        let color = ColorImage::from_rgba_unmultiplied(
            [img.width() as usize, img.height() as usize],
            img.as_raw(),
        );
        let options = TextureOptions::default();
        match &mut self.texture {
            Some(tex) => tex.set(color, options),
            None => self.texture = Some(ctx.load_texture(self.label, color, options)),
        }
    }

    /// Show the view and feed drag / wheel input into `transform`. Returns
    /// `true` when the transform changed and a re-render is needed.
    ///
    /// Drag deltas arrive in display pixels and are converted through the
    /// digital-frame factors, so dragging feels identical at any view size.
    /// egui tracks one press per widget, which gives the pointer-capture
    /// behavior we want: a drag started by one pointer is not perturbed by
    /// another until release.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        transform: &mut PhotoTransform,
        interactive: bool,
    ) -> bool {
        let width = ui.available_width().min(MAX_VIEW_WIDTH);
        let size = Vec2::new(width, width * DIGITAL_H as f32 / DIGITAL_W as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let rect = response.rect;

        painter.rect_filled(rect, 2.0, Color32::WHITE);
        if let Some(tex) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), rect, uv, Color32::WHITE);
        }
        painter.rect_stroke(rect, 2.0, egui::Stroke::new(1.0, Color32::from_gray(160)));

        if !interactive {
            return false;
        }

        let mut changed = false;

        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                transform.apply_drag(
                    delta.x as f64,
                    delta.y as f64,
                    DIGITAL_W as f64 / rect.width() as f64,
                    DIGITAL_H as f64 / rect.height() as f64,
                );
                changed = true;
            }
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }

        // Wheel zoom, only while the pointer is over this view.
        if response.hovered() {
            let scroll = ui.input(|i| i.scroll_delta.y);
            if scroll != 0.0 {
                transform.zoom_step(if scroll > 0.0 { 1.0 } else { -1.0 });
                changed = true;
            }
        }

        changed
    }
}
