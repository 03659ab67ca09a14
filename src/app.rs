// ============================================================================
// IdPhotoFE APPLICATION — egui shell around one composition session
// ============================================================================

use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui;
use image::RgbaImage;

use crate::canvas::EditorCanvas;
use crate::io::{self, EXPORT_JPEG_QUALITY, FileHandler, SaveFormat};
use crate::ops::compose::{DIGITAL_H, DIGITAL_W, ReferenceMode};
use crate::ops::preview;
use crate::ops::sheet::{self, MAX_DPI, MIN_DPI, SHEETS, SheetLayoutInfo};
use crate::ops::transform::{MAX_SCALE, MIN_SCALE};
use crate::project::Session;

/// Pixel sizes of the preview canvases (contain-fit targets).
const DIGITAL_PREVIEW_SIZE: (u32, u32) = (168, 224);
const SHEET_PREVIEW_SIZE: (u32, u32) = (190, 266);

const NO_PHOTO_READOUT: &str = "Upload a photo to see layout details.";

/// Result delivered from a background IO thread.
pub enum IoResult {
    /// A photo was decoded and is ready to install.
    PhotoLoaded { pixels: RgbaImage, path: PathBuf },
    /// Photo decoding failed; previous state stays untouched.
    PhotoFailed(String),
    /// Startup reference overlays, each independently optional.
    ReferencesLoaded {
        base: Option<RgbaImage>,
        guide: Option<RgbaImage>,
    },
    /// An export finished writing.
    ExportDone(PathBuf),
    /// An export failed to encode or write.
    ExportFailed(String),
}

/// One fixed-size preview pane: a staging buffer fed by the preview scaler
/// and the texture it is displayed through.
struct PreviewPane {
    label: &'static str,
    buffer: RgbaImage,
    texture: Option<egui::TextureHandle>,
}

impl PreviewPane {
    fn new(label: &'static str, size: (u32, u32)) -> Self {
        Self {
            label,
            buffer: RgbaImage::from_pixel(size.0, size.1, image::Rgba([255, 255, 255, 255])),
            texture: None,
        }
    }

    /// Contain-fit `source` into this pane and refresh the texture.
    fn update_from(&mut self, ctx: &egui::Context, source: &RgbaImage) {
        preview::fit_to_preview(&mut self.buffer, source);
        self.upload(ctx);
    }

    fn clear(&mut self, ctx: &egui::Context) {
        crate::ops::compose::fill_white(&mut self.buffer);
        self.upload(ctx);
    }

    fn upload(&mut self, ctx: &egui::Context) {
        let color = egui::ColorImage::from_rgba_unmultiplied(
            [self.buffer.width() as usize, self.buffer.height() as usize],
            self.buffer.as_raw(),
        );
        let options = egui::TextureOptions::default();
        match &mut self.texture {
            Some(tex) => tex.set(color, options),
            None => self.texture = Some(ctx.load_texture(self.label, color, options)),
        }
    }

    fn show(&self, ui: &mut egui::Ui) {
        if let Some(tex) = &self.texture {
            let sized = egui::load::SizedTexture::from_handle(tex);
            ui.add(egui::Image::from_texture(sized));
        }
    }
}

pub struct IdPhotoApp {
    session: Session,

    // Editor views (base reference / guide reference), both interactive.
    editor_base: EditorCanvas,
    editor_guide: EditorCanvas,

    // Previews and the layout metadata shown beside them.
    preview_digital: PreviewPane,
    preview_sheets: Vec<PreviewPane>,
    sheet_infos: Vec<Option<SheetLayoutInfo>>,

    // UI mirrors of the clamped inputs.
    scale_input: f64,
    dpi_input: u32,

    file_handler: FileHandler,

    // Async IO pipeline (background decode / encode).
    io_sender: mpsc::Sender<IoResult>,
    io_receiver: mpsc::Receiver<IoResult>,
    /// When > 0, a background IO job is in progress; show spinner.
    pending_io_ops: usize,

    /// Last status or error line, shown in the bottom bar.
    status_line: String,

    /// Set by any state mutation; the next frame runs the render cascade.
    needs_render: bool,
}

impl IdPhotoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (io_sender, io_receiver) = mpsc::channel();

        // Kick off the optional reference-overlay loads. Each may fail on its
        // own; the app just renders without that overlay.
        let sender = io_sender.clone();
        rayon::spawn(move || {
            let (base, guide) = io::load_reference_assets();
            let _ = sender.send(IoResult::ReferencesLoaded { base, guide });
        });

        let mut app = Self {
            session: Session::new(),
            editor_base: EditorCanvas::new("editor_base"),
            editor_guide: EditorCanvas::new("editor_guide"),
            preview_digital: PreviewPane::new("preview_digital", DIGITAL_PREVIEW_SIZE),
            preview_sheets: SHEETS
                .iter()
                .map(|s| PreviewPane::new(s.key, SHEET_PREVIEW_SIZE))
                .collect(),
            sheet_infos: vec![None; SHEETS.len()],
            scale_input: 1.0,
            dpi_input: sheet::DEFAULT_DPI,
            file_handler: FileHandler::new(),
            io_sender,
            io_receiver,
            pending_io_ops: 1, // the reference load above
            status_line: String::new(),
            needs_render: true,
        };
        app.status_line = String::from("Upload a photo to begin.");
        app
    }

    // ------------------------------------------------------------------
    // Async IO pipeline
    // ------------------------------------------------------------------

    fn drain_io_results(&mut self) {
        while let Ok(result) = self.io_receiver.try_recv() {
            self.pending_io_ops = self.pending_io_ops.saturating_sub(1);
            match result {
                IoResult::PhotoLoaded { pixels, path } => {
                    crate::log_info!(
                        "Photo loaded: {} ({}x{})",
                        path.display(),
                        pixels.width(),
                        pixels.height()
                    );
                    self.session.set_photo(pixels);
                    self.scale_input = self.session.transform.scale_multiplier;
                    self.status_line = format!("Loaded {}", path.display());
                    self.needs_render = true;
                }
                IoResult::PhotoFailed(err) => {
                    // Previous photo (if any) stays; only the status changes.
                    crate::log_err!("{}", err);
                    self.status_line = err;
                }
                IoResult::ReferencesLoaded { base, guide } => {
                    self.session.reference_base = base;
                    self.session.reference_guide = guide;
                    self.needs_render = true;
                }
                IoResult::ExportDone(path) => {
                    crate::log_info!("Export written: {}", path.display());
                    self.status_line = format!("Saved {}", path.display());
                }
                IoResult::ExportFailed(err) => {
                    crate::log_err!("{}", err);
                    self.status_line = err;
                }
            }
        }
    }

    fn begin_photo_load(&mut self, path: PathBuf) {
        // Upload gate: reject non-image types before any decode attempt.
        if !io::is_image_extension(&path) {
            self.status_line = String::from("Please upload a valid image file.");
            return;
        }
        self.pending_io_ops += 1;
        let sender = self.io_sender.clone();
        rayon::spawn(move || {
            let msg = match io::load_image_sync(&path) {
                Ok(pixels) => IoResult::PhotoLoaded { pixels, path },
                Err(e) => IoResult::PhotoFailed(e),
            };
            let _ = sender.send(msg);
        });
    }

    fn spawn_export(&mut self, img: RgbaImage, path: PathBuf, format: SaveFormat) {
        self.pending_io_ops += 1;
        let sender = self.io_sender.clone();
        rayon::spawn(move || {
            let msg = match io::encode_and_write(&img, &path, format, EXPORT_JPEG_QUALITY) {
                Ok(()) => IoResult::ExportDone(path),
                Err(e) => IoResult::ExportFailed(format!(
                    "Export failed for '{}': {}",
                    path.display(),
                    e
                )),
            };
            let _ = sender.send(msg);
        });
    }

    // ------------------------------------------------------------------
    // Export actions — each re-renders from current state at click time
    // ------------------------------------------------------------------

    fn export_digital(&mut self) {
        if !self.session.has_photo() {
            return;
        }
        let suggested = format!("photo-digital-{}x{}.jpg", DIGITAL_W, DIGITAL_H);
        let Some((path, format)) = self.file_handler.pick_export_path(&suggested) else {
            return;
        };
        let img = self.session.render_digital();
        self.spawn_export(img, path, format);
    }

    fn export_sheet(&mut self, index: usize) {
        if !self.session.has_photo() {
            return;
        }
        let spec = &SHEETS[index];
        let suggested = format!("photo-print-{}-{}dpi.jpg", spec.key, self.session.dpi);
        let Some((path, format)) = self.file_handler.pick_export_path(&suggested) else {
            return;
        };
        let (img, _info) = self.session.render_sheet(spec);
        self.spawn_export(img, path, format);
    }

    // ------------------------------------------------------------------
    // Render cascade — editor views, digital composite, sheets, previews
    // ------------------------------------------------------------------

    fn render_all(&mut self, ctx: &egui::Context) {
        self.needs_render = false;

        let base_view = self.session.render_editor(ReferenceMode::Base);
        self.editor_base.set_image(ctx, &base_view);
        let guide_view = self.session.render_editor(ReferenceMode::Guide);
        self.editor_guide.set_image(ctx, &guide_view);

        let digital = self.session.render_digital();
        self.preview_digital.update_from(ctx, &digital);

        if !self.session.has_photo() {
            // Empty composition: sheet previews stay white and the readouts
            // fall back to the placeholder.
            for pane in &mut self.preview_sheets {
                pane.clear(ctx);
            }
            for info in &mut self.sheet_infos {
                *info = None;
            }
            return;
        }

        for (i, spec) in SHEETS.iter().enumerate() {
            let (sheet_img, info) = sheet::render_sheet(&digital, spec, self.session.dpi);
            self.preview_sheets[i].update_from(ctx, &sheet_img);
            self.sheet_infos[i] = Some(info);
        }
    }

    // ------------------------------------------------------------------
    // UI panels
    // ------------------------------------------------------------------

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        let has_photo = self.session.has_photo();

        ui.horizontal_wrapped(|ui| {
            if ui.button("Upload Photo…").clicked()
                && let Some(path) = self.file_handler.pick_photo()
            {
                self.begin_photo_load(path);
            }

            if ui
                .add_enabled(has_photo, egui::Button::new("Reset"))
                .clicked()
            {
                self.session.transform.reset();
                self.scale_input = self.session.transform.scale_multiplier;
                self.needs_render = true;
            }

            ui.separator();

            ui.label("Scale");
            if ui
                .add(egui::Slider::new(&mut self.scale_input, MIN_SCALE..=MAX_SCALE).step_by(0.01))
                .changed()
            {
                self.session.transform.set_scale(self.scale_input);
                self.scale_input = self.session.transform.scale_multiplier;
                self.needs_render = true;
            }

            ui.separator();

            ui.label("Print DPI");
            if ui
                .add(
                    egui::DragValue::new(&mut self.dpi_input)
                        .speed(2)
                        .clamp_range(MIN_DPI..=MAX_DPI),
                )
                .changed()
            {
                self.session.set_dpi(self.dpi_input);
                self.dpi_input = self.session.dpi;
                self.needs_render = true;
            }

            ui.separator();

            if ui
                .add_enabled(has_photo, egui::Button::new("Save Digital"))
                .clicked()
            {
                self.export_digital();
            }
            for (i, spec) in SHEETS.iter().enumerate() {
                if ui
                    .add_enabled(has_photo, egui::Button::new(format!("Save {} Sheet", spec.key)))
                    .clicked()
                {
                    self.export_sheet(i);
                }
            }
        });
    }

    fn editors_panel(&mut self, ui: &mut egui::Ui) {
        let has_photo = self.session.has_photo();
        let mut changed = false;

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.label("Alignment reference");
                changed |= self
                    .editor_base
                    .show(ui, &mut self.session.transform, has_photo);
            });
            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.label("Guide overlay");
                changed |= self
                    .editor_guide
                    .show(ui, &mut self.session.transform, has_photo);
            });
        });
        ui.add_space(4.0);
        ui.label("Drag to position the photo; scroll to zoom.");

        if changed {
            // Wheel zoom moves the slider too, like the original scale input.
            self.scale_input = self.session.transform.scale_multiplier;
            self.needs_render = true;
        }
    }

    fn previews_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Previews");
        ui.add_space(4.0);

        ui.label(format!("Digital ({}x{}px)", DIGITAL_W, DIGITAL_H));
        self.preview_digital.show(ui);
        ui.add_space(8.0);

        for (i, spec) in SHEETS.iter().enumerate() {
            ui.separator();
            ui.label(format!("{} in print sheet", spec.key));
            self.preview_sheets[i].show(ui);
            let readout = match &self.sheet_infos[i] {
                Some(info) => info.readout(),
                None => String::from(NO_PHOTO_READOUT),
            };
            ui.small(readout);
        }
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.pending_io_ops > 0 {
                ui.spinner();
            }
            ui.label(&self.status_line);
        });
    }
}

impl eframe::App for IdPhotoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Poll async IO results ---
        self.drain_io_results();
        if self.pending_io_ops > 0 {
            // Keep polling while background jobs run, even without input.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // --- UI ---
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls_panel(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::SidePanel::right("previews")
            .resizable(false)
            .default_width(SHEET_PREVIEW_SIZE.0 as f32 + 24.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.previews_panel(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editors_panel(ui);
        });

        // --- Render cascade ---
        // Runs after input handling so every mutation this frame is visible
        // in the same frame's textures. One full pass per change, like the
        // original tool; print sheets recompute on every edit (cheap at the
        // default DPI, and the CLI is the bulk-export path).
        if self.needs_render {
            self.render_all(ctx);
        }
    }
}
