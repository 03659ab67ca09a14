// ============================================================================
// FILE IO — decode, encode, native dialogs, reference assets
// ============================================================================

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageError, RgbaImage};
use rfd::FileDialog;

/// Export encoding formats. The canonical export is JPEG at quality 92; PNG
/// is offered for users who want a lossless copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveFormat {
    #[default]
    Jpeg,
    Png,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Png => "png",
        }
    }

    /// Infer the format from a file extension; anything unknown encodes as
    /// JPEG, the default export format.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" => SaveFormat::Png,
            _ => SaveFormat::Jpeg,
        }
    }
}

/// Default JPEG export quality.
pub const EXPORT_JPEG_QUALITY: u8 = 92;

/// Extensions the upload gate accepts. Checked before any decode work;
/// anything else is rejected with a user-visible error and no state change.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff",
];

/// Upload gate: does this path's extension declare an image type?
pub fn is_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode an image file to RGBA on the calling thread.
pub fn load_image_sync(path: &Path) -> Result<RgbaImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Could not decode image '{}': {}", path.display(), e))?;
    Ok(img.to_rgba8())
}

/// Encode and write an export image. Standalone (no `&self`) so it can run
/// on a background thread via `rayon::spawn`.
pub fn encode_and_write(
    image: &RgbaImage,
    path: &Path,
    format: SaveFormat,
    quality: u8,
) -> Result<(), ImageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        SaveFormat::Jpeg => {
            // JPEG has no alpha channel; the compositor guarantees an opaque
            // white background, so the RGB conversion loses nothing.
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            encoder.encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ColorType::Rgb8,
            )?;
        }
        SaveFormat::Png => {
            let encoder = PngEncoder::new(&mut writer);
            #[allow(deprecated)]
            encoder.encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )?;
        }
    }

    Ok(())
}

// ============================================================================
// REFERENCE ASSETS
// ============================================================================

/// Optional overlay assets, looked for next to the executable and in the
/// working directory. A missing or undecodable file just means no overlay.
pub const REFERENCE_BASE_ASSET: &str = "assets/references.png";
pub const REFERENCE_GUIDE_ASSET: &str = "assets/reference-guide.png";

/// Load both reference overlays. The two loads are independent: one failing
/// never discards the other.
pub fn load_reference_assets() -> (Option<RgbaImage>, Option<RgbaImage>) {
    (
        load_optional_asset(REFERENCE_BASE_ASSET),
        load_optional_asset(REFERENCE_GUIDE_ASSET),
    )
}

fn load_optional_asset(rel: &str) -> Option<RgbaImage> {
    for base in asset_search_dirs() {
        let path = base.join(rel);
        if !path.exists() {
            continue;
        }
        match load_image_sync(&path) {
            Ok(img) => {
                crate::log_info!("Loaded reference asset {}", path.display());
                return Some(img);
            }
            Err(e) => {
                crate::log_warn!("Reference asset {} skipped: {}", path.display(), e);
                return None;
            }
        }
    }
    None
}

fn asset_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        dirs.push(dir.to_path_buf());
    }
    dirs.push(PathBuf::from("."));
    dirs
}

// ============================================================================
// FILE HANDLER — native dialogs for uploads and exports
// ============================================================================

pub struct FileHandler {
    /// Directory of the last successful pick, reused as the next dialog's
    /// starting location.
    pub last_dir: Option<PathBuf>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self { last_dir: None }
    }

    /// Pick a photo to upload. Filters to image types but keeps an
    /// "All Files" escape hatch — the extension gate re-checks either way.
    pub fn pick_photo(&mut self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All Files", &["*"]);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        let path = dialog.pick_file()?;
        self.last_dir = path.parent().map(|p| p.to_path_buf());
        Some(path)
    }

    /// Pick an export destination, seeded with the canonical filename. The
    /// save format follows the extension the user ends up with.
    pub fn pick_export_path(&mut self, suggested: &str) -> Option<(PathBuf, SaveFormat)> {
        let mut dialog = FileDialog::new()
            .add_filter("JPEG", &["jpg", "jpeg"])
            .add_filter("PNG", &["png"])
            .set_file_name(suggested);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        let path = dialog.save_file()?;
        self.last_dir = path.parent().map(|p| p.to_path_buf());
        let format =
            SaveFormat::from_extension(path.extension().and_then(|e| e.to_str()).unwrap_or(""));
        Some((path, format))
    }
}
