// ============================================================================
// IdPhotoFE CLI — headless composite/sheet export via command-line arguments
// ============================================================================
//
// Usage examples:
//   idphotofe --input portrait.jpg --output-dir out/
//   idphotofe -i portrait.jpg --scale 1.4 --offset-x -12 --offset-y 30 --dpi 600
//   idphotofe -i "shots/*.jpg" --targets 4x6,5x7 --format png --output-dir prints/
//
// No GUI is opened in CLI mode. All rendering runs synchronously on the
// current thread and each input file is processed independently.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::io::{self, EXPORT_JPEG_QUALITY, SaveFormat};
use crate::ops::compose::{DIGITAL_H, DIGITAL_W};
use crate::ops::sheet::{self, SHEETS, SheetSpec};
use crate::project::Session;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// IdPhotoFE headless exporter.
///
/// Compose an ID photo and pack it onto print sheets — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "idphotofe",
    about = "IdPhotoFE headless print-sheet exporter",
    long_about = "Render the digital ID-photo composite and DPI-scaled print sheets\n\
                  without opening the GUI.\n\n\
                  Example:\n  \
                  idphotofe --input portrait.jpg --output-dir out/\n  \
                  idphotofe -i \"shots/*.jpg\" --targets 4x6 --dpi 600 --format png"
)]
pub struct CliArgs {
    /// Input photo(s). Glob patterns accepted (e.g. "*.jpg", "shots/*.png").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output directory. Defaults to each input file's own directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Render targets: comma-separated list of digital, 4x6, 5x7, or all.
    #[arg(short, long, default_value = "all", value_name = "LIST")]
    pub targets: String,

    /// Photo scale multiplier (clamped to 0.5–3.0).
    #[arg(long, default_value_t = 1.0, value_name = "FACTOR")]
    pub scale: f64,

    /// Horizontal photo offset in digital-space pixels.
    #[arg(long, default_value_t = 0.0, value_name = "PX")]
    pub offset_x: f64,

    /// Vertical photo offset in digital-space pixels.
    #[arg(long, default_value_t = 0.0, value_name = "PX")]
    pub offset_y: f64,

    /// Print resolution in DPI (clamped to 150–600).
    #[arg(long, default_value_t = sheet::DEFAULT_DPI, value_name = "DPI")]
    pub dpi: u32,

    /// Output format: jpg or png.
    #[arg(short, long, default_value = "jpg", value_name = "FORMAT")]
    pub format: String,

    /// JPEG quality (1–100).
    #[arg(short, long, default_value_t = EXPORT_JPEG_QUALITY, value_name = "1-100")]
    pub quality: u8,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--input" || a == "-i")
    }
}

/// One thing to render per input file.
enum RenderTarget {
    Digital,
    Sheet(&'static SheetSpec),
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    let targets = match parse_targets(&args.targets) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let format = SaveFormat::from_extension(&args.format);

    if let Some(dir) = &args.output_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!(
            "error: could not create output directory '{}': {}",
            dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }
        let file_start = Instant::now();

        match run_one(input_path, &args, &targets, format) {
            Ok(()) => {
                if args.verbose {
                    println!(
                        "  done ({:.0}ms)",
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Per-file processing pipeline
// ============================================================================

fn run_one(
    input: &Path,
    args: &CliArgs,
    targets: &[RenderTarget],
    format: SaveFormat,
) -> Result<(), String> {
    // Same gate as the GUI upload: reject by declared type before decoding.
    if !io::is_image_extension(input) {
        return Err(format!("'{}' is not an image file.", input.display()));
    }

    let pixels = io::load_image_sync(input)?;

    let mut session = Session::new();
    session.set_photo(pixels);
    session.transform.set_scale(args.scale);
    session.transform.offset_x = args.offset_x;
    session.transform.offset_y = args.offset_y;
    session.set_dpi(args.dpi);

    let out_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");

    for target in targets {
        match target {
            RenderTarget::Digital => {
                let img = session.render_digital();
                let path = out_dir.join(format!(
                    "{}-digital-{}x{}.{}",
                    stem,
                    DIGITAL_W,
                    DIGITAL_H,
                    format.extension()
                ));
                io::encode_and_write(&img, &path, format, args.quality)
                    .map_err(|e| format!("save failed for '{}': {}", path.display(), e))?;
                println!("  {} ({}x{}px)", path.display(), img.width(), img.height());
            }
            RenderTarget::Sheet(spec) => {
                let (img, info) = session.render_sheet(spec);
                let path = out_dir.join(format!(
                    "{}-print-{}-{}dpi.{}",
                    stem,
                    spec.key,
                    info.dpi,
                    format.extension()
                ));
                io::encode_and_write(&img, &path, format, args.quality)
                    .map_err(|e| format!("save failed for '{}': {}", path.display(), e))?;
                println!("  {} — {}", path.display(), info.readout());
            }
        }
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Parse the `--targets` list into render targets, preserving order.
fn parse_targets(list: &str) -> Result<Vec<RenderTarget>, String> {
    let mut out = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part {
            "all" => {
                out.push(RenderTarget::Digital);
                for spec in &SHEETS {
                    out.push(RenderTarget::Sheet(spec));
                }
            }
            "digital" => out.push(RenderTarget::Digital),
            key => match sheet::sheet_by_key(key) {
                Some(spec) => out.push(RenderTarget::Sheet(spec)),
                None => {
                    return Err(format!(
                        "unknown render target '{}' (expected digital, 4x6, 5x7 or all)",
                        part
                    ));
                }
            },
        }
    }
    if out.is_empty() {
        return Err(String::from("no render targets given."));
    }
    Ok(out)
}
