// ============================================================================
// SHEET RENDERER — DPI-aware print sheets stamped with the digital composite
// ============================================================================

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::ops::grid::{self, GridLayout};

/// A named physical print size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetSpec {
    pub key: &'static str,
    pub width_in: f64,
    pub height_in: f64,
}

/// The photo print sheets offered by the app.
pub static SHEETS: [SheetSpec; 2] = [
    SheetSpec {
        key: "4x6",
        width_in: 4.0,
        height_in: 6.0,
    },
    SheetSpec {
        key: "5x7",
        width_in: 5.0,
        height_in: 7.0,
    },
];

/// Supported print resolution range. DPI scales only the print sheets; the
/// digital composite keeps its fixed pixel size regardless.
pub const MIN_DPI: u32 = 150;
pub const MAX_DPI: u32 = 600;
pub const DEFAULT_DPI: u32 = 300;

pub fn sheet_by_key(key: &str) -> Option<&'static SheetSpec> {
    SHEETS.iter().find(|s| s.key == key)
}

/// Clamp a raw DPI value into the supported range. `None` (unparsable or
/// empty input) falls back to the default before clamping.
pub fn clamp_dpi(value: Option<u32>) -> u32 {
    value.unwrap_or(DEFAULT_DPI).clamp(MIN_DPI, MAX_DPI)
}

/// Gap/margin floor in pixels at the given DPI: about 0.08 in, never below
/// 10 px so low-DPI sheets keep a visible margin.
pub fn min_gap_px(dpi: u32) -> f64 {
    10.0_f64.max((dpi as f64 * 0.08).round())
}

/// Layout metadata reported back after a sheet render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayoutInfo {
    pub cols: u32,
    pub rows: u32,
    pub total: u32,
    pub sheet_w: u32,
    pub sheet_h: u32,
    pub dpi: u32,
}

impl SheetLayoutInfo {
    /// Human-readable layout readout shown next to each sheet preview.
    pub fn readout(&self) -> String {
        format!(
            "{} rows x {} cols = {} photos ({}x{}px at {} DPI)",
            self.rows, self.cols, self.total, self.sheet_w, self.sheet_h, self.dpi
        )
    }
}

/// Rasterize one print sheet: white background and an even grid of copies of
/// the digital composite, packed for maximum count.
pub fn render_sheet(
    digital: &RgbaImage,
    spec: &SheetSpec,
    dpi: u32,
) -> (RgbaImage, SheetLayoutInfo) {
    let dpi = dpi.clamp(MIN_DPI, MAX_DPI);
    let sheet_w = (spec.width_in * dpi as f64).round() as u32;
    let sheet_h = (spec.height_in * dpi as f64).round() as u32;

    let floor_px = min_gap_px(dpi);
    let layout = grid::pack_even_grid(
        sheet_w,
        sheet_h,
        digital.width(),
        digital.height(),
        floor_px,
        floor_px,
    );

    let mut sheet = RgbaImage::from_pixel(sheet_w, sheet_h, Rgba([255, 255, 255, 255]));
    stamp_cells(&mut sheet, digital, &layout);

    let info = SheetLayoutInfo {
        cols: layout.cols,
        rows: layout.rows,
        total: layout.count,
        sheet_w,
        sheet_h,
        dpi,
    };
    (sheet, info)
}

/// Copy the digital composite at every grid position. Positions are rounded
/// to integer pixels before drawing so adjacent cells never blur into a
/// sub-pixel seam. The sheet is split into pixel rows and stamped in
/// parallel; each row copies the segment of every cell that crosses it.
fn stamp_cells(sheet: &mut RgbaImage, cell: &RgbaImage, layout: &GridLayout) {
    let sheet_w = sheet.width() as i64;
    let cell_w = cell.width() as i64;
    let cell_h = cell.height() as i64;
    let cell_row_bytes = cell_w as usize * 4;

    let xs: Vec<i64> = (0..layout.cols)
        .map(|c| (layout.gap_x + c as f64 * (cell_w as f64 + layout.gap_x)).round() as i64)
        .collect();
    let ys: Vec<i64> = (0..layout.rows)
        .map(|r| (layout.gap_y + r as f64 * (cell_h as f64 + layout.gap_y)).round() as i64)
        .collect();

    let stride = sheet_w as usize * 4;
    let cell_raw = cell.as_raw();
    let buf: &mut [u8] = &mut **sheet;

    buf.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        let y = y as i64;
        for &cy in &ys {
            if y < cy || y >= cy + cell_h {
                continue;
            }
            let src_row = &cell_raw[(y - cy) as usize * cell_row_bytes..][..cell_row_bytes];
            for &cx in &xs {
                // Clip to the sheet; the forced single-cell fallback may
                // overhang on sheets smaller than the cell.
                let dst_start = cx.max(0);
                let dst_end = (cx + cell_w).min(sheet_w);
                if dst_start >= dst_end {
                    continue;
                }
                let src_off = (dst_start - cx) as usize * 4;
                let len = (dst_end - dst_start) as usize * 4;
                row[dst_start as usize * 4..dst_start as usize * 4 + len]
                    .copy_from_slice(&src_row[src_off..src_off + len]);
            }
        }
    });
}
