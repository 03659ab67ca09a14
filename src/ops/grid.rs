// ============================================================================
// GRID PACKER — even-grid layout search for print sheets
// ============================================================================

/// A packed grid: `cols × rows` cells with equal gaps on all sides. The outer
/// margin equals the inter-cell gap (`n + 1` gaps for `n` cells per axis).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    pub count: u32,
    pub gap_x: f64,
    pub gap_y: f64,
    /// Fraction of the sheet area covered by cells, in (0, 1].
    pub area_fill: f64,
}

/// Search every feasible `(cols, rows)` pair and keep the layout that fits
/// the most cells, tie-breaking on `area_fill` with a strict comparison (the
/// first candidate in scan order wins an exact tie).
///
/// A candidate is feasible when its total cell footprint fits the sheet and
/// the evenly distributed gap on each axis clears both floors (`min_gap_px`
/// and `min_margin_px` share one check, since margins are gaps here).
///
/// When nothing is feasible, falls back to a single centered cell with
/// `gap = max(min_margin_px, (sheet - cell) / 2)`. The fallback may undercut
/// the nominal minimum margin — guaranteed output deliberately wins over the
/// constraint there.
pub fn pack_even_grid(
    sheet_w: u32,
    sheet_h: u32,
    cell_w: u32,
    cell_h: u32,
    min_gap_px: f64,
    min_margin_px: f64,
) -> GridLayout {
    let max_cols = axis_upper_bound(sheet_w, cell_w, min_gap_px, min_margin_px);
    let max_rows = axis_upper_bound(sheet_h, cell_h, min_gap_px, min_margin_px);

    let sheet_area = sheet_w as f64 * sheet_h as f64;
    let mut best: Option<GridLayout> = None;

    for cols in 1..=max_cols {
        for rows in 1..=max_rows {
            let used_w = cols as f64 * cell_w as f64;
            let used_h = rows as f64 * cell_h as f64;
            if used_w > sheet_w as f64 || used_h > sheet_h as f64 {
                continue;
            }

            let gap_x = (sheet_w as f64 - used_w) / (cols + 1) as f64;
            let gap_y = (sheet_h as f64 - used_h) / (rows + 1) as f64;
            if gap_x < min_gap_px
                || gap_y < min_gap_px
                || gap_x < min_margin_px
                || gap_y < min_margin_px
            {
                continue;
            }

            let count = cols * rows;
            let area_fill = (used_w * used_h) / sheet_area;
            let better = match &best {
                None => true,
                Some(b) => count > b.count || (count == b.count && area_fill > b.area_fill),
            };
            if better {
                best = Some(GridLayout {
                    cols,
                    rows,
                    count,
                    gap_x,
                    gap_y,
                    area_fill,
                });
            }
        }
    }

    best.unwrap_or(GridLayout {
        cols: 1,
        rows: 1,
        count: 1,
        gap_x: min_margin_px.max((sheet_w as f64 - cell_w as f64) / 2.0),
        gap_y: min_margin_px.max((sheet_h as f64 - cell_h as f64) / 2.0),
        area_fill: (cell_w as f64 * cell_h as f64) / sheet_area,
    })
}

/// Largest cell count worth scanning on one axis: how many `cell + gap` units
/// fit once both margins are reserved. Floored at 1 so the scan range is
/// never empty.
fn axis_upper_bound(sheet: u32, cell: u32, min_gap: f64, min_margin: f64) -> u32 {
    let usable = sheet as f64 - min_margin * 2.0 + min_gap;
    let fit = (usable / (cell as f64 + min_gap)).floor() as i64;
    fit.max(1) as u32
}
