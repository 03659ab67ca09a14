use image::{Rgba, RgbaImage};

use idphotofe::ops::compose::{DIGITAL_H, DIGITAL_W};
use idphotofe::ops::preview::fit_to_preview;
use idphotofe::ops::sheet::{self, SHEETS};
use idphotofe::project::Session;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn solid(w: u32, h: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(w, h, color)
}

/// Gray field with a red marker square, for tracking where the photo lands.
fn marker_image() -> RgbaImage {
    let mut img = solid(800, 600, Rgba([120, 120, 120, 255]));
    for y in 280..320 {
        for x in 380..420 {
            img.put_pixel(x, y, RED);
        }
    }
    img
}

fn red_centroid(img: &RgbaImage) -> (f64, f64) {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut n = 0.0;
    for (x, y, px) in img.enumerate_pixels() {
        if px[0] > 200 && px[1] < 100 && px[2] < 100 {
            sum_x += x as f64;
            sum_y += y as f64;
            n += 1.0;
        }
    }
    assert!(n > 0.0, "no red pixels found");
    (sum_x / n, sum_y / n)
}

fn session_with(photo: RgbaImage) -> Session {
    let mut session = Session::new();
    session.set_photo(photo);
    session
}

#[test]
fn digital_composite_is_always_fixed_size() {
    let mut session = session_with(solid(800, 600, RED));
    for (scale, ox, oy) in [
        (0.5, 0.0, 0.0),
        (1.0, 4000.0, -4000.0),
        (3.0, -17.5, 260.25),
    ] {
        session.transform.set_scale(scale);
        session.transform.offset_x = ox;
        session.transform.offset_y = oy;
        let digital = session.render_digital();
        assert_eq!((digital.width(), digital.height()), (DIGITAL_W, DIGITAL_H));
    }
}

#[test]
fn rendering_twice_is_pixel_identical() {
    let mut session = session_with(marker_image());
    session.transform.set_scale(1.3);
    session.transform.offset_x = 17.0;
    session.transform.offset_y = -23.0;

    let a = session.render_digital();
    let b = session.render_digital();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn cover_fit_leaves_no_letterbox() {
    // Default transform: the photo must fully cover the frame, so even the
    // corners carry photo content rather than background white.
    let session = session_with(solid(800, 600, RED));
    let digital = session.render_digital();
    assert_eq!(*digital.get_pixel(0, 0), RED);
    assert_eq!(*digital.get_pixel(DIGITAL_W - 1, 0), RED);
    assert_eq!(*digital.get_pixel(0, DIGITAL_H - 1), RED);
    assert_eq!(*digital.get_pixel(DIGITAL_W - 1, DIGITAL_H - 1), RED);
}

#[test]
fn empty_session_renders_plain_white() {
    let session = Session::new();
    let digital = session.render_digital();
    assert!(digital.pixels().all(|px| *px == WHITE));
}

#[test]
fn same_transform_frames_identically_at_double_resolution() {
    let mut session = session_with(marker_image());
    session.transform.set_scale(1.3);
    session.transform.offset_x = 17.0;
    session.transform.offset_y = -23.0;

    let mut small = RgbaImage::new(DIGITAL_W, DIGITAL_H);
    let mut large = RgbaImage::new(DIGITAL_W * 2, DIGITAL_H * 2);
    session.render_into(&mut small, &Default::default());
    session.render_into(&mut large, &Default::default());

    let (sx, sy) = red_centroid(&small);
    let (lx, ly) = red_centroid(&large);
    assert!(
        (lx / 2.0 - sx).abs() < 2.0,
        "marker drifted horizontally: small {} vs large/2 {}",
        sx,
        lx / 2.0
    );
    assert!(
        (ly / 2.0 - sy).abs() < 2.0,
        "marker drifted vertically: small {} vs large/2 {}",
        sy,
        ly / 2.0
    );
}

#[test]
fn editor_view_ghosts_the_photo_over_white() {
    let session = session_with(solid(800, 600, RED));
    let view = session.render_editor(idphotofe::ops::compose::ReferenceMode::None);
    // Pure red at alpha 0.5 over white: (255, 128, 128).
    assert_eq!(*view.get_pixel(200, 200), Rgba([255, 128, 128, 255]));
}

#[test]
fn new_photo_resets_the_transform() {
    let mut session = session_with(solid(100, 100, RED));
    session.transform.set_scale(2.0);
    session.transform.offset_x = 50.0;
    session.set_photo(solid(200, 200, RED));
    assert_eq!(session.transform.scale_multiplier, 1.0);
    assert_eq!(session.transform.offset_x, 0.0);
}

#[test]
fn preview_scaler_contains_and_centers() {
    let source = solid(DIGITAL_W, DIGITAL_H, RED);
    let mut target = RgbaImage::new(190, 266);
    fit_to_preview(&mut target, &source);

    // Contain-fit of 387x516 into 190x266 fills the width and letterboxes
    // the height (~6 px top and bottom).
    assert_eq!(*target.get_pixel(95, 133), RED);
    assert_eq!(*target.get_pixel(95, 2), WHITE);
    assert_eq!(*target.get_pixel(95, 263), WHITE);
    assert_eq!(*target.get_pixel(2, 133), RED);
    assert_eq!(*target.get_pixel(187, 133), RED);
}

#[test]
fn sheet_render_stamps_exact_copies_on_the_grid() {
    let digital = solid(DIGITAL_W, DIGITAL_H, RED);
    let spec = sheet::sheet_by_key("4x6").unwrap();
    let (img, info) = sheet::render_sheet(&digital, spec, 300);

    assert_eq!((info.sheet_w, info.sheet_h), (1200, 1800));
    assert_eq!((info.cols, info.rows, info.total), (2, 3, 6));
    assert_eq!((img.width(), img.height()), (1200, 1800));

    // gap_x = (1200 - 774) / 3 = 142, gap_y = (1800 - 1548) / 4 = 63.
    // First cell spans x 142..529, y 63..579; second column starts at 671.
    assert_eq!(*img.get_pixel(142, 63), RED);
    assert_eq!(*img.get_pixel(141, 63), WHITE);
    assert_eq!(*img.get_pixel(528, 63), RED);
    assert_eq!(*img.get_pixel(650, 70), WHITE);
    assert_eq!(*img.get_pixel(671, 63), RED);
    // Bottom row: y = 63 + 2 * (516 + 63) = 1221.
    assert_eq!(*img.get_pixel(142, 1221), RED);
    // Outer margin stays white.
    assert_eq!(*img.get_pixel(10, 10), WHITE);
    assert_eq!(*img.get_pixel(1199, 1799), WHITE);
}

#[test]
fn sheet_dpi_is_clamped_like_the_inputs() {
    let digital = solid(DIGITAL_W, DIGITAL_H, RED);
    let (_, info) = sheet::render_sheet(&digital, &SHEETS[0], 10_000);
    assert_eq!(info.dpi, sheet::MAX_DPI);
    assert_eq!(info.sheet_w, 4 * sheet::MAX_DPI);
}

#[test]
fn upload_gate_rejects_non_image_extensions() {
    use std::path::Path;
    assert!(!idphotofe::io::is_image_extension(Path::new("notes.txt")));
    assert!(!idphotofe::io::is_image_extension(Path::new("archive")));
    assert!(idphotofe::io::is_image_extension(Path::new("me.JPG")));
    assert!(idphotofe::io::is_image_extension(Path::new("scan.png")));
    // A session that never accepted a photo keeps exports disabled.
    assert!(!Session::new().has_photo());
}
