mod common;

use common::synthetic_image::{painted_frame, vertical_lines_u8};
use lane_detector::image::{ImageView, RgbImageU8};
use lane_detector::perspective::PerspectiveAnchors;
use lane_detector::render::RenderParams;
use lane_detector::{Lane, LaneDetector, ScanParams, WarpDirection};
use nalgebra::Matrix3;

#[test]
fn constant_curves_render_on_their_columns_with_identity() {
    let _ = env_logger::builder().is_test(true).try_init();
    let detector = LaneDetector::new(ScanParams::new(20, 5, 1, 20, 80).expect("valid params"));
    let img = vertical_lines_u8(200, 400, &[40, 160]);
    let mut lane = Lane::new(3).expect("three coefficients");
    detector.get_lanes(&img, &mut lane).expect("fit");

    let mut frame = RgbImageU8::new(200, 400);
    detector
        .draw_lane(&mut frame, &lane, &Matrix3::identity())
        .expect("identity is invertible");

    let marker = RenderParams::default().marker_color();
    let mut marked = 0usize;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let px = frame.get(x, y);
            if px == [0, 0, 0] {
                continue;
            }
            assert_eq!(px, marker);
            let near = |c: i64| (x as i64 - c).abs() <= 5;
            assert!(near(40) || near(160), "stray marker at ({x}, {y})");
            marked += 1;
        }
    }
    assert!(marked > 0);
}

#[test]
fn camera_round_trip_puts_lane_back_on_paint() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (400usize, 300usize);
    let anchors = PerspectiveAnchors::default();
    let detector = LaneDetector::new(ScanParams::new(30, 2, 1, 20, 80).expect("valid params"))
        .with_anchors(anchors);

    // Paint the birdseye lane lines at 20 % and 80 % of the width, then
    // render them into the camera view as the "road".
    let inverse = detector
        .transform_matrix(w, h, WarpDirection::ToCamera)
        .expect("anchors are not degenerate");
    let birdseye_paint = painted_frame(w, h, &[80, 320], 3);
    let mut camera = RgbImageU8::filled(w, h, [60, 60, 60]);
    lane_detector::warp::warp_perspective(&birdseye_paint, &inverse, &mut camera)
        .expect("invertible");

    let binary = detector.threshold(&camera);
    let birdseye = detector.to_birdseye(&binary).expect("invertible");
    let mut lane = Lane::new(2).expect("two coefficients");
    let report = detector.get_lanes(&birdseye, &mut lane).expect("fit");
    // Far rows shrink below the blur's reach in camera space; the near rows
    // must still produce evidence on both sides.
    assert!(report.scan.left_hits > 0 && report.scan.right_hits > 0);

    // Both boundaries sit near the painted columns in the lower half of the
    // birdseye view, where the camera resolution is highest.
    for row in (h / 2..h).step_by(10) {
        let y = row as f64;
        let l = lane_detector::polyfit::eval_polynomial_f64(lane.left(), y);
        let r = lane_detector::polyfit::eval_polynomial_f64(lane.right(), y);
        assert!((l - 80.0).abs() < 8.0, "left={l:.1} at row {row}");
        assert!((r - 320.0).abs() < 8.0, "right={r:.1} at row {row}");
    }

    let mut annotated = camera.clone();
    detector
        .draw_lane(&mut annotated, &lane, &inverse)
        .expect("invertible");
    let marker = RenderParams::default().marker_color();
    let overlay = annotated.rows().flatten().filter(|p| **p == marker).count();
    assert!(overlay > 0);
}
