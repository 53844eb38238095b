use lane_detector::config::demo::load_config;
use lane_detector::image::io::{load_rgb_image, save_grayscale_u8, save_rgb_image, write_json_file};
use lane_detector::image::ImageView;
use lane_detector::{Lane, LaneDetector, WarpDirection};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let detector = LaneDetector::from_config(&config.pipeline).map_err(|e| e.to_string())?;

    let frame = load_rgb_image(&config.input)?;
    let (w, h) = (frame.width(), frame.height());

    let binary = detector.threshold(&frame);
    let birdseye = detector.to_birdseye(&binary).map_err(|e| e.to_string())?;
    if let Some(path) = &config.output.birdseye_image {
        save_grayscale_u8(&birdseye, path)?;
        println!("Saved birdseye binary image to {}", path.display());
    }

    let mut lane = Lane::new(config.pipeline.lane.coefficients).map_err(|e| e.to_string())?;
    let report = detector
        .get_lanes(&birdseye, &mut lane)
        .map_err(|e| e.to_string())?;

    let inverse = detector
        .transform_matrix(w, h, WarpDirection::ToCamera)
        .map_err(|e| e.to_string())?;
    let mut annotated = frame.clone();
    detector
        .draw_lane(&mut annotated, &lane, &inverse)
        .map_err(|e| e.to_string())?;

    save_rgb_image(&annotated, &config.output.annotated_image)?;
    write_json_file(&config.output.report_json, &report)?;

    println!("Lane detection summary");
    println!("  frame: {w}x{h}");
    println!(
        "  rows: {} (hits left={} right={})",
        report.scan.left.len(),
        report.scan.left_hits,
        report.scan.right_hits
    );
    println!("  left: {:?}", lane.left());
    println!("  right: {:?}", lane.right());
    println!("  latency_ms: {:.3}", report.latency_ms);
    println!(
        "Saved annotated frame to {}",
        config.output.annotated_image.display()
    );
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: lane_demo <config.json>".to_string()
}
