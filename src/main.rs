use lane_detector::image::u8::ON;
use lane_detector::image::GrayImageU8;
use lane_detector::{Lane, LaneDetector, ScanParams};

fn main() {
    env_logger::init();
    // Demo stub: two vertical lane lines in a synthetic birdseye image
    let (w, h) = (200usize, 400usize);
    let mut img = GrayImageU8::new(w, h);
    for y in 0..h {
        img.set(40, y, ON);
        img.set(160, y, ON);
    }

    let params = match ScanParams::new(40, 5, 1, 20, 80) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let det = LaneDetector::new(params);
    let mut lane = match Lane::new(3) {
        Ok(lane) => lane,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    match det.get_lanes(&img, &mut lane) {
        Ok(report) => println!(
            "left={:?} right={:?} latency_ms={:.3}",
            lane.left(),
            lane.right(),
            report.latency_ms
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
