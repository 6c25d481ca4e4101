use tlc_spots::{spots_to_json, SpotDetector, UNSET_REFERENCE};

#[cfg(feature = "tracing")]
use tlc_spots::core::init_tracing;

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    let _ = tlc_spots::core::init_with_level(log::LevelFilter::Info);

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: detect_spots <image_path> [baseline_y topline_y]");
        return;
    };
    let baseline_y = args
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(UNSET_REFERENCE);
    let topline_y = args
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(UNSET_REFERENCE);

    let outcome = SpotDetector::default().process_path(&path, baseline_y, topline_y);
    match outcome.success {
        true => println!("{}", spots_to_json(&outcome.spots)),
        false => println!("detection failed"),
    }
}
