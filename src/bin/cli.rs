use std::{path::PathBuf, process};

use anyhow::Context;
use argh::FromArgs;
use facecrop::{
    config::{DEFAULT_JPEG_QUALITY, DEFAULT_MODEL_PATH, DEFAULT_THUMBNAIL_SIZE},
    open_detector, Backend, CaptureConfig, DetectorConfig, FaceCapture,
    FrameNumbering, WriteMode,
};

/// Facecrop CLI Tool
/// Crop the largest face of every frame into a thumbnail.
#[derive(FromArgs, PartialEq, Debug)]
struct Cli {
    /// directory holding the frames, named 0.jpeg, 1.jpeg, ...
    #[argh(positional)]
    input: PathBuf,

    /// the detector model file
    #[argh(option, default = "PathBuf::from(DEFAULT_MODEL_PATH)")]
    model: PathBuf,

    /// detector backend: seeta or mtcnn
    #[argh(option, default = "Backend::Seeta")]
    backend: Backend,

    /// where the per-frame folders go, defaults to <input>/OUTPUT
    #[argh(option)]
    output: Option<PathBuf>,

    /// thumbnail side in pixels
    #[argh(option, default = "DEFAULT_THUMBNAIL_SIZE")]
    size: u32,

    /// JPEG quality, 1 to 100
    #[argh(option, default = "DEFAULT_JPEG_QUALITY")]
    quality: u8,

    /// growth between detection scales
    #[argh(option, default = "1.1")]
    scale_factor: f32,

    /// overlapping hits a face needs to be kept
    #[argh(option, default = "2")]
    min_neighbors: u32,

    /// smallest face side in pixels, at least 20
    #[argh(option, default = "20")]
    min_size: u32,

    /// only write the largest face of each frame
    #[argh(switch)]
    largest_only: bool,

    /// number output folders by input file name instead of load order
    #[argh(switch)]
    number_by_filename: bool,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();
    // Turn off tensorflow logging.
    #[cfg(feature = "mtcnn")]
    std::env::set_var("TF_CPP_MIN_LOG_LEVEL", "3");

    let cli: Cli = argh::from_env();
    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        let model_load = e
            .downcast_ref::<facecrop::Error>()
            .map_or(false, facecrop::Error::is_model_load);
        process::exit(if model_load { -1 } else { 1 });
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CaptureConfig::new(cli.input)
        .set_thumbnail_size(cli.size)
        .set_jpeg_quality(cli.quality);
    if let Some(output) = cli.output {
        config = config.set_output_dir(output);
    }
    if cli.largest_only {
        config = config.set_mode(WriteMode::LargestOnly);
    }
    if cli.number_by_filename {
        config = config.set_numbering(FrameNumbering::FileName);
    }
    config.validate()?;

    let detector_config = DetectorConfig::new(cli.model)
        .set_scale_factor(cli.scale_factor)
        .set_min_neighbors(cli.min_neighbors)
        .set_min_size(cli.min_size);
    let detector = open_detector(cli.backend, &detector_config)?;

    let summary = FaceCapture::new(detector, &config)
        .run()
        .with_context(|| {
            format!("capturing faces from {}", config.input_dir.display())
        })?;
    println!(
        "Cropped {} face thumbnail(s) from {} frame(s) into {}",
        summary.thumbnails,
        summary.frames,
        config.output_root().display()
    );
    Ok(())
}
