use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use nalgebra::Point2;

use colorchart::generate::{build_outputs, fiducial_marks};
use colorchart::{LoadedChart, ProfileConfig, Quad, StartCorner, WbCoefficients};

/// Build camera color-calibration outputs from a photographed reference
/// chart, headless: chart summary, fiducial-marks file and the
/// scanin/dcamprof command script.
#[derive(Parser, Debug)]
#[command(name = "colorchart", version, about)]
struct Cli {
    /// Input image path (recorded into the generated commands).
    #[arg(short = 'i', long = "image")]
    image: Option<String>,

    /// Chart description (.cht) file.
    #[arg(short = 't', long = "cht")]
    cht: Option<PathBuf>,

    /// White balance red coefficient.
    #[arg(short = 'r', long = "wb-red")]
    wb_red: Option<f32>,

    /// White balance green coefficient.
    #[arg(short = 'g', long = "wb-green")]
    wb_green: Option<f32>,

    /// White balance blue coefficient.
    #[arg(short = 'b', long = "wb-blue")]
    wb_blue: Option<f32>,

    /// White balance JSON file ({"r":..,"g":..,"b":..}).
    #[arg(short = 'w', long = "wb-file")]
    wb_file: Option<PathBuf>,

    /// Calibration illuminant (e.g. D50).
    #[arg(short = 's', long = "illuminant")]
    illuminant: Option<String>,

    /// Output directory.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<String>,

    /// Configuration JSON file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Marked frame as eight comma-separated numbers
    /// (x0,y0,x1,y1,x2,y2,x3,y3 for lt,rt,rb,lb).
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    frame: Option<Vec<f32>>,

    /// Which canonical corner the frame's first point anchors
    /// (lt, rt, rb or lb).
    #[arg(long, default_value = "lt", value_parser = parse_start_corner)]
    start_corner: StartCorner,

    /// Display proportion the frame coordinates were captured at.
    #[arg(long, default_value_t = 1.0)]
    proportion: f32,
}

fn parse_start_corner(raw: &str) -> Result<StartCorner, String> {
    match raw.to_ascii_lowercase().as_str() {
        "lt" => Ok(StartCorner::Lt),
        "rt" => Ok(StartCorner::Rt),
        "rb" => Ok(StartCorner::Rb),
        "lb" => Ok(StartCorner::Lb),
        other => Err(format!("unknown corner {other:?}, expected lt|rt|rb|lb")),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut cfg = match cli.config.as_ref() {
        Some(path) => ProfileConfig::load_json(path)?,
        None => ProfileConfig::default(),
    };
    if let Some(cht) = cli.cht.as_ref() {
        cfg.input_cht_file = cht.to_string_lossy().into_owned();
    }
    if let Some(illuminant) = cli.illuminant {
        cfg.calibration_illuminant = illuminant;
    }
    if let Some(dir) = cli.output_dir {
        cfg.output_directory = dir;
    }
    if let Some(image) = cli.image {
        cfg.output_image_file = image;
    }

    let mut wb = match cli.wb_file.as_ref() {
        Some(path) => WbCoefficients::load_json(path)?,
        None => WbCoefficients::default(),
    };
    if let Some(r) = cli.wb_red {
        wb.r = r;
    }
    if let Some(g) = cli.wb_green {
        wb.g = g;
    }
    if let Some(b) = cli.wb_blue {
        wb.b = b;
    }
    if !wb.is_identity() {
        info!("white balance: r={} g={} b={}", wb.r, wb.g, wb.b);
    }

    if cfg.input_cht_file.is_empty() {
        return Err("no chart file given (use -t or a config file)".into());
    }
    let chart = LoadedChart::open(&cfg.input_cht_file)?;
    println!(
        "chart: {} rows x {} columns ({} patches), grid {:.1} x {:.1}, {:?} reference values",
        chart.descriptor.rows,
        chart.descriptor.columns,
        chart.grid.len(),
        chart.descriptor.grid_width,
        chart.descriptor.grid_height,
        chart.descriptor.color_space,
    );

    let Some(frame_values) = cli.frame else {
        info!("no --frame given; nothing to generate");
        return Ok(());
    };
    let frame = frame_from_values(&frame_values)?;
    let marks = fiducial_marks(&frame, cli.start_corner, cli.proportion);
    let files = build_outputs(&cfg, &marks)?;
    files.write()?;
    println!("wrote {}", files.fiducial_marks_path);
    println!("wrote {}", files.script_path);
    Ok(())
}

fn frame_from_values(values: &[f32]) -> Result<Quad, Box<dyn Error>> {
    if values.len() != 8 {
        return Err("--frame needs exactly 8 numbers".into());
    }
    Ok(Quad::new(
        Point2::new(values[0], values[1]),
        Point2::new(values[2], values[3]),
        Point2::new(values[4], values[5]),
        Point2::new(values[6], values[7]),
    ))
}
