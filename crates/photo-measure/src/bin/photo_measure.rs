use clap::{Args, Parser, Subcommand};
use photo_measure::core::{
    calibrate_scale, CalibrationInput, LengthUnit, Point2D, Polygon, ScaleCalibration,
    VolumeEstimate, VolumeParams, DEFAULT_DENSITY_T_PER_M3,
};
use photo_measure::{
    run_area, run_job, run_volume, AreaJob, AreaReport, JobReport, MeasurementJob, PipelineError,
    VolumeJob,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "photo-measure",
    version,
    about = "Estimate lengths, areas and volumes from a single photo"
)]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the metric size of one pixel from a reference segment.
    Scale(CalibrationArgs),
    /// Measure the real area of a polygon.
    Area {
        #[command(flatten)]
        calibration: CalibrationArgs,
        /// Polygon vertices as space-separated `X,Y` pixel pairs (at least
        /// three), e.g. `--polygon "-5,3 25,5 25,15"`.
        #[arg(long, value_parser = parse_polygon, allow_hyphen_values = true)]
        polygon: Polygon,
    },
    /// Estimate volume and mass of a pile from a depth image.
    Volume {
        /// Depth image written by the depth model.
        #[arg(long)]
        depth: PathBuf,
        /// Treat dark pixels as high.
        #[arg(long)]
        invert_depth: bool,
        /// Outline of the pile base as space-separated `X,Y` pixel pairs.
        #[arg(long, value_parser = parse_polygon, allow_hyphen_values = true)]
        polygon: Polygon,
        /// Real height of the highest point of the pile, in meters.
        #[arg(long)]
        h_real_max: f64,
        /// Ground-sample distance over the pile, in meters per pixel.
        #[arg(long)]
        pixel_scale: f64,
        /// Bulk density in t/m^3.
        #[arg(long, default_value_t = DEFAULT_DENSITY_T_PER_M3)]
        density: f64,
    },
    /// Run the measurements described in a JSON job file.
    Run {
        #[arg(long)]
        job: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CalibrationArgs {
    /// First end of the reference segment, `X,Y` in pixels.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    p1: Point2D,
    /// Second end of the reference segment, `X,Y` in pixels.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    p2: Point2D,
    /// Real length of the reference segment.
    #[arg(long)]
    length: f64,
    /// Unit of `--length`: mm, cm or m.
    #[arg(long)]
    unit: LengthUnit,
}

impl CalibrationArgs {
    fn to_input(&self) -> CalibrationInput {
        CalibrationInput {
            p1: self.p1,
            p2: self.p2,
            reference_length: self.length,
            unit: self.unit,
        }
    }
}

fn parse_point(s: &str) -> Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(Point2D::new(x, y))
}

fn parse_polygon(s: &str) -> Result<Polygon, String> {
    let vertices = s
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()?;
    Polygon::new(vertices).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    #[cfg(feature = "tracing")]
    photo_measure::init_tracing(cli.verbose, cli.json);
    #[cfg(not(feature = "tracing"))]
    photo_measure::init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    match &cli.command {
        Command::Scale(args) => {
            let scale = calibrate_scale(args.p1, args.p2, args.length, args.unit)?;
            emit(cli.json, &scale, print_scale)
        }
        Command::Area {
            calibration,
            polygon,
        } => {
            let job = AreaJob {
                calibration: calibration.to_input(),
                polygon: polygon.clone(),
            };
            let report = run_area(&job)?;
            emit(cli.json, &report, print_area)
        }
        Command::Volume {
            depth,
            invert_depth,
            polygon,
            h_real_max,
            pixel_scale,
            density,
        } => {
            let job = VolumeJob {
                depth_image: depth.clone(),
                invert_depth: *invert_depth,
                polygon: polygon.clone(),
                h_real_max: *h_real_max,
                params: VolumeParams::new(*pixel_scale).with_density(*density),
            };
            let estimate = run_volume(&job)?;
            emit(cli.json, &estimate, print_volume)
        }
        Command::Run { job } => {
            let job = MeasurementJob::from_json_file(job)?;
            log::info!(
                "job: area={}, volume={}",
                job.area.is_some(),
                job.volume.is_some()
            );
            let report = run_job(&job)?;
            emit(cli.json, &report, print_job)
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: fn(&T)) -> Result<(), PipelineError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_scale(scale: &ScaleCalibration) {
    println!("pixel distance: {:.2} px", scale.pixel_distance());
    println!(
        "scale: {:.6} m/px (1 px = {:.5} {})",
        scale.meters_per_pixel(),
        scale.units_per_pixel(),
        scale.unit()
    );
}

fn print_area(report: &AreaReport) {
    print_scale(&report.scale);
    println!("area: {:.2} px^2", report.measurement.area_px2);
    println!("real area: {:.4} m^2", report.measurement.area_m2);
}

fn print_volume(est: &VolumeEstimate) {
    println!("base area: {:.2} m^2", est.base_area_m2);
    println!("max height: {:.2} m", est.max_height_m);
    println!("mean height: {:.2} m", est.mean_height_m);
    println!("volume: {:.2} m^3", est.volume_m3);
    println!(
        "mass (density {:.2} t/m^3): {:.2} t",
        est.density, est.mass_t
    );
}

fn print_job(report: &JobReport) {
    if let Some(area) = &report.area {
        print_area(area);
    }
    if let Some(volume) = &report.volume {
        print_volume(volume);
    }
}
