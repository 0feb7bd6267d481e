use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use ground_track::config::{RunConfig, RunOverrides};
use ground_track::elements::load_elements;
use ground_track::output::{
    line_path, satellite_path, save_element_source, GeoJsonSaver, TrackSaver, STDOUT,
};
use ground_track::{ElementSet, OrbitalEngine};

#[derive(Parser)]
#[command(name = "ground-track")]
#[command(about = "Satellite ground tracks from TLE/OMM elements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run configuration and its element file
    Validate { config: PathBuf },
    /// Compute ground tracks for every satellite in an element file
    Track(TrackArgs),
}

#[derive(Args)]
struct TrackArgs {
    /// YAML run configuration; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Window start (RFC3339)
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    /// Window length, e.g. 24h or 90m
    #[arg(long)]
    duration: Option<String>,
    #[arg(long)]
    step_minutes: Option<f64>,
    /// TLE text or OMM JSON file
    #[arg(short, long)]
    elements: Option<PathBuf>,
    /// GeoJSON points output path; standard output when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Skip the line output
    #[arg(long)]
    no_line: bool,
    /// Save the elements next to the output
    #[arg(long)]
    save_elements: bool,
}

impl TrackArgs {
    fn overrides(self) -> (Option<PathBuf>, RunOverrides) {
        let overrides = RunOverrides {
            start: self.start,
            duration: self.duration,
            step_minutes: self.step_minutes,
            elements: self.elements,
            output: self.output,
            no_line: self.no_line,
            save_elements: self.save_elements,
        };
        (self.config, overrides)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Track(args) => {
            let (config_path, overrides) = args.overrides();
            let mut config = match config_path {
                Some(path) => match RunConfig::from_file(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        log::error!("Failed to read {}: {}", path.display(), e);
                        return ExitCode::FAILURE;
                    }
                },
                None => RunConfig::default(),
            };
            config.apply(overrides);
            track(&config)
        }
    }
}

fn validate(path: &Path) -> ExitCode {
    let config = match RunConfig::from_file(path).and_then(|c| c.validate().map(|_| c)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Ok(elements_path) = config.elements_path() else {
        return ExitCode::FAILURE;
    };
    match load_elements(elements_path) {
        Ok(sets) => {
            println!("Configuration is valid ({} satellites)", sets.len());
            for set in &sets {
                println!(
                    "  {} ({}): epoch {}, period {:.1} min",
                    set.name(),
                    set.format(),
                    set.epoch(),
                    set.period_minutes()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Element file error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn track(config: &RunConfig) -> ExitCode {
    // window errors are the same for every satellite, so fail before loading
    let (duration_hours, elements_path) = match config
        .validate()
        .and_then(|_| Ok((config.duration_hours()?, config.elements_path()?)))
    {
        Ok(checked) => checked,
        Err(e) => {
            log::error!("Invalid run configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let engine = OrbitalEngine::new(config.engine);
    let start = config.start_or_today();

    let sets = match load_elements(elements_path) {
        Ok(sets) => sets,
        Err(e) => {
            log::error!("Failed to load {}: {}", elements_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut saver = GeoJsonSaver::new(config.output.is_some());

    let mut completed = 0;
    for set in &sets {
        let target = target_path(config.output.as_deref(), set, sets.len() > 1);
        match track_one(&engine, &mut saver, config, set, start, duration_hours, &target) {
            Ok(points) => {
                completed += 1;
                log::info!("{}: {} points -> {}", set.name(), points, target.display());
            }
            Err(e) => log::error!("{}: {}", set.name(), e),
        }
    }

    log::info!("Computed {} of {} tracks", completed, sets.len());
    if completed == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn track_one(
    engine: &OrbitalEngine,
    saver: &mut dyn TrackSaver,
    config: &RunConfig,
    set: &ElementSet,
    start: DateTime<Utc>,
    duration_hours: f64,
    target: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let (points, line) = engine.compute_track(set, start, duration_hours, config.step_minutes)?;
    saver.save_points(&points, target)?;
    if config.create_line {
        saver.save_lines(&line, &line_path(target))?;
    }
    if config.save_elements && config.output.is_some() {
        save_element_source(set, target)?;
    }
    Ok(points.len())
}

/// Per-satellite output path. Several satellites in one file get their NORAD
/// id and epoch in the file name; no output path means standard output.
fn target_path(output: Option<&Path>, set: &ElementSet, many: bool) -> PathBuf {
    match output {
        Some(path) if many => satellite_path(path, set),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(STDOUT),
    }
}
