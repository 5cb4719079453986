use astro_logger::camera::{CommandCamera, ImageSink, NullCamera};
use astro_logger::config::Config;
use astro_logger::mission::{Mission, Services, SystemClock};
use astro_logger::orbit::{OrbitalPosition, PositionSource};
use astro_logger::sensors::{IioSensorBoard, SensorSource, SimulatedSensorBoard};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

const BANNER_TIME_FORMAT: &str = "%Y-%b-%d %Hh%Mm%Ss";

#[derive(Parser)]
#[command(name = "astro-logger")]
#[command(about = "Timed sensor logging and geotagged photography from orbit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a mission configuration file
    Validate {
        #[arg(short, long)]
        config: String,
    },
    /// Run a mission until its duration has elapsed
    Run {
        #[arg(short, long)]
        config: Option<String>,
        /// Use simulated sensors and skip the camera
        #[arg(long)]
        simulate: bool,
    },
    /// Print the current sub-point of the station
    Where {
        #[arg(short, long)]
        config: Option<String>,
        /// Instant to propagate to (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Run { config, simulate } => run(config.as_deref(), simulate),
        Commands::Where { config, at } => where_now(config.as_deref(), at),
    }
}

fn load_config(path: Option<&str>) -> Result<Config, ExitCode> {
    let result = match path {
        Some(path) => Config::from_file(path),
        None => {
            let config = Config::default();
            config.validate().map(|_| config)
        }
    };
    result.map_err(|e| {
        eprintln!("Configuration error: {}", e);
        ExitCode::FAILURE
    })
}

fn load_position(config: &Config) -> Result<OrbitalPosition, ExitCode> {
    OrbitalPosition::load(
        config.orbit.tle.as_deref(),
        config.orbit.satellite.as_deref(),
    )
    .map_err(|e| {
        eprintln!("Orbit error: {}", e);
        ExitCode::FAILURE
    })
}

fn validate(path: &str) -> ExitCode {
    let config = match load_config(Some(path)) {
        Ok(c) => c,
        Err(code) => return code,
    };

    println!("Configuration is valid");
    println!("  team:            {} (images {}_NNNN.jpg)", config.team, config.photo_prefix);
    println!("  output root:     {}", config.output_root.display());
    println!(
        "  duration:        {}",
        humantime::format_duration(config.mission.duration)
    );
    println!(
        "  loop interval:   {}",
        humantime::format_duration(config.mission.loop_interval)
    );
    println!(
        "  photo delay:     {} ({})",
        humantime::format_duration(config.mission.photo_delay),
        config.mission.capture_gate
    );
    println!(
        "  elements:        {}",
        config
            .orbit
            .tle
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in ISS".to_string())
    );
    ExitCode::SUCCESS
}

fn run(path: Option<&str>, simulate: bool) -> ExitCode {
    let config = match load_config(path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let position = match load_position(&config) {
        Ok(p) => p,
        Err(code) => return code,
    };
    position.check_epoch(Utc::now());

    if simulate {
        let services = Services {
            sensors: SimulatedSensorBoard::new(),
            camera: NullCamera::new(),
            position,
        };
        let services = match run_mission(&config, services) {
            Ok(s) => s,
            Err(code) => return code,
        };
        println!(
            "- Simulated photos:           {}",
            services.camera.captures().len()
        );
        if let Some(tag) = services.camera.geotag() {
            println!(
                "- Last geotag:                {} {}, {} {}",
                tag.latitude, tag.latitude_ref, tag.longitude, tag.longitude_ref
            );
        }
        println!("Mission accomplished - Team {}", config.team);
        return ExitCode::SUCCESS;
    }

    let sensors = match IioSensorBoard::open(&config.sensors) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Sensor board error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let services = Services {
        sensors,
        camera: CommandCamera::new(config.camera.clone()),
        position,
    };
    match run_mission(&config, services) {
        Ok(_) => {
            println!("Mission accomplished - Team {}", config.team);
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_mission<S, I, P>(
    config: &Config,
    services: Services<S, I, P>,
) -> Result<Services<S, I, P>, ExitCode>
where
    S: SensorSource,
    I: ImageSink,
    P: PositionSource,
{
    let mut mission = Mission::new(config, services, SystemClock);
    let started = Utc::now().format(BANNER_TIME_FORMAT);

    println!("{} Mission Space Lab", config.team);
    println!("- Systems checked at:         {}", started);
    println!("- Data collection started at: {}", started);
    println!("- Collecting data .................................");

    match mission.run() {
        Ok(summary) => {
            print!("- Progress:                   {}", mission.final_progress());
            println!("{}", summary);
            Ok(mission.into_services())
        }
        Err(e) => {
            eprintln!("Mission setup failed: {}", e);
            Err(ExitCode::FAILURE)
        }
    }
}

fn where_now(path: Option<&str>, at: Option<DateTime<Utc>>) -> ExitCode {
    let config = match load_config(path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let mut position = match load_position(&config) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let at = at.unwrap_or_else(Utc::now);
    position.check_epoch(at);

    match position.position_at(at) {
        Ok(sample) => {
            println!(
                "{} (NORAD {}) at {}",
                position.info().name,
                position.info().norad_id,
                at
            );
            match serde_yaml::to_string(&sample) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => eprintln!("Cannot format sample: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Propagation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
