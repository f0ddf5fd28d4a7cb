//! Dashboard CLI.
//!
//! Renders frames and legends, inspects per-cell time series, drives a
//! session from stdin, and prepares datasets (mock generation, coarsening).

mod interactive;
mod prepare;
mod view;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use met_common::{DataType, Variable};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use grid_processor::DownsampleMethod;
use viewer::{DataLoader, Session, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Observed vs forecast grid viewer")]
struct Cli {
    /// Viewer configuration file (YAML)
    #[arg(short, long, global = true, env = "METVIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame to PNG
    Render {
        /// Dataset path or URL (overrides config)
        #[arg(long)]
        data: Option<String>,

        /// Boundary GeoJSON path or URL (overrides config)
        #[arg(long)]
        boundary: Option<String>,

        #[arg(long, default_value = "obs")]
        data_type: DataType,

        #[arg(long, default_value = "tmax")]
        variable: Variable,

        #[arg(long, default_value = "0")]
        day: usize,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Also write the legend bar to this PNG path
        #[arg(long)]
        legend: Option<PathBuf>,
    },

    /// Print the time series at a pixel or grid cell as JSON
    Inspect {
        #[arg(long)]
        data: Option<String>,

        #[arg(long, default_value = "tmax")]
        variable: Variable,

        /// Canvas x in pixels
        #[arg(long, requires = "y", conflicts_with_all = ["row", "col"])]
        x: Option<f64>,

        /// Canvas y in pixels
        #[arg(long, requires = "x")]
        y: Option<f64>,

        #[arg(long, requires = "col")]
        row: Option<usize>,

        #[arg(long, requires = "row")]
        col: Option<usize>,
    },

    /// Read control commands from stdin, one per line
    Interactive {
        #[arg(long)]
        data: Option<String>,

        #[arg(long)]
        boundary: Option<String>,
    },

    /// Generate a synthetic dataset
    GenerateMock {
        #[arg(long, default_value = "public/data")]
        out_dir: PathBuf,

        #[arg(long, default_value = "7")]
        days: usize,

        /// Grid spacing in degrees
        #[arg(long, default_value = "0.36")]
        resolution: f64,

        #[arg(long, default_value = "42")]
        seed: u64,

        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Mask cells outside this boundary and export it alongside
        #[arg(long)]
        boundary: Option<String>,
    },

    /// Coarsen an existing dataset and export it
    Prepare {
        #[arg(short, long)]
        input: String,

        #[arg(short, long, default_value = "4")]
        factor: usize,

        #[arg(long, default_value = "mean")]
        method: DownsampleMethod,

        #[arg(short, long)]
        out: PathBuf,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Defaults, then the YAML file, then `METVIZ_*` variables.
fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    let mut config = match path {
        Some(path) => ViewerConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

/// Apply CLI source overrides, then load a session.
async fn open_session(
    mut config: ViewerConfig,
    data: Option<String>,
    boundary: Option<String>,
) -> Result<Session> {
    if let Some(data) = data {
        config.data_source = data;
    }
    if boundary.is_some() {
        config.boundary_source = boundary;
    }
    let source = config.data_source.clone();
    let mut session = Session::new(config).context("Invalid viewer configuration")?;
    session
        .load(&DataLoader::new())
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))?;
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let config = load_config(cli.config.as_ref())?;
    info!(data = %config.data_source, "Starting dashboard");

    match cli.command {
        Command::Render {
            data,
            boundary,
            data_type,
            variable,
            day,
            out,
            legend,
        } => {
            let mut session = open_session(config, data, boundary).await?;
            view::render(&mut session, data_type, variable, day, &out, legend.as_deref())
        }
        Command::Inspect {
            data,
            variable,
            x,
            y,
            row,
            col,
        } => {
            let mut session = open_session(config, data, None).await?;
            let target = match (x.zip(y), row.zip(col)) {
                (Some((x, y)), _) => view::Target::Pixel { x, y },
                (None, Some((row, col))) => view::Target::Cell { row, col },
                (None, None) => anyhow::bail!("inspect needs --x/--y or --row/--col"),
            };
            view::inspect(&mut session, variable, target)
        }
        Command::Interactive { data, boundary } => {
            let mut session = open_session(config, data, boundary).await?;
            interactive::run(&mut session).await
        }
        Command::GenerateMock {
            out_dir,
            days,
            resolution,
            seed,
            start,
            boundary,
        } => {
            prepare::generate(&out_dir, days, resolution, seed, start, boundary.as_deref()).await
        }
        Command::Prepare {
            input,
            factor,
            method,
            out,
        } => prepare::coarsen(&input, factor, method, &out).await,
    }
}
