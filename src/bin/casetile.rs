use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use casetile::config::ConfigFile;
use casetile::svg::render_tiling_svg;
use casetile::{check_dimensions, plan};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Svg,
}

#[derive(Parser)]
#[command(name = "casetile")]
#[command(about = "Compute the case and LED module layout of a screen")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Screen width in millimeters
    #[arg(long)]
    width: i64,

    /// Screen height in millimeters
    #[arg(long)]
    height: i64,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Panel type id for a consumption estimate
    #[arg(short, long)]
    panel: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_cli_logger(verbose: bool) {
    let default = if verbose { "casetile=debug" } else { "casetile=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_cli_logger(args.verbose);

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let config = file.tiling_config()?;

    let screen = check_dimensions(args.width, args.height)?;
    let mut result = plan(&config, screen.width, screen.height)?;

    if let Some(id) = &args.panel {
        let panel = file.panel(id)?;
        tracing::debug!(panel = %panel.name, watt_per_m2 = panel.watt_per_m2, "estimating consumption");
        result = result.with_consumption(panel.watt_per_m2);
    }

    if !result.valid {
        tracing::warn!(
            warning = result.warning.as_deref().unwrap_or_default(),
            "layout is invalid"
        );
    }
    tracing::info!(
        orientation = ?result.orientation,
        status = ?result.status,
        cells = result.cells.len(),
        total_modules = result.total_modules,
        "computed layout"
    );

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Svg => print!("{}", render_tiling_svg(&result)),
    }
    Ok(())
}
