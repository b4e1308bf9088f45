//! Satellite console - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Satellite console - mirrors log output into a filterable TUI
#[derive(Parser, Debug)]
#[command(name = "satcon")]
#[command(version)]
#[command(about = "Always-visible console that mirrors log output from other processes")]
pub struct Args {
    /// Path to a recorded message file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of stored entries (oldest are evicted first)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub capacity: Option<u64>,

    /// Print a demo message stream to stdout and exit
    #[arg(long)]
    pub demo: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let capacity = args.capacity.map(usize::try_from).transpose()?;
    let config = satcon::config::resolve(args.config.clone(), capacity)?;

    if args.demo {
        let mut stdout = std::io::stdout().lock();
        satcon::demo::write_demo(&mut stdout, &config.serialize_config())?;
        return Ok(());
    }

    satcon::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    // Detect input source (file or stdin)
    let input_source = satcon::source::detect_input_source(args.file.clone())?;
    let colors = satcon::view::ColorConfig::from_env_and_args(args.no_color);

    satcon::view::run_with_source(input_source, &config, colors)?;

    Ok(())
}
