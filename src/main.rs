//! nav-diagram CLI
//!
//! Usage:
//!   nav-diagram [OPTIONS] <INPUT>
//!
//! Options:
//!   -o, --output <BASE>      Output path without extension (default: input path without extension)
//!   -c, --config <FILE>      Layout and SVG configuration (TOML format)
//!   -s, --stylesheet <FILE>  Stylesheet file for box colors (TOML format)
//!       --engine <PATH>      Graphviz executable
//!       --timeout <SECS>     Layout engine timeout
//!       --log-level <LEVEL>  off, error, warn, info, debug, trace
//!   -h, --help               Print help

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, info, LevelFilter};

use nav_diagram::{load_model, render_model, GraphvizEngine, RenderConfig, Stylesheet};

#[derive(Parser, Debug)]
#[command(name = "nav-diagram", version)]
#[command(about = "Render UWE navigation models to SVG")]
struct Cli {
    /// Navigation model (YAML)
    input: PathBuf,

    /// Output path without extension; `.svg` is appended
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Layout and SVG configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet file for box colors (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Graphviz executable, overriding the configuration
    #[arg(long)]
    engine: Option<String>,

    /// Layout engine timeout in seconds, overriding the configuration
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(cli:?; "Parsed arguments");

    if let Err(message) = run(&cli) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)
            .map_err(|e| format!("Error loading config '{}': {}", path.display(), e))?,
        None => RenderConfig::default(),
    };

    if let Some(path) = &cli.stylesheet {
        let stylesheet = Stylesheet::from_file(path)
            .map_err(|e| format!("Error loading stylesheet '{}': {}", path.display(), e))?;
        config = config.with_stylesheet(stylesheet);
    }
    if let Some(engine) = &cli.engine {
        config.layout.engine_command = engine.clone();
    }
    if let Some(secs) = cli.timeout {
        config.layout.engine_timeout_ms = secs.saturating_mul(1000);
    }

    let source = fs::read_to_string(&cli.input)
        .map_err(|e| format!("Error reading '{}': {}", cli.input.display(), e))?;
    let filename = cli.input.display().to_string();
    let model = load_model(&source).map_err(|e| e.format(&source, &filename))?;

    let engine = GraphvizEngine::from_config(&config.layout);
    let rendered =
        render_model(&model, &config, &engine).map_err(|e| format!("Error: {}", e))?;

    for warning in &rendered.warnings {
        eprintln!("Warning: {}", warning);
    }

    let output = output_path(&cli.input, cli.output.as_deref());
    fs::write(&output, &rendered.svg)
        .map_err(|e| format!("Error writing '{}': {}", output.display(), e))?;

    info!("Wrote diagram to {}", output.display());
    println!("Generated: {}", output.display());
    Ok(())
}

/// `<base>.svg`, where the base defaults to the input path without its extension
fn output_path(input: &Path, base: Option<&Path>) -> PathBuf {
    let base = base.map_or_else(|| input.with_extension(""), Path::to_path_buf);
    let mut name = base.into_os_string();
    name.push(".svg");
    PathBuf::from(name)
}
