//! spice-to-sch CLI - convert a SPICE MOSFET subcircuit into an xschem schematic.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use spice_to_sch::{ConvertOptions, ConverterCore};
use tracing::Level;

#[derive(Parser)]
#[command(name = "spice-to-sch")]
#[command(about = "Convert SPICE transistor subcircuits into xschem schematics", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// SPICE netlist to read (defaults to stdin when piped)
    #[arg(short, long, value_name = "FILE")]
    input_file: Option<PathBuf>,

    /// Schematic file to write (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// JSON file overriding conversion options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xschem")]
    format: OutputFormat,

    /// Log classification details to stderr
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// xschem schematic
    Xschem,
    /// Classification report as JSON
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = match &cli.config {
        Some(path) => ConvertOptions::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConvertOptions::default(),
    };

    let text = read_input(cli.input_file.as_deref())?;
    let conversion = ConverterCore::convert(&text, &options)?;

    let output = match cli.format {
        OutputFormat::Xschem => conversion.schematic,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&serde_json::json!({
                "report": conversion.report,
                "stats": conversion.stats,
            }))?;
            json.push('\n');
            json
        }
    };

    write_output(cli.output_file.as_deref(), &output)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "No input provided. Use -i FILE or pipe data to stdin.",
            )
            .exit();
    }

    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes()).context("Failed to write stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
