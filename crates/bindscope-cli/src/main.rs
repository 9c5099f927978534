use anyhow::Result;
use bindscope::{run_analyze, run_symbols, AnalyzeOptions};
use bindscope_core::format::Format;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bindscope")]
#[command(about = "Resolve the public interface of a module for binding generators", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a module and emit its binding model
    Analyze {
        /// Module description (JSON or YAML)
        #[arg(short, long)]
        module: PathBuf,

        /// Documentation tree (JSON or YAML)
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Analysis configuration (TOML)
        #[arg(short, long, env = "BINDSCOPE_CONFIG")]
        config: Option<PathBuf>,

        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include the analysis trace in the output
        #[arg(long)]
        trace: bool,
    },

    /// List the exported symbols of a module
    Symbols {
        /// Module description (JSON or YAML)
        #[arg(short, long)]
        module: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // RUST_LOG overrides the flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // stdout carries the rendered model
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            module,
            docs,
            config,
            format,
            output,
            trace,
        } => {
            let opts = AnalyzeOptions {
                module,
                docs,
                config,
                format: Format::from_name(&format)?,
                trace,
            };
            let rendered = run_analyze(&opts)?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    info!("Wrote model to {:?}", path);
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }
        Commands::Symbols { module } => {
            print!("{}", run_symbols(&module)?);
            Ok(())
        }
    }
}
