use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use docopt_merge_core::{ArgMap, audit, binding_key, bind_with};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod manifest;

use config::Config;
use error::{CliError, Result};
use manifest::Manifest;

#[derive(Debug, Parser)]
#[command(name = "docopt-merge")]
#[command(about = "Bind docopt parse results into records declared by a field manifest")]
struct Cli {
    /// Log every bound field to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bind a parse result into the manifest's record and print it as JSON.
    Bind(InputArgs),
    /// Report every contract violation between the manifest and a parse result.
    Audit(InputArgs),
    /// Print each manifest field with its kind and resolved binding key.
    Keys(ManifestArgs),
}

#[derive(Debug, Args)]
struct ManifestArgs {
    /// YAML field manifest.
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// YAML field manifest.
    #[arg(long)]
    manifest: PathBuf,
    /// JSON parse result (`-` or omitted reads stdin).
    #[arg(long)]
    args: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let result = Config::load_optional(cli.config.as_deref()).and_then(|config| {
        init_tracing(cli.verbose, config.log.as_deref());
        match cli.command {
            Command::Bind(args) => run_bind(args, &config),
            Command::Audit(args) => run_audit(args),
            Command::Keys(args) => run_keys(args),
        }
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: bool, configured: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("warn")))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_bind(args: InputArgs, config: &Config) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let (schema, mut record) = manifest.build()?;
    let parsed = read_args(args.args.as_deref())?;

    debug!(fields = schema.len(), keys = parsed.len(), "Binding parse result");
    bind_with(&schema, &mut record, &parsed, &config.bind)?;

    let rendered =
        serde_json::to_string_pretty(&record.to_json()).map_err(CliError::Render)?;
    println!("{rendered}");
    Ok(())
}

fn run_audit(args: InputArgs) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let (schema, _) = manifest.build()?;
    let parsed = read_args(args.args.as_deref())?;

    let violations = audit(&schema, &parsed);
    if violations.is_empty() {
        println!("No contract violations in {} field(s).", schema.len());
        return Ok(());
    }
    for violation in &violations {
        println!("{violation}");
    }
    Err(CliError::Violations(violations.len()))
}

fn run_keys(args: ManifestArgs) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let (schema, _) = manifest.build()?;

    for field in schema.fields() {
        println!(
            "{}\t{}\t{}",
            field.name(),
            field.kind(),
            binding_key(field).unwrap_or("-")
        );
    }
    Ok(())
}

/// Reads the parse result from `path`, or from stdin for `-` or `None`.
fn read_args(path: Option<&Path>) -> Result<ArgMap> {
    let raw = match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|source| CliError::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            raw
        }
    };
    Ok(serde_json::from_str(&raw)?)
}
