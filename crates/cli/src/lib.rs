mod context;
mod engine;
mod reactor;

use clap::{Args, Parser, Subcommand};
use embark_core::context::LoggingLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "embark",
    version,
    about = "Resolve build settings and reactor artifacts for an embedded build",
    long_about = "Embark merges global settings, user settings and command line overrides into one \
                  execution context, and resolves artifacts from the modules of the current reactor \
                  before any repository is consulted."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective execution context as JSON
    #[command(
        long_about = "Builds the execution context exactly as a build session would see it and prints \
                            it as JSON. Nothing is built; the local repository directory is created."
    )]
    Context(ContextArgs),
    /// Resolve artifacts against a set of reactor modules
    #[command(
        long_about = "Loads module descriptors from a JSON array, registers them with a fresh reactor \
                            and answers one artifact or version lookup."
    )]
    Reactor(ReactorArgs),
    /// Print the version of an engine installation as JSON
    Engine(EngineArgs),
}

#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Root project descriptor
    #[arg(long, value_name = "FILE")]
    pub pom: Option<PathBuf>,

    /// Global settings file
    #[arg(long, value_name = "FILE")]
    pub global_settings: Option<PathBuf>,

    /// User settings file (defaults to ~/.m2/settings.json)
    #[arg(long, value_name = "FILE")]
    pub user_settings: Option<PathBuf>,

    /// Local repository directory, overriding settings
    #[arg(long, value_name = "DIR")]
    pub local_repo: Option<PathBuf>,

    /// Engine installation directory
    #[arg(long, value_name = "DIR")]
    pub engine_home: Option<PathBuf>,

    /// User property; a bare key is set to "true"
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
    pub define: Vec<(String, String)>,

    /// Profiles to activate; prefix with '!' or '-' to deactivate
    #[arg(short = 'P', value_name = "ID", value_delimiter = ',', allow_hyphen_values = true)]
    pub profiles: Vec<String>,

    /// Work offline
    #[arg(short = 'o', long)]
    pub offline: bool,

    /// Logging threshold: debug, info, warn, error, fatal, disabled or 0-5
    #[arg(long, default_value = "info")]
    pub log_level: LoggingLevel,
}

#[derive(Args, Debug)]
pub struct ReactorArgs {
    /// JSON array of module descriptors
    #[arg(value_name = "DESCRIPTORS")]
    pub descriptors: PathBuf,

    /// Exact lookup: group:artifact[:extension[:classifier]]:version
    #[arg(long, value_name = "COORDINATE", conflicts_with = "versions", required_unless_present = "versions")]
    pub find: Option<String>,

    /// Version lookup: group:artifact[:extension[:classifier]]
    #[arg(long, value_name = "COORDINATE")]
    pub versions: Option<String>,
}

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Engine installation directory
    #[arg(value_name = "DIR")]
    pub home: PathBuf,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, "true"));
    if key.trim().is_empty() {
        return Err(format!("property '{}' has no name", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Context(args) => args.log_level,
        Commands::Reactor(_) | Commands::Engine(_) => LoggingLevel::Info,
    };
    let _guard = embark_runtime::init_logging("cli", level, false);

    match cli.command {
        Commands::Context(args) => context::run(args),
        Commands::Reactor(args) => reactor::run(args),
        Commands::Engine(args) => engine::run(args),
    }
}
