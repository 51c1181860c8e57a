//! Command-line access checks for aclgate
//!
//! Runs one check, permissions query or document lookup against a local
//! filesystem store described by a TOML configuration file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    check::{self, CheckArgs},
    common,
    locate::{self, LocateArgs},
    permissions::{self, PermissionsArgs},
};

#[derive(Parser)]
#[command(name = "aclgate")]
#[command(about = "Resolve control documents and check access on a local store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "aclgate.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an agent may perform a mode on a resource
    Check(CheckArgs),

    /// List the modes an agent and the public hold on a resource
    Permissions(PermissionsArgs),

    /// Show the control document that governs a resource
    Locate(LocateArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let checker = common::load_checker(&cli.config)?;

    let code = match cli.command {
        Commands::Check(args) => check::run(&checker, args).await?,
        Commands::Permissions(args) => permissions::run(&checker, args).await?,
        Commands::Locate(args) => locate::run(&checker, args).await?,
    };
    Ok(code)
}
