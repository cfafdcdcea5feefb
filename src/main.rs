use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lxd_driver::cmds;
use lxd_driver::config::Config;
use lxd_driver::environment::Environment;
use lxd_driver::lxd::{LxdDriver, LxdDryRunTransport, LxdHttpTransport, LxdTransport};
use std::io::stdout;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Manages containers on an LXD daemon
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Runs application in a simulated safe-mode: containers are read from
    /// LXD, but no changes are sent to it
    #[arg(short, long)]
    dry_run: bool,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lists all containers
    Containers,

    /// Lists all installed images
    Images,

    /// Shows a single container
    Show { name: String },

    /// Creates an empty container
    Create { name: String },

    /// Starts a container
    Start { name: String },

    /// Stops a container
    Stop { name: String },

    /// Restarts a container
    Restart { name: String },

    /// Runs any state action (stop, start, restart, freeze or unfreeze)
    Action { name: String, action: String },

    /// Deletes a container
    Delete { name: String },

    /// Adds a trusted client certificate
    Trust {
        certificate: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,
    },

    /// Prints API and server version
    Version,
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let mut lxd = init_lxd(&config, args.dry_run)?;
    let mut stdout = stdout();
    let env = &mut Environment::new(&mut stdout, &mut lxd);

    match args.cmd {
        Command::Containers => cmds::containers(env),
        Command::Images => cmds::images(env),
        Command::Show { name } => cmds::show(env, &name),
        Command::Create { name } => cmds::create(env, &name),
        Command::Start { name } => cmds::change_state(env, &name, "start"),
        Command::Stop { name } => cmds::change_state(env, &name, "stop"),
        Command::Restart { name } => cmds::change_state(env, &name, "restart"),
        Command::Action { name, action } => cmds::change_state(env, &name, &action),
        Command::Delete { name } => cmds::delete(env, &name),
        Command::Trust {
            certificate,
            name,
            password,
        } => cmds::trust(env, &read_certificate(&certificate)?, &name, &password),
        Command::Version => cmds::version(env),
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_lxd(config: &Config, dry_run: bool) -> Result<LxdDriver> {
    let builder = config.driver_builder();

    let lxd = if dry_run {
        println!(
            "{} --dry-run is active, no changes will be applied\n",
            "Note:".green(),
        );

        builder.build_with(|config| {
            let transport: Box<dyn LxdTransport> =
                Box::new(LxdDryRunTransport::new(LxdHttpTransport::new(config)?));

            Ok(transport)
        })
    } else {
        builder.build()
    };

    lxd.context("Couldn't initialize LXD driver")
}

/// Accepts either a path to a PEM file or the certificate itself.
fn read_certificate(certificate: &str) -> Result<String> {
    let path = Path::new(certificate);

    if !path.is_file() {
        return Ok(certificate.to_string());
    }

    let pem = std::fs::read_to_string(path)
        .with_context(|| format!("Couldn't read certificate: {}", path.display()))?;

    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();

    Ok(body)
}
