// ABOUTME: Entry point for the cutover CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use cutover::config::{self, Config};
use cutover::deploy::{Completed, Deployment, Initialized};
use cutover::error::Result;
use cutover::hooks::HookRunner;
use cutover::notify::Notifier;
use cutover::platform::{ControlPlane, PlatformClient};
use cutover::types::AppName;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { name, force } => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            config::init_config(&cwd, name.as_deref(), force)
        }
        Commands::Deploy { tag } => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            let config = Config::discover(&cwd)?;
            deploy(config, &tag).await
        }
        Commands::Status => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            let config = Config::discover(&cwd)?;
            status(config).await
        }
    }
}

/// Run the full blue-green swap workflow.
async fn deploy(config: Config, tag: &str) -> Result<()> {
    println!("Deploying {} at revision {}", config.name, tag);

    let token = config.token.resolve()?;
    let platform = ControlPlane::new(&config.host, &token);
    let hooks = HookRunner::new(config.hooks.clone());
    let notifier = Notifier::new(config.apm.clone(), config.webhook.clone());

    let deployment = Deployment::new(config, tag);
    let deployment = run_deployment(deployment, &platform, &hooks, &notifier).await?;

    if deployment.swapped() {
        println!("  ✓ Traffic swapped to the new slot");
    } else {
        println!("  ✓ Nothing to swap (first deploy)");
    }

    Ok(())
}

/// Walk the deployment state machine from start to finish.
async fn run_deployment<P: PlatformClient>(
    deployment: Deployment<Initialized>,
    platform: &P,
    hooks: &HookRunner,
    notifier: &Notifier,
) -> Result<Deployment<Completed>> {
    println!("  → Running pre-deploy hook...");
    let deployment = deployment.run_before_hook(hooks).await?;

    println!("  → Resolving cnames...");
    let deployment = deployment.resolve_cnames(platform).await?;

    println!("  → Rebalancing units...");
    let deployment = deployment.rebalance_units(platform).await?;

    println!("  → Swapping cnames...");
    let deployment = deployment.swap_cnames(platform).await?;

    println!("  → Running post-swap hook...");
    let deployment = deployment.run_after_hook(hooks).await?;

    println!("  → Notifying endpoints...");
    Ok(deployment.notify(notifier).await)
}

/// Show which slot currently holds the cnames and each slot's topology.
async fn status(config: Config) -> Result<()> {
    let token = config.token.resolve()?;
    let platform = ControlPlane::new(&config.host, &token);

    for slot in [config.name.blue_slot(), config.name.green_slot()] {
        print_slot_status(&platform, &slot).await?;
    }

    Ok(())
}

async fn print_slot_status<P: PlatformClient>(platform: &P, slot: &AppName) -> Result<()> {
    let cnames = platform.get_cnames(slot).await?;
    let topology = platform.unit_topology(slot).await?;

    let role = if cnames.is_some() { "live" } else { "idle" };
    println!("{slot} ({role})");

    if let Some(cnames) = cnames {
        for cname in &cnames {
            println!("  cname: {cname}");
        }
    }

    if topology.is_empty() {
        println!("  units: none");
    } else {
        let mut processes: Vec<_> = topology.iter().collect();
        processes.sort();
        for (process, count) in processes {
            println!("  units: {process}={count}");
        }
    }

    Ok(())
}
