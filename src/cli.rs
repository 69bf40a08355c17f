// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cutover")]
#[command(about = "Blue-green cname-swap deployment for PaaS applications")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cutover.yml configuration file
    Init {
        /// Application name to write into the template
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Swap traffic to the idle slot and rebalance units
    Deploy {
        /// Revision tag being deployed
        #[arg(short, long)]
        tag: String,
    },

    /// Show which slot is live and each slot's unit topology
    Status,
}
