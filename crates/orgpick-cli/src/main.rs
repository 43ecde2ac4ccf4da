mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{components::ComponentsSubcommand, orgs::OrgsSubcommand, Env};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "orgpick",
    about = "List authenticated Salesforce orgs and pick the default one",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: walk up from cwd to sfdx-project.json)
    #[arg(long, global = true, env = "ORGPICK_ROOT")]
    root: Option<PathBuf>,

    /// Global Salesforce CLI directory (default: ~/.sfdx)
    #[arg(long, global = true, env = "SFDX_GLOBAL_DIR")]
    global_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List orgs, show the picker, and pick a default org
    Orgs {
        #[command(subcommand)]
        subcommand: OrgsSubcommand,
    },

    /// Show the default org indicator
    Status,

    /// Read metadata components cached for an org
    Components {
        #[command(subcommand)]
        subcommand: ComponentsSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = root::resolve_global_dir(cli.global_dir.as_deref()).and_then(|global_dir| {
        let env = Env {
            root: root::resolve_root(cli.root.as_deref()),
            global_dir,
            json: cli.json,
        };
        match cli.command {
            Commands::Orgs { subcommand } => cmd::orgs::run(&env, subcommand),
            Commands::Status => cmd::status::run(&env),
            Commands::Components { subcommand } => cmd::components::run(&env, subcommand),
        }
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
