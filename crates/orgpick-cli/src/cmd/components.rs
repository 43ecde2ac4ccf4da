use crate::cmd::Env;
use crate::output::{print_json, print_lines};
use anyhow::Context;
use clap::Subcommand;
use orgpick_core::{metadata, OrgError};

#[derive(Subcommand)]
pub enum ComponentsSubcommand {
    /// List cached components of a metadata type
    List {
        /// Metadata type, e.g. ApexClass or CustomObject
        metadata_type: String,
        /// Folder (for folder-based types) or object name (for CustomObject fields)
        #[arg(long)]
        folder: Option<String>,
        /// Org username or alias (default: the project's default org)
        #[arg(long)]
        org: Option<String>,
    },
}

pub fn run(env: &Env, subcmd: ComponentsSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ComponentsSubcommand::List {
            metadata_type,
            folder,
            org,
        } => list(env, &metadata_type, folder.as_deref(), org),
    }
}

fn list(
    env: &Env,
    metadata_type: &str,
    folder: Option<&str>,
    org: Option<String>,
) -> anyhow::Result<()> {
    // Fail on a missing project before reading anything else
    let ctx = env.context();
    ctx.root()?;

    let org = match org {
        Some(org) => org,
        None => ctx
            .config()
            .context("failed to load sfdx config")?
            .defaultusername
            .ok_or(OrgError::NoDefaultOrg)?,
    };
    let aliases = env.aliases()?;

    let components =
        metadata::load_components(env.root.as_deref(), &org, metadata_type, folder, &aliases)
            .with_context(|| format!("failed to load {metadata_type} components"))?;

    if env.json {
        return print_json(&components);
    }
    print_lines(&components);
    Ok(())
}
