use crate::cmd::Env;
use crate::output::{print_json, print_lines, print_table};
use anyhow::Context;
use clap::Subcommand;
use orgpick_core::{
    alias::AliasStore,
    config::WorkspaceContext,
    menu::{self, ActionExecutor, OrgAction, Selection},
    org_list::{self, OrgEntry},
    status::OrgStatusIndicator,
};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum OrgsSubcommand {
    /// List authenticated orgs
    List {
        /// Show scratch orgs of every Dev Hub, not just the default one
        #[arg(long)]
        all: bool,
        /// Show one column per attribute
        #[arg(long)]
        wide: bool,
    },

    /// Show the default org picker entries
    Menu,

    /// Act on a picker entry (omit to cancel)
    Select {
        /// Picker entry, exactly as printed by `orgs menu`
        choice: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(env: &Env, subcmd: OrgsSubcommand) -> anyhow::Result<()> {
    match subcmd {
        OrgsSubcommand::List { all, wide } => list(env, all, wide),
        OrgsSubcommand::Menu => show_menu(env),
        OrgsSubcommand::Select { choice } => select(env, choice.as_deref()),
    }
}

fn load_entries(env: &Env, all: bool) -> anyhow::Result<Option<Vec<OrgEntry>>> {
    let ctx = env.context();
    let aliases = env.aliases()?;
    let dev_hub = if all {
        None
    } else {
        ctx.default_dev_hub().context("failed to load sfdx config")?
    };
    Ok(org_list::update_org_list(
        ctx.global_dir(),
        dev_hub.as_deref(),
        &aliases,
        env.today(),
    ))
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(env: &Env, all: bool, wide: bool) -> anyhow::Result<()> {
    let entries = load_entries(env, all)?;

    if env.json {
        return print_json(&entries);
    }

    let Some(entries) = entries else {
        println!("No orgs found.");
        return Ok(());
    };

    if wide {
        let rows = entries
            .iter()
            .map(|e| {
                vec![
                    e.aliases.join(","),
                    e.username.clone(),
                    e.dev_hub_username.clone().unwrap_or_default(),
                    e.expiration_date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    if e.expired { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        print_table(&["ALIAS", "USERNAME", "DEV HUB", "EXPIRES", "EXPIRED"], rows);
    } else {
        print_lines(&org_list::labels(&entries));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// menu
// ---------------------------------------------------------------------------

fn show_menu(env: &Env) -> anyhow::Result<()> {
    let entries = load_entries(env, false)?;
    let items = menu::menu_items(entries.as_deref());
    if env.json {
        return print_json(&items);
    }
    print_lines(&items);
    Ok(())
}

// ---------------------------------------------------------------------------
// select
// ---------------------------------------------------------------------------

/// Sets the default org itself; every other action is handed back to the
/// caller as a command id to run.
struct CliExecutor<'a> {
    ctx: &'a WorkspaceContext,
    aliases: &'a AliasStore,
    json: bool,
}

impl ActionExecutor for CliExecutor<'_> {
    fn execute(&mut self, action: &OrgAction) -> orgpick_core::Result<()> {
        match action {
            OrgAction::SetDefault(org) => {
                self.ctx.set_default_org(org, self.aliases)?;
            }
            other if !self.json => println!("{}", other.command_id()),
            _ => {}
        }
        Ok(())
    }
}

fn select(env: &Env, choice: Option<&str>) -> anyhow::Result<()> {
    let ctx = env.context();
    let aliases = env.aliases()?;
    let indicator = OrgStatusIndicator::new(
        ctx.notifier(),
        &ctx.org_info(&aliases).context("failed to load sfdx config")?,
    );

    let entries = load_entries(env, false)?;

    let mut executor = CliExecutor {
        ctx: &ctx,
        aliases: &aliases,
        json: env.json,
    };
    let selection = menu::dispatch(choice, entries.as_deref(), &mut executor)
        .context("failed to run org action")?;

    if env.json {
        let command = match &selection {
            Selection::Continue(action) => Some(action.command_id()),
            Selection::Cancel => None,
        };
        let value = serde_json::json!({
            "selection": selection,
            "command": command,
            "status": indicator.text(),
        });
        return print_json(&value);
    }

    match selection {
        Selection::Cancel => println!("Cancelled."),
        Selection::Continue(OrgAction::SetDefault(_)) => {
            println!("Default org: {}", indicator.text())
        }
        Selection::Continue(_) => {}
    }
    Ok(())
}
