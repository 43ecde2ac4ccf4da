pub mod components;
pub mod orgs;
pub mod status;

use anyhow::Context;
use chrono::NaiveDate;
use orgpick_core::{alias::AliasStore, config::WorkspaceContext};
use std::path::PathBuf;

/// Locations and flags shared by every subcommand.
pub struct Env {
    pub root: Option<PathBuf>,
    pub global_dir: PathBuf,
    pub json: bool,
}

impl Env {
    pub fn context(&self) -> WorkspaceContext {
        WorkspaceContext::new(self.root.clone(), self.global_dir.clone())
    }

    pub fn aliases(&self) -> anyhow::Result<AliasStore> {
        AliasStore::load(&self.global_dir).context("failed to load aliases")
    }

    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
