use crate::error::Result;
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Maps usernames to local aliases and back.
pub trait AliasResolver {
    /// Every alias pointing at `username`, in store order.
    fn aliases_for(&self, username: &str) -> Vec<String>;

    /// The username behind an alias, or `None` when `alias_or_username` is
    /// not a known alias.
    fn resolve_username(&self, alias_or_username: &str) -> Option<String>;

    /// Resolve an alias, falling back to the raw value.
    fn canonical_username(&self, alias_or_username: &str) -> String {
        self.resolve_username(alias_or_username)
            .unwrap_or_else(|| alias_or_username.to_string())
    }
}

/// The Salesforce CLI `alias.json` file: `{"orgs": {"<alias>": "<username>"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasStore {
    #[serde(default)]
    pub orgs: BTreeMap<String, String>,
}

impl AliasStore {
    /// Load `alias.json` from the global directory. A missing file is an
    /// empty store.
    pub fn load(global_dir: &Path) -> Result<Self> {
        match io::read_optional(&paths::alias_path(global_dir))? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Self::default()),
        }
    }

    pub fn insert(&mut self, alias: impl Into<String>, username: impl Into<String>) {
        self.orgs.insert(alias.into(), username.into());
    }
}

impl AliasResolver for AliasStore {
    fn aliases_for(&self, username: &str) -> Vec<String> {
        self.orgs
            .iter()
            .filter(|(_, u)| u.as_str() == username)
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    fn resolve_username(&self, alias_or_username: &str) -> Option<String> {
        self.orgs.get(alias_or_username).cloned()
    }
}
