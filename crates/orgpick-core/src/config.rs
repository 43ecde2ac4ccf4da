use crate::alias::AliasResolver;
use crate::error::{OrgError, Result};
use crate::status::{OrgChangeNotifier, OrgInfo};
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SfdxConfig
// ---------------------------------------------------------------------------

/// `sfdx-config.json`. Only the org keys are typed; every other key is kept
/// so a rewrite does not lose it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SfdxConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaultusername: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaultdevhubusername: Option<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl SfdxConfig {
    fn load_file(path: &Path) -> Result<Self> {
        match io::read_optional(path)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Self::default()),
        }
    }

    /// Global config with the project config layered on top. Without a
    /// project root only the global file is read.
    pub fn load(root: Option<&Path>, global_dir: &Path) -> Result<Self> {
        let global = Self::load_file(&paths::global_config_path(global_dir))?;
        let Some(root) = root else {
            return Ok(global);
        };
        let project = Self::load_file(&paths::project_config_path(root))?;
        Ok(global.overlay(project))
    }

    fn overlay(mut self, top: Self) -> Self {
        if top.defaultusername.is_some() {
            self.defaultusername = top.defaultusername;
        }
        if top.defaultdevhubusername.is_some() {
            self.defaultdevhubusername = top.defaultdevhubusername;
        }
        self.other.extend(top.other);
        self
    }
}

// ---------------------------------------------------------------------------
// WorkspaceContext
// ---------------------------------------------------------------------------

/// A project (or the lack of one) plus the global `.sfdx` directory, with
/// the notifier that fires when the default org changes.
pub struct WorkspaceContext {
    root: Option<PathBuf>,
    global_dir: PathBuf,
    notifier: OrgChangeNotifier,
}

impl WorkspaceContext {
    pub fn new(root: Option<PathBuf>, global_dir: PathBuf) -> Self {
        Self {
            root,
            global_dir,
            notifier: OrgChangeNotifier::new(),
        }
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Result<&Path> {
        self.root.as_deref().ok_or(OrgError::NoWorkspace)
    }

    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    pub fn notifier(&self) -> &OrgChangeNotifier {
        &self.notifier
    }

    pub fn config(&self) -> Result<SfdxConfig> {
        SfdxConfig::load(self.root.as_deref(), &self.global_dir)
    }

    /// The configured default Dev Hub, username or alias. Only consulted
    /// inside a project.
    pub fn default_dev_hub(&self) -> Result<Option<String>> {
        if !self.has_root() {
            return Ok(None);
        }
        Ok(self.config()?.defaultdevhubusername)
    }

    pub fn org_info<A: AliasResolver + ?Sized>(&self, aliases: &A) -> Result<OrgInfo> {
        let config = self.config()?;
        Ok(org_info_for(config.defaultusername.as_deref(), aliases))
    }

    /// Write `defaultusername` into the project config and notify
    /// subscribers.
    pub fn set_default_org<A: AliasResolver + ?Sized>(
        &self,
        username_or_alias: &str,
        aliases: &A,
    ) -> Result<OrgInfo> {
        let root = self.root()?;
        let path = paths::project_config_path(root);
        let mut config = SfdxConfig::load_file(&path)?;
        config.defaultusername = Some(username_or_alias.to_string());
        let data = serde_json::to_string_pretty(&config)?;
        io::atomic_write(&path, data.as_bytes())?;
        tracing::info!(org = %username_or_alias, "default org set");

        let info = org_info_for(Some(username_or_alias), aliases);
        self.notifier.notify(&info);
        Ok(info)
    }
}

fn org_info_for<A: AliasResolver + ?Sized>(value: Option<&str>, aliases: &A) -> OrgInfo {
    let Some(value) = value else {
        return OrgInfo::default();
    };
    match aliases.resolve_username(value) {
        Some(username) => OrgInfo {
            username: Some(username),
            alias: Some(value.to_string()),
        },
        None => OrgInfo {
            username: Some(value.to_string()),
            alias: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
