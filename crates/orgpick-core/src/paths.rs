use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SFDX_DIR: &str = ".sfdx";
pub const ORGS_DIR: &str = ".sfdx/orgs";
pub const METADATA_DIR: &str = "metadata";

pub const PROJECT_FILE: &str = "sfdx-project.json";
pub const CONFIG_FILE: &str = "sfdx-config.json";
pub const ALIAS_FILE: &str = "alias.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// The global `.sfdx` directory under a home directory.
pub fn global_dir(home: &Path) -> PathBuf {
    home.join(SFDX_DIR)
}

pub fn project_file(root: &Path) -> PathBuf {
    root.join(PROJECT_FILE)
}

pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(SFDX_DIR).join(CONFIG_FILE)
}

pub fn global_config_path(global: &Path) -> PathBuf {
    global.join(CONFIG_FILE)
}

pub fn alias_path(global: &Path) -> PathBuf {
    global.join(ALIAS_FILE)
}

pub fn auth_file_path(global: &Path, file_name: &str) -> PathBuf {
    global.join(file_name)
}

pub fn org_metadata_dir(root: &Path, username: &str) -> PathBuf {
    root.join(ORGS_DIR).join(username).join(METADATA_DIR)
}

/// Cache file name for a metadata type, optionally scoped to a folder.
pub fn components_file_name(metadata_type: &str, folder: Option<&str>) -> String {
    match folder {
        Some(f) => format!("{metadata_type}_{f}.json"),
        None => format!("{metadata_type}.json"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
