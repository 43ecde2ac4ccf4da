use anyhow::Context;
use orgpick_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the Salesforce DX project root.
///
/// Priority:
/// 1. `--root` flag / `ORGPICK_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `sfdx-project.json`
///
/// `None` means there is no project; org listing still works, project
/// config and metadata do not.
pub fn resolve_root(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_project_root(&cwd)
}

fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if paths::project_file(&dir).is_file() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

/// Resolve the global `.sfdx` directory: `--global-dir` / `SFDX_GLOBAL_DIR`,
/// else `$HOME/.sfdx`.
pub fn resolve_global_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = home::home_dir().context("home directory not found: set HOME or --global-dir")?;
    Ok(paths::global_dir(&home))
}
