//! Reads per-org credential files from the global `.sfdx` directory.
//!
//! Every file is decoded on its own: a file that cannot be read or does not
//! match the schema is logged and skipped, never failing the whole listing.

use crate::error::{OrgError, Result};
use crate::paths;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// OrgRecord
// ---------------------------------------------------------------------------

/// A decoded auth file. Keys follow the Salesforce CLI's camelCase layout;
/// anything not listed here is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_admin_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_hub_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dev_hub: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
}

impl OrgRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            scratch_admin_username: None,
            dev_hub_username: None,
            expiration_date: None,
            is_dev_hub: None,
            org_id: None,
            instance_url: None,
        }
    }

    /// Scratch orgs carry a reference to the Dev Hub that created them.
    pub fn is_scratch_child(&self) -> bool {
        self.dev_hub_username.is_some()
    }

    /// Secondary admin users of a scratch org; hidden from the picker.
    pub fn is_scratch_admin(&self) -> bool {
        self.scratch_admin_username.is_some()
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

pub fn decode_auth_file(data: &str) -> Result<OrgRecord> {
    let record: OrgRecord = serde_json::from_str(data)?;
    if record.username.trim().is_empty() {
        return Err(OrgError::InvalidAuthFile(
            "username must not be empty".to_string(),
        ));
    }
    Ok(record)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

static AUTH_FILE_RE: OnceLock<Regex> = OnceLock::new();

fn auth_file_re() -> &'static Regex {
    AUTH_FILE_RE.get_or_init(|| Regex::new(r"^[^.][^@]*@[^.]+(\.[^.\s]+)+\.json$").unwrap())
}

pub fn is_auth_file_name(name: &str) -> bool {
    auth_file_re().is_match(name)
}

/// Names of the auth files in `global_dir`, sorted. `None` when the
/// directory is missing or cannot be read.
pub fn list_auth_files(global_dir: &Path) -> Option<Vec<String>> {
    let entries = match std::fs::read_dir(global_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %global_dir.display(), error = %e, "auth directory unavailable");
            return None;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| is_auth_file_name(name))
        .collect();
    names.sort();
    Some(names)
}

fn read_auth_record(global_dir: &Path, file_name: &str) -> Result<OrgRecord> {
    let path = paths::auth_file_path(global_dir, file_name);
    let data = std::fs::read_to_string(path)?;
    decode_auth_file(&data)
}

/// Read and decode each named file. An empty list means there is nothing to
/// show and yields `None`, distinct from a list whose files all failed.
pub fn read_auth_records(global_dir: &Path, file_names: &[String]) -> Option<Vec<OrgRecord>> {
    if file_names.is_empty() {
        return None;
    }

    let mut records = Vec::with_capacity(file_names.len());
    for name in file_names {
        match read_auth_record(global_dir, name) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(file = %name, error = %e, "skipping unreadable auth file"),
        }
    }
    tracing::debug!(read = records.len(), listed = file_names.len(), "loaded auth files");
    Some(records)
}

pub fn load_org_records(global_dir: &Path) -> Option<Vec<OrgRecord>> {
    let names = list_auth_files(global_dir)?;
    read_auth_records(global_dir, &names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn decode_full_record() {
        let record = decode_auth_file(
            r#"{
                "username": "scratch@example.com",
                "devHubUsername": "hub@example.com",
                "expirationDate": "2024-03-01",
                "orgId": "00D000000000001",
                "instanceUrl": "https://example.my.salesforce.com",
                "accessToken": "ignored"
            }"#,
        )
        .unwrap();
        assert_eq!(record.username, "scratch@example.com");
        assert!(record.is_scratch_child());
        assert!(!record.is_scratch_admin());
        assert_eq!(
            record.expiration_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn decode_rejects_missing_or_blank_username() {
        assert!(decode_auth_file(r#"{"orgId": "00D"}"#).is_err());
        assert!(matches!(
            decode_auth_file(r#"{"username": "  "}"#),
            Err(OrgError::InvalidAuthFile(_))
        ));
    }

    #[test]
    fn decode_rejects_bad_date() {
        assert!(decode_auth_file(r#"{"username": "a@x.com", "expirationDate": "soon"}"#).is_err());
    }

    #[test]
    fn auth_file_names() {
        assert!(is_auth_file_name("user@example.com.json"));
        assert!(is_auth_file_name("test-xyz@example.org.uk.json"));
        assert!(!is_auth_file_name("alias.json"));
        assert!(!is_auth_file_name("sfdx-config.json"));
        assert!(!is_auth_file_name(".hidden@example.com.json"));
        assert!(!is_auth_file_name("user@example.com.txt"));
    }

    #[test]
    fn list_skips_non_auth_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b@example.com.json", "{}");
        write(&dir, "a@example.com.json", "{}");
        write(&dir, "alias.json", "{}");
        std::fs::create_dir(dir.path().join("orgs")).unwrap();

        let names = list_auth_files(dir.path()).unwrap();
        assert_eq!(names, vec!["a@example.com.json", "b@example.com.json"]);
    }

    #[test]
    fn list_missing_dir_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(list_auth_files(&dir.path().join("missing")).is_none());
    }

    #[test]
    fn read_returns_records_in_list_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "one@example.com.json", r#"{"username": "one@example.com"}"#);
        write(&dir, "two@example.com.json", r#"{"username": "two@example.com"}"#);

        let names = vec![
            "two@example.com.json".to_string(),
            "one@example.com.json".to_string(),
        ];
        let records = read_auth_records(dir.path(), &names).unwrap();
        assert_eq!(records[0].username, "two@example.com");
        assert_eq!(records[1].username, "one@example.com");
    }

    #[test]
    fn read_skips_broken_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good@example.com.json", r#"{"username": "good@example.com"}"#);
        write(&dir, "bad@example.com.json", "{not json");

        let names = vec![
            "bad@example.com.json".to_string(),
            "gone@example.com.json".to_string(),
            "good@example.com.json".to_string(),
        ];
        let records = read_auth_records(dir.path(), &names).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "good@example.com");
    }

    #[test]
    fn empty_list_is_no_data() {
        let dir = TempDir::new().unwrap();
        assert!(read_auth_records(dir.path(), &[]).is_none());
        assert!(load_org_records(dir.path()).is_none());
    }
}
