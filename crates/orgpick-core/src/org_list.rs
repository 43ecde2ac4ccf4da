use crate::alias::AliasResolver;
use crate::auth::{self, OrgRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

pub const EXPIRED_MARKER: &str = "Expired \u{274c}";

// ---------------------------------------------------------------------------
// OrgEntry
// ---------------------------------------------------------------------------

/// One line of the org picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgEntry {
    pub username: String,
    pub aliases: Vec<String>,
    pub expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_hub_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl OrgEntry {
    /// `"<alias>[,<alias>...] - <username>"`, or the bare username, with
    /// `" - Expired ❌"` appended for expired orgs.
    pub fn label(&self) -> String {
        let mut label = if self.aliases.is_empty() {
            self.username.clone()
        } else {
            format!("{} - {}", self.aliases.join(","), self.username)
        };
        if self.expired {
            label.push_str(" - ");
            label.push_str(EXPIRED_MARKER);
        }
        label
    }
}

impl std::fmt::Display for OrgEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Expiry is checked at day granularity; an org expiring today is expired.
pub fn is_expired(expiration_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    expiration_date.is_some_and(|date| date <= today)
}

/// Turn decoded auth records into picker entries.
///
/// Scratch org admin users are dropped. With a default Dev Hub, scratch orgs
/// belonging to any other Dev Hub are dropped too; the Dev Hub may be given
/// as an alias. Input order is kept.
pub fn filter_orgs<A: AliasResolver + ?Sized>(
    records: &[OrgRecord],
    default_dev_hub: Option<&str>,
    aliases: &A,
    today: NaiveDate,
) -> Vec<OrgEntry> {
    let dev_hub = default_dev_hub.map(|hub| aliases.canonical_username(hub));

    records
        .iter()
        .filter(|r| !r.is_scratch_admin())
        .filter(|r| match (&dev_hub, &r.dev_hub_username) {
            (Some(hub), Some(parent)) => parent == hub,
            _ => true,
        })
        .map(|r| OrgEntry {
            username: r.username.clone(),
            aliases: aliases.aliases_for(&r.username),
            expired: is_expired(r.expiration_date, today),
            dev_hub_username: r.dev_hub_username.clone(),
            expiration_date: r.expiration_date,
        })
        .collect()
}

pub fn labels(entries: &[OrgEntry]) -> Vec<String> {
    entries.iter().map(OrgEntry::label).collect()
}

/// Read the auth store and filter it. `None` when there are no auth files.
pub fn update_org_list<A: AliasResolver + ?Sized>(
    global_dir: &Path,
    default_dev_hub: Option<&str>,
    aliases: &A,
    today: NaiveDate,
) -> Option<Vec<OrgEntry>> {
    let records = auth::load_org_records(global_dir)?;
    Some(filter_orgs(&records, default_dev_hub, aliases, today))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
