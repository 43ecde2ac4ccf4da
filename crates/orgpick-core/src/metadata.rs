//! Metadata components cached under `.sfdx/orgs/<username>/metadata/`.
//!
//! The cache files hold raw `force:mdapi:listmetadata` or
//! `force:schema:sobject:describe` JSON output. Filling the cache needs the
//! Salesforce CLI and happens elsewhere; this module only reads it.

use crate::alias::AliasResolver;
use crate::error::{OrgError, Result};
use crate::paths;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CUSTOM_OBJECT: &str = "CustomObject";

/// Components in one of these states can be retrieved and edited. Absent
/// means the component is not part of a package.
const EDITABLE_STATES: [&str; 3] = ["unmanaged", "installedEditable", "deprecatedEditable"];

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Cache file for a metadata type in an org. Fails before touching the disk
/// when there is no project.
pub fn components_path(
    root: Option<&Path>,
    username: &str,
    metadata_type: &str,
    folder: Option<&str>,
) -> Result<PathBuf> {
    let root = root.ok_or(OrgError::NoWorkspace)?;
    Ok(paths::org_metadata_dir(root, username)
        .join(paths::components_file_name(metadata_type, folder)))
}

// ---------------------------------------------------------------------------
// listmetadata output
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListMetadataOutput {
    #[serde(default)]
    result: Option<OneOrMany<ComponentProps>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentProps {
    #[serde(default)]
    full_name: Option<String>,
    /// Outer `None`: key absent. `Some(None)`: explicit `null`.
    #[serde(default, deserialize_with = "present")]
    manageable_state: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ComponentProps {
    fn is_editable(&self) -> bool {
        match &self.manageable_state {
            None => true,
            Some(None) => false,
            Some(Some(state)) => EDITABLE_STATES.contains(&state.as_str()),
        }
    }
}

/// Sorted full names of the editable components in a listmetadata result.
pub fn build_components_list(json: &str) -> Result<Vec<String>> {
    let output: ListMetadataOutput = serde_json::from_str(json)?;
    let mut components: Vec<String> = output
        .result
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(ComponentProps::is_editable)
        .filter_map(|c| c.full_name)
        .collect();
    components.sort();
    Ok(components)
}

// ---------------------------------------------------------------------------
// sobject describe output
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DescribeOutput {
    result: DescribeResult,
}

#[derive(Debug, Deserialize)]
struct DescribeResult {
    #[serde(default)]
    fields: Vec<FieldDescribe>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDescribe {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    relationship_name: Option<String>,
    #[serde(default)]
    length: Option<u64>,
}

impl FieldDescribe {
    fn label(&self) -> String {
        match self.field_type.as_str() {
            "string" | "textarea" | "email" => {
                let length = self.length.map(|l| l.to_string()).unwrap_or_default();
                format!("{} ({}({length}))", self.name, self.field_type)
            }
            "reference" => format!(
                "{} (reference)",
                self.relationship_name.as_deref().unwrap_or(&self.name)
            ),
            _ => format!("{} ({})", self.name, self.field_type),
        }
    }
}

/// One line per field of an sobject describe result, in describe order.
pub fn build_custom_object_fields_list(json: &str) -> Result<Vec<String>> {
    let output: DescribeOutput = serde_json::from_str(json)?;
    Ok(output.result.fields.iter().map(FieldDescribe::label).collect())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Components of `metadata_type` from the org's cache. `CustomObject` with a
/// folder lists the fields of that object instead.
pub fn load_components<A: AliasResolver + ?Sized>(
    root: Option<&Path>,
    username_or_alias: &str,
    metadata_type: &str,
    folder: Option<&str>,
    aliases: &A,
) -> Result<Vec<String>> {
    let username = aliases.canonical_username(username_or_alias);
    let path = components_path(root, &username, metadata_type, folder)?;

    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OrgError::ComponentsNotCached {
                metadata_type: metadata_type.to_string(),
                path: path.display().to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let components = if metadata_type == CUSTOM_OBJECT && folder.is_some() {
        build_custom_object_fields_list(&json)?
    } else {
        build_components_list(&json)?
    };
    tracing::debug!(metadata_type, count = components.len(), "loaded metadata components");
    Ok(components)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
