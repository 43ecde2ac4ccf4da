use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgError {
    #[error("cannot determine workspace: no sfdx-project.json found")]
    NoWorkspace,

    #[error("no default org set")]
    NoDefaultOrg,

    #[error("invalid auth file: {0}")]
    InvalidAuthFile(String),

    #[error("components for {metadata_type} are not cached at {path}: refresh them with the Salesforce CLI")]
    ComponentsNotCached { metadata_type: String, path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrgError>;
