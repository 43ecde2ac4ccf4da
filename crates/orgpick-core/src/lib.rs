pub mod alias;
pub mod auth;
pub mod config;
pub mod error;
pub mod io;
pub mod menu;
pub mod metadata;
pub mod org_list;
pub mod paths;
pub mod status;

pub use error::{OrgError, Result};
