use crate::error::Result;
use crate::org_list::OrgEntry;
use serde::Serialize;

const ITEM_PREFIX: &str = "$(plus) ";

// ---------------------------------------------------------------------------
// OrgAction
// ---------------------------------------------------------------------------

/// What a picker selection asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "org", rename_all = "snake_case")]
pub enum OrgAction {
    AuthorizeOrg,
    AuthorizeDevHub,
    CreateScratchOrg,
    AuthorizeWithToken,
    CleanOrgList,
    SetDefault(String),
}

impl OrgAction {
    /// The fixed actions, in picker order.
    pub const FIXED: [OrgAction; 5] = [
        OrgAction::AuthorizeOrg,
        OrgAction::AuthorizeDevHub,
        OrgAction::CreateScratchOrg,
        OrgAction::AuthorizeWithToken,
        OrgAction::CleanOrgList,
    ];

    pub fn command_id(&self) -> &'static str {
        match self {
            OrgAction::AuthorizeOrg => "sfdx.force.auth.web.login",
            OrgAction::AuthorizeDevHub => "sfdx.force.auth.dev.hub",
            OrgAction::CreateScratchOrg => "sfdx.force.org.create",
            OrgAction::AuthorizeWithToken => "sfdx.force.auth.accessToken",
            OrgAction::CleanOrgList => "sfdx.force.org.list.clean",
            OrgAction::SetDefault(_) => "sfdx.force.config.set",
        }
    }

    /// Picker text for a fixed action; `None` for `SetDefault`.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            OrgAction::AuthorizeOrg => Some("SFDX: Authorize an Org"),
            OrgAction::AuthorizeDevHub => Some("SFDX: Authorize a Dev Hub"),
            OrgAction::CreateScratchOrg => Some("SFDX: Create a Default Scratch Org..."),
            OrgAction::AuthorizeWithToken => Some("SFDX: Authorize an Org using Session ID"),
            OrgAction::CleanOrgList => Some("SFDX: Remove Deleted and Expired Orgs"),
            OrgAction::SetDefault(_) => None,
        }
    }

    pub fn menu_label(&self) -> Option<String> {
        self.label().map(|l| format!("{ITEM_PREFIX}{l}"))
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// Fixed actions first, then one line per org.
pub fn menu_items(entries: Option<&[OrgEntry]>) -> Vec<String> {
    let mut items: Vec<String> = OrgAction::FIXED
        .iter()
        .filter_map(OrgAction::menu_label)
        .collect();
    if let Some(entries) = entries {
        items.extend(entries.iter().map(OrgEntry::label));
    }
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    Cancel,
    Continue(OrgAction),
}

/// Map the picked line to an action. Nothing picked is a cancel.
///
/// An org line found in `entries` sets that entry's first alias, or its
/// username when it has none. Lines not in `entries` fall back to the text
/// before the first `" - "`, narrowed to the first comma-separated alias.
pub fn parse_selection(selection: Option<&str>, entries: Option<&[OrgEntry]>) -> Selection {
    let Some(selection) = selection.filter(|s| !s.trim().is_empty()) else {
        return Selection::Cancel;
    };

    if let Some(action) = OrgAction::FIXED
        .iter()
        .find(|a| a.menu_label().as_deref() == Some(selection))
    {
        return Selection::Continue(action.clone());
    }

    if let Some(entry) = entries
        .unwrap_or_default()
        .iter()
        .find(|e| e.label() == selection)
    {
        let target = entry.aliases.first().unwrap_or(&entry.username);
        return Selection::Continue(OrgAction::SetDefault(target.clone()));
    }

    let head = selection.split(" - ").next().unwrap_or(selection);
    let target = head.split(',').next().unwrap_or(head).trim();
    Selection::Continue(OrgAction::SetDefault(target.to_string()))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Carries out an action, typically by handing its command id to whoever
/// runs commands.
pub trait ActionExecutor {
    fn execute(&mut self, action: &OrgAction) -> Result<()>;
}

pub fn dispatch<E: ActionExecutor + ?Sized>(
    selection: Option<&str>,
    entries: Option<&[OrgEntry]>,
    executor: &mut E,
) -> Result<Selection> {
    let parsed = parse_selection(selection, entries);
    if let Selection::Continue(action) = &parsed {
        tracing::debug!(command = action.command_id(), "dispatching org action");
        executor.execute(action)?;
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        commands: Vec<(String, Option<String>)>,
    }

    impl ActionExecutor for Recorder {
        fn execute(&mut self, action: &OrgAction) -> Result<()> {
            let arg = match action {
                OrgAction::SetDefault(org) => Some(org.clone()),
                _ => None,
            };
            self.commands.push((action.command_id().to_string(), arg));
            Ok(())
        }
    }

    fn entry(username: &str, aliases: &[&str]) -> OrgEntry {
        OrgEntry {
            username: username.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            expired: false,
            dev_hub_username: None,
            expiration_date: None,
        }
    }

    #[test]
    fn menu_lists_actions_then_orgs() {
        let entries = vec![
            entry("test-username1@example.com", &["alias"]),
            entry("test-username2@example.com", &[]),
        ];
        let items = menu_items(Some(&entries));
        assert_eq!(items.len(), 7);
        assert_eq!(items[0], "$(plus) SFDX: Authorize an Org");
        assert_eq!(items[5], "alias - test-username1@example.com");
        assert_eq!(items[6], "test-username2@example.com");
    }

    #[test]
    fn menu_without_orgs_has_only_actions() {
        assert_eq!(menu_items(None).len(), 5);
    }

    #[test]
    fn no_selection_cancels() {
        let mut recorder = Recorder::default();
        assert_eq!(dispatch(None, None, &mut recorder).unwrap(), Selection::Cancel);
        assert!(recorder.commands.is_empty());
    }

    #[test]
    fn fixed_actions_map_to_commands() {
        let expected = [
            "sfdx.force.auth.web.login",
            "sfdx.force.auth.dev.hub",
            "sfdx.force.org.create",
            "sfdx.force.auth.accessToken",
            "sfdx.force.org.list.clean",
        ];
        for (item, command) in menu_items(None).iter().zip(expected) {
            let mut recorder = Recorder::default();
            let selection = dispatch(Some(item.as_str()), None, &mut recorder).unwrap();
            assert!(matches!(selection, Selection::Continue(_)));
            assert_eq!(recorder.commands, vec![(command.to_string(), None)]);
        }
    }

    #[test]
    fn org_line_sets_default() {
        let mut recorder = Recorder::default();
        let entries = vec![entry("test-username1@example.com", &["alias"])];
        dispatch(
            Some("alias - test-username1@example.com"),
            Some(&entries),
            &mut recorder,
        )
        .unwrap();
        assert_eq!(
            recorder.commands,
            vec![(
                "sfdx.force.config.set".to_string(),
                Some("alias".to_string())
            )]
        );
    }

    #[test]
    fn listed_entry_resolves_exactly() {
        let entries = vec![
            entry("u@x.com", &["team,dev"]),
            entry("v@x.com", &["qa - eu", "qa2"]),
            OrgEntry {
                expired: true,
                ..entry("w@x.com", &[])
            },
        ];
        assert_eq!(
            parse_selection(Some("team,dev - u@x.com"), Some(&entries)),
            Selection::Continue(OrgAction::SetDefault("team,dev".to_string()))
        );
        assert_eq!(
            parse_selection(Some("qa - eu,qa2 - v@x.com"), Some(&entries)),
            Selection::Continue(OrgAction::SetDefault("qa - eu".to_string()))
        );
        assert_eq!(
            parse_selection(Some("w@x.com - Expired \u{274c}"), Some(&entries)),
            Selection::Continue(OrgAction::SetDefault("w@x.com".to_string()))
        );
    }

    #[test]
    fn org_line_variants() {
        assert_eq!(
            parse_selection(Some("u@example.com"), None),
            Selection::Continue(OrgAction::SetDefault("u@example.com".to_string()))
        );
        assert_eq!(
            parse_selection(Some("u@example.com - Expired \u{274c}"), None),
            Selection::Continue(OrgAction::SetDefault("u@example.com".to_string()))
        );
        assert_eq!(
            parse_selection(Some("one,two - u@example.com"), None),
            Selection::Continue(OrgAction::SetDefault("one".to_string()))
        );
    }
}
