//! Default-org change notifications and the status indicator that follows
//! them.
//!
//! `OrgChangeNotifier` keeps a registry of callbacks. Each `subscribe` call
//! hands back a `Subscription`; dropping it removes the callback, so an
//! observer's lifetime bounds how long it is notified.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};

pub const MISSING_DEFAULT_ORG: &str = "No Default Org Set";

// ---------------------------------------------------------------------------
// OrgInfo
// ---------------------------------------------------------------------------

/// The current default org as the editor sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl OrgInfo {
    /// Alias when one is set, otherwise the username.
    pub fn display_name(&self) -> Option<&str> {
        self.alias.as_deref().or(self.username.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

type Callback = Arc<dyn Fn(&OrgInfo) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Callback)>,
}

#[derive(Clone, Default)]
pub struct OrgChangeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl OrgChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&OrgInfo) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(callback)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Call every live callback. The registry lock is released first, so
    /// callbacks may subscribe or drop subscriptions.
    pub fn notify(&self, info: &OrgInfo) {
        let callbacks: Vec<Callback> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        tracing::debug!(listeners = callbacks.len(), "default org changed");
        for callback in callbacks {
            callback(info);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .map(|r| r.listeners.len())
            .unwrap_or_default()
    }
}

/// Registration handle. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Same as dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

// ---------------------------------------------------------------------------
// OrgStatusIndicator
// ---------------------------------------------------------------------------

/// Status bar text for the default org. Clicking it opens the org picker.
pub struct OrgStatusIndicator {
    text: Arc<Mutex<String>>,
    subscription: Option<Subscription>,
}

impl OrgStatusIndicator {
    pub const COMMAND: &'static str = "sfdx.force.set.default.org";
    pub const TOOLTIP: &'static str = "Change Default Org";

    pub fn new(notifier: &OrgChangeNotifier, initial: &OrgInfo) -> Self {
        let text = Arc::new(Mutex::new(render(initial.display_name())));
        let shared = Arc::clone(&text);
        let subscription = notifier.subscribe(move |info| {
            let mut text = shared.lock().unwrap_or_else(|e| e.into_inner());
            *text = render(info.display_name());
        });
        Self {
            text,
            subscription: Some(subscription),
        }
    }

    pub fn text(&self) -> String {
        let text = self.text.lock().unwrap_or_else(|e| e.into_inner());
        text.clone()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop following org changes. The last text is kept.
    pub fn dispose(&mut self) {
        self.subscription.take();
    }
}

fn render(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("$(plug) {name}"),
        None => MISSING_DEFAULT_ORG.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn info(username: &str, alias: Option<&str>) -> OrgInfo {
        OrgInfo {
            username: Some(username.to_string()),
            alias: alias.map(str::to_string),
        }
    }

    #[test]
    fn indicator_prefers_alias() {
        let notifier = OrgChangeNotifier::new();
        let indicator = OrgStatusIndicator::new(&notifier, &info("u@example.com", Some("dev")));
        assert_eq!(indicator.text(), "$(plug) dev");
    }

    #[test]
    fn indicator_without_default_org() {
        let notifier = OrgChangeNotifier::new();
        let indicator = OrgStatusIndicator::new(&notifier, &OrgInfo::default());
        assert_eq!(indicator.text(), MISSING_DEFAULT_ORG);
    }

    #[test]
    fn indicator_follows_changes_until_disposed() {
        let notifier = OrgChangeNotifier::new();
        let mut indicator = OrgStatusIndicator::new(&notifier, &OrgInfo::default());

        notifier.notify(&info("u@example.com", None));
        assert_eq!(indicator.text(), "$(plug) u@example.com");

        indicator.dispose();
        assert!(!indicator.is_active());
        assert_eq!(notifier.subscriber_count(), 0);

        notifier.notify(&info("other@example.com", None));
        assert_eq!(indicator.text(), "$(plug) u@example.com");
    }

    #[test]
    fn dropped_subscription_is_not_called() {
        let notifier = OrgChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let kept = notifier.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&calls);
        let dropped = notifier.subscribe(move |_| {
            counter.fetch_add(10, Ordering::SeqCst);
        });
        drop(dropped);

        notifier.notify(&OrgInfo::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.subscriber_count(), 1);
        kept.unsubscribe();
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn callbacks_may_subscribe_and_unsubscribe() {
        let notifier = OrgChangeNotifier::new();
        let inner = notifier.clone();
        let held: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&held);
        let _outer = notifier.subscribe(move |_| {
            let transient = inner.subscribe(|_| {});
            drop(transient);
            let mut slot = slot.lock().unwrap();
            match slot.take() {
                Some(sub) => drop(sub),
                None => *slot = Some(inner.subscribe(|_| {})),
            }
        });

        notifier.notify(&OrgInfo::default());
        assert_eq!(notifier.subscriber_count(), 2);
        notifier.notify(&OrgInfo::default());
        assert_eq!(notifier.subscriber_count(), 1);
    }

    #[test]
    fn indicator_disposed_from_callback() {
        let notifier = OrgChangeNotifier::new();
        let indicator = Arc::new(Mutex::new(OrgStatusIndicator::new(
            &notifier,
            &OrgInfo::default(),
        )));
        let target = Arc::clone(&indicator);
        let _sub = notifier.subscribe(move |_| {
            target.lock().unwrap().dispose();
        });

        notifier.notify(&info("u@example.com", None));
        let indicator = indicator.lock().unwrap();
        assert!(!indicator.is_active());
        assert_eq!(notifier.subscriber_count(), 1);
    }

    #[test]
    fn subscription_outliving_notifier_is_harmless() {
        let notifier = OrgChangeNotifier::new();
        let sub = notifier.subscribe(|_| {});
        drop(notifier);
        drop(sub);
    }
}
