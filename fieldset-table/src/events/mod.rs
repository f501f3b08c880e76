//! Page-scoped publish/subscribe
//!
//! The table publishes its reordered rows here so other parts of the host
//! page can react to a drop (persist ranks, refresh a summary, ...).

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::table::TableRow;

/// Callback invoked with the rows carried by an event.
pub type Listener = Arc<dyn Fn(&[TableRow]) + Send + Sync>;

#[derive(Clone)]
struct Registration {
    owner: String,
    callback: Listener,
}

/// Publish/subscribe bus shared by the components of one page.
///
/// Cloning the bus is cheap and every clone sees the same listeners.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use fieldset_table::events::PageEventBus;
///
/// let bus = PageEventBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = seen.clone();
/// bus.register_listener("ranksChanged", "summary", move |rows| {
///     counter.fetch_add(rows.len(), Ordering::SeqCst);
/// });
///
/// assert_eq!(bus.fire_event("ranksChanged", &[]), 1);
/// bus.unregister_all_listeners("summary");
/// assert_eq!(bus.fire_event("ranksChanged", &[]), 0);
/// ```
#[derive(Clone, Default)]
pub struct PageEventBus {
    listeners: Arc<DashMap<String, Vec<Registration>>>,
}

impl PageEventBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for an event on behalf of `owner`.
    pub fn register_listener<F>(&self, event: impl Into<String>, owner: impl Into<String>, callback: F)
    where
        F: Fn(&[TableRow]) + Send + Sync + 'static,
    {
        self.listeners.entry(event.into()).or_default().push(Registration {
            owner: owner.into(),
            callback: Arc::new(callback),
        });
    }

    /// Removes `owner`'s callbacks for one event.
    pub fn unregister_listener(&self, event: &str, owner: &str) {
        if let Some(mut registrations) = self.listeners.get_mut(event) {
            registrations.retain(|r| r.owner != owner);
        }
        self.listeners.remove_if(event, |_, registrations| registrations.is_empty());
    }

    /// Removes every callback registered by `owner`.
    pub fn unregister_all_listeners(&self, owner: &str) {
        self.listeners.retain(|_, registrations| {
            registrations.retain(|r| r.owner != owner);
            !registrations.is_empty()
        });
    }

    /// Delivers rows to every listener of an event and returns how many ran.
    pub fn fire_event(&self, event: &str, rows: &[TableRow]) -> usize {
        // Listeners run outside the map lock so they may (un)register.
        let callbacks: Vec<Listener> = match self.listeners.get(event) {
            Some(registrations) => registrations.iter().map(|r| r.callback.clone()).collect(),
            None => return 0,
        };
        debug!("firing {event} with {} rows to {} listeners", rows.len(), callbacks.len());
        for callback in &callbacks {
            callback(rows);
        }
        callbacks.len()
    }

    /// Returns the number of listeners registered for an event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, |r| r.len())
    }
}

impl fmt::Debug for PageEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageEventBus")
            .field("events", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_fire_reaches_only_matching_event() {
        let bus = PageEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        bus.register_listener("a", "one", move |_| sink.lock().unwrap().push("a"));
        let sink = log.clone();
        bus.register_listener("b", "one", move |_| sink.lock().unwrap().push("b"));

        assert_eq!(bus.fire_event("a", &[]), 1);
        assert_eq!(bus.fire_event("missing", &[]), 0);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_unregister_by_owner() {
        let bus = PageEventBus::new();
        bus.register_listener("a", "one", |_| {});
        bus.register_listener("a", "two", |_| {});
        bus.register_listener("b", "one", |_| {});

        bus.unregister_listener("a", "two");
        assert_eq!(bus.listener_count("a"), 1);

        bus.unregister_all_listeners("one");
        assert_eq!(bus.listener_count("a"), 0);
        assert_eq!(bus.listener_count("b"), 0);
    }

    #[test]
    fn test_clones_share_listeners() {
        let bus = PageEventBus::new();
        let other = bus.clone();
        other.register_listener("a", "one", |_| {});
        assert_eq!(bus.fire_event("a", &[]), 1);
    }

    #[test]
    fn test_listener_may_unregister_while_firing() {
        let bus = PageEventBus::new();
        let inner = bus.clone();
        bus.register_listener("a", "one", move |_| inner.unregister_all_listeners("one"));
        assert_eq!(bus.fire_event("a", &[]), 1);
        assert_eq!(bus.listener_count("a"), 0);
    }
}
