//! Named renderer registry with one-shot load notifications
//!
//! Renderer plugins are loaded asynchronously, so a block may ask for a
//! renderer before its code has arrived. Consumers first try
//! [`ComponentRegistry::resolve`]; when that misses they
//! [`subscribe`](ComponentRegistry::subscribe) and get called back once the
//! name is registered.
//!
//! ```ignore
//! use std::rc::Rc;
//! use plinth_core::registry::ComponentRegistry;
//!
//! let registry: ComponentRegistry<str> = ComponentRegistry::new();
//!
//! let sub = registry.subscribe("button", || println!("button is ready"));
//! registry.register("button", Rc::from("renderer"));
//!
//! // Already fired; cancelling afterwards is a no-op
//! sub.cancel();
//! ```
//!
//! The registry is single-threaded, like the UI loop that drives it.
//! Callbacks always run with no registry borrow held, so they may resolve,
//! subscribe, cancel or register from inside the notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a pending registration subscription
    pub struct SubscriptionId;
}

/// Callback fired once when a renderer becomes available
pub type RegisterCallback = Box<dyn FnOnce()>;

struct Pending {
    name: String,
    callback: RegisterCallback,
}

struct RegistryInner<R: ?Sized> {
    /// Loaded renderers by name
    renderers: FxHashMap<String, Rc<R>>,
    /// Live subscriptions
    pending: SlotMap<SubscriptionId, Pending>,
    /// Live subscriptions grouped by name, in subscription order
    by_name: FxHashMap<String, SmallVec<[SubscriptionId; 2]>>,
}

impl<R: ?Sized> RegistryInner<R> {
    fn take_pending(&mut self, id: SubscriptionId) -> Option<Pending> {
        let pending = self.pending.remove(id)?;
        if let Some(ids) = self.by_name.get_mut(&pending.name) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_name.remove(&pending.name);
            }
        }
        Some(pending)
    }
}

/// Type-erased view of a registry used by [`Subscription`]
trait CancelPending {
    fn cancel_pending(&self, id: SubscriptionId) -> bool;
    fn is_pending(&self, id: SubscriptionId) -> bool;
}

impl<R: ?Sized> CancelPending for RefCell<RegistryInner<R>> {
    fn cancel_pending(&self, id: SubscriptionId) -> bool {
        let removed = self.borrow_mut().take_pending(id);
        // Dropped outside the borrow: the callback may own guards of its own
        let cancelled = removed.is_some();
        drop(removed);
        cancelled
    }

    fn is_pending(&self, id: SubscriptionId) -> bool {
        self.borrow().pending.contains_key(id)
    }
}

/// Registry mapping block names to shared renderer handles
///
/// Cloning the registry is cheap and yields another handle to the same
/// entries.
pub struct ComponentRegistry<R: ?Sized> {
    inner: Rc<RefCell<RegistryInner<R>>>,
}

impl<R: ?Sized> Clone for ComponentRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: ?Sized + 'static> Default for ComponentRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for ComponentRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut names: Vec<&str> = inner.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("renderers", &names)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl<R: ?Sized + 'static> ComponentRegistry<R> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                renderers: FxHashMap::default(),
                pending: SlotMap::with_key(),
                by_name: FxHashMap::default(),
            })),
        }
    }

    /// Look up a loaded renderer
    pub fn resolve(&self, name: &str) -> Option<Rc<R>> {
        self.inner.borrow().renderers.get(name).cloned()
    }

    /// Check if a renderer is loaded under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().renderers.contains_key(name)
    }

    /// Number of loaded renderers
    pub fn len(&self) -> usize {
        self.inner.borrow().renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live subscriptions waiting on `name`
    pub fn pending_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .by_name
            .get(name)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    /// Wait for `name` to be registered
    ///
    /// The callback runs at most once. It is not called if `name` is already
    /// loaded; resolve first. Dropping or cancelling the returned
    /// [`Subscription`] guarantees the callback never runs.
    pub fn subscribe<F>(&self, name: &str, callback: F) -> Subscription
    where
        F: FnOnce() + 'static,
    {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.pending.insert(Pending {
                name: name.to_string(),
                callback: Box::new(callback),
            });
            inner.by_name.entry(name.to_string()).or_default().push(id);
            id
        };
        tracing::trace!("subscribed to renderer '{}' ({:?})", name, id);

        let erased: Rc<dyn CancelPending> = self.inner.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&erased),
        }
    }

    /// Register a renderer and notify everyone waiting for it
    ///
    /// Registering an existing name replaces the previous renderer.
    pub fn register(&self, name: impl Into<String>, renderer: Rc<R>) {
        let name = name.into();
        let waiting = {
            let mut inner = self.inner.borrow_mut();
            if inner.renderers.insert(name.clone(), renderer).is_some() {
                tracing::warn!("Renderer '{}' registered twice, replacing", name);
            }
            inner.by_name.remove(&name).unwrap_or_default()
        };
        tracing::debug!(
            "registered renderer '{}', {} waiting",
            name,
            waiting.len()
        );

        for id in waiting {
            // A callback that ran earlier in this loop may have cancelled this one
            let Some(pending) = self.inner.borrow_mut().pending.remove(id) else {
                tracing::trace!("skipping cancelled subscription {:?}", id);
                continue;
            };
            tracing::trace!("notifying subscription {:?} for '{}'", id, name);
            (pending.callback)();
        }
    }

    /// Remove a renderer, returning it if it was loaded
    ///
    /// Pending subscriptions are kept and fire on the next registration.
    pub fn unregister(&self, name: &str) -> Option<Rc<R>> {
        self.inner.borrow_mut().renderers.remove(name)
    }
}

/// Handle to a pending registration subscription
///
/// Cancelling is idempotent and safe after the callback already fired.
/// Dropping the handle cancels it.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<dyn CancelPending>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the callback is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.is_pending(self.id))
    }

    /// Cancel the subscription
    pub fn cancel(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.cancel_pending(self.id) {
                tracing::trace!("cancelled subscription {:?}", self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn registry() -> ComponentRegistry<str> {
        ComponentRegistry::new()
    }

    #[test]
    fn test_resolve_registered() {
        let registry = registry();
        assert!(registry.resolve("button").is_none());

        registry.register("button", Rc::from("button-renderer"));

        assert_eq!(registry.resolve("button").as_deref(), Some("button-renderer"));
        assert!(registry.contains("button"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_subscription_fires_once() {
        let registry = registry();
        let calls = Rc::new(Cell::new(0));

        let count = Rc::clone(&calls);
        let sub = registry.subscribe("button", move || count.set(count.get() + 1));
        assert!(sub.is_pending());
        assert_eq!(registry.pending_count("button"), 1);

        registry.register("button", Rc::from("v1"));
        assert_eq!(calls.get(), 1);
        assert!(!sub.is_pending());

        // Re-registration does not re-notify
        registry.register("button", Rc::from("v2"));
        assert_eq!(calls.get(), 1);

        // Cancel after fire is a no-op
        sub.cancel();
        sub.cancel();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_cancelled_subscription_never_fires() {
        let registry = registry();
        let calls = Rc::new(Cell::new(0));

        let count = Rc::clone(&calls);
        let sub = registry.subscribe("text", move || count.set(count.get() + 1));
        sub.cancel();
        sub.cancel();
        assert_eq!(registry.pending_count("text"), 0);

        registry.register("text", Rc::from("text-renderer"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_cancel_within_same_registration_turn() {
        let registry = registry();
        let second_fired = Rc::new(Cell::new(false));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        // The first callback cancels the second before it gets its turn
        let to_cancel = Rc::clone(&second);
        let _first = registry.subscribe("image", move || {
            if let Some(sub) = to_cancel.borrow().as_ref() {
                sub.cancel();
            }
        });
        let fired = Rc::clone(&second_fired);
        *second.borrow_mut() = Some(registry.subscribe("image", move || fired.set(true)));

        registry.register("image", Rc::from("image-renderer"));
        assert!(!second_fired.get());
    }

    #[test]
    fn test_drop_cancels() {
        let registry = registry();
        let calls = Rc::new(Cell::new(0));

        {
            let count = Rc::clone(&calls);
            let _sub = registry.subscribe("video", move || count.set(count.get() + 1));
        }
        assert_eq!(registry.pending_count("video"), 0);

        registry.register("video", Rc::from("video-renderer"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_callback_can_resolve_reentrantly() {
        let registry = registry();
        let seen = Rc::new(RefCell::new(None));

        let reg = registry.clone();
        let out = Rc::clone(&seen);
        let _sub = registry.subscribe("chart", move || {
            *out.borrow_mut() = reg.resolve("chart").map(|r| r.to_string());
        });

        registry.register("chart", Rc::from("chart-renderer"));
        assert_eq!(seen.borrow().as_deref(), Some("chart-renderer"));
    }

    #[test]
    fn test_subscriptions_are_per_name() {
        let registry = registry();
        let calls = Rc::new(Cell::new(0));

        let count = Rc::clone(&calls);
        let _sub = registry.subscribe("a", move || count.set(count.get() + 1));

        registry.register("b", Rc::from("b"));
        assert_eq!(calls.get(), 0);
        assert_eq!(registry.pending_count("a"), 1);

        registry.register("a", Rc::from("a"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_cancel_after_registry_dropped() {
        let registry = registry();
        let sub = registry.subscribe("gone", || {});
        drop(registry);

        assert!(!sub.is_pending());
        sub.cancel();
    }

    #[test]
    fn test_unregister_keeps_waiters() {
        let registry = registry();
        registry.register("swap", Rc::from("old"));
        assert_eq!(registry.unregister("swap").as_deref(), Some("old"));
        assert!(registry.resolve("swap").is_none());

        let calls = Rc::new(Cell::new(0));
        let count = Rc::clone(&calls);
        let _sub = registry.subscribe("swap", move || count.set(count.get() + 1));
        registry.register("swap", Rc::from("new"));
        assert_eq!(calls.get(), 1);
    }
}
