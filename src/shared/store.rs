//! Theme preference store.
//!
//! One [`ThemeStore`] is built at startup and shared with every consumer view
//! through a [`ThemeHandle`]. The store owns the mode, mirrors it to durable
//! storage and to the root presentation node, and notifies subscribers when it
//! changes.
//!
//! Storage failures never reach the caller. If the durable store cannot be
//! read or written the store keeps the mode in memory for the rest of the
//! session, so the preference is simply not remembered across restarts.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use log::{debug, warn};
use parking_lot::{Mutex, ReentrantMutex};

use super::config::ThemeConfig;
use super::presentation::{Marker, PresentationRoot};
use super::storage::{DurableStore, JsonFileStore, StorageError};
use super::theme::{ThemeMode, ThemeState};

type Callback = Arc<dyn Fn(ThemeMode) + Send + Sync>;

/// Identifies a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    slots: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    fn insert(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, callback));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }
}

struct Inner {
    state: ThemeState,
    /// Cleared once the durable store has failed; the session then stays in memory.
    persistent: bool,
}

pub struct ThemeStore {
    inner: Mutex<Inner>,
    storage: Box<dyn DurableStore>,
    root: Box<dyn PresentationRoot>,
    key: String,
    marker: Marker,
    subscribers: Arc<Mutex<Subscribers>>,
    // Serializes notification rounds and counts them; a round stops once a
    // newer one (started from inside a callback) has delivered a later mode.
    notify_round: ReentrantMutex<Cell<u64>>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ThemeStore")
            .field("state", &inner.state)
            .field("persistent", &inner.persistent)
            .field("key", &self.key)
            .field("marker", &self.marker)
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    pub fn new(
        config: &ThemeConfig,
        storage: impl DurableStore + 'static,
        root: impl PresentationRoot + 'static,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ThemeState::NotReady,
                persistent: true,
            }),
            storage: Box::new(storage),
            root: Box::new(root),
            key: config.storage_key.clone(),
            marker: Marker {
                attribute: config.marker_attribute.clone(),
                class: config.class_marker,
            },
            subscribers: Arc::default(),
            notify_round: ReentrantMutex::new(Cell::new(0)),
        }
    }

    /// Store backed by the JSON preferences file named in `config`.
    pub fn from_config(config: &ThemeConfig, root: impl PresentationRoot + 'static) -> Self {
        Self::new(config, JsonFileStore::new(&config.prefs_path), root)
    }

    /// Wraps the store in a shareable handle for consumer views.
    pub fn into_handle(self) -> ThemeHandle {
        ThemeHandle(Arc::new(self))
    }

    /// Loads the saved mode and marks the store ready.
    ///
    /// Only the first call has any effect; later calls return the current mode.
    pub fn initialize(&self) -> ThemeMode {
        let mode = {
            let mut inner = self.inner.lock();
            if let ThemeState::Ready(mode) = inner.state {
                debug!("theme store already initialized ({mode})");
                return mode;
            }
            let mode = self.load(&mut inner);
            inner.state = ThemeState::Ready(mode);
            self.marker.apply(self.root.as_ref(), mode);
            mode
        };
        debug!("theme store initialized with {mode}");
        self.notify();
        mode
    }

    /// The present mode, or the default while the store is not ready.
    pub fn current(&self) -> ThemeMode {
        self.state().mode().unwrap_or_default()
    }

    pub fn state(&self) -> ThemeState {
        self.inner.lock().state
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Whether changes are still being written to durable storage.
    pub fn is_persistent(&self) -> bool {
        self.inner.lock().persistent
    }

    /// Flips the mode, persists it and updates the root node marker.
    ///
    /// A store that was never initialized loads its saved mode first, so the
    /// flip always starts from the real preference.
    pub fn toggle(&self) -> ThemeMode {
        let next = {
            let mut inner = self.inner.lock();
            let from = match inner.state.mode() {
                Some(mode) => mode,
                None => self.load(&mut inner),
            };
            let next = from.toggled();
            inner.state = ThemeState::Ready(next);
            self.persist(&mut inner, next);
            self.marker.apply(self.root.as_ref(), next);
            next
        };
        debug!("theme toggled to {next}");
        self.notify();
        next
    }

    /// Registers `callback` to run with the new mode after every change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ThemeMode) + Send + Sync + 'static,
    {
        self.subscribers.lock().insert(Arc::new(callback))
    }

    /// Like [`subscribe`](Self::subscribe), but unsubscribes when the guard drops.
    pub fn subscribe_scoped<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ThemeMode) + Send + Sync + 'static,
    {
        let id = self.subscribe(callback);
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.lock().remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().slots.len()
    }

    fn load(&self, inner: &mut Inner) -> ThemeMode {
        if !inner.persistent {
            return ThemeMode::default();
        }
        match self.storage.get(&self.key) {
            Ok(Some(value)) => ThemeMode::parse_stored(&value).unwrap_or_else(|| {
                warn!("ignoring unrecognized stored theme {value:?}");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(err @ (StorageError::Corrupt { .. } | StorageError::InvalidEntry { .. })) => {
                warn!("ignoring unreadable theme preference: {err}");
                ThemeMode::default()
            }
            Err(err) => {
                warn!("theme preference will not persist this session: {err}");
                inner.persistent = false;
                ThemeMode::default()
            }
        }
    }

    fn persist(&self, inner: &mut Inner, mode: ThemeMode) {
        if !inner.persistent {
            return;
        }
        if let Err(err) = self.storage.set(&self.key, mode.as_str()) {
            warn!("theme preference will not persist this session: {err}");
            inner.persistent = false;
        }
    }

    fn notify(&self) {
        let rounds = self.notify_round.lock();
        let round = rounds.get() + 1;
        rounds.set(round);
        // Read after taking the lock so a later round can't be overtaken by an
        // earlier one carrying a stale mode.
        let mode = self.current();
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .slots
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            if rounds.get() != round {
                break;
            }
            callback(mode);
        }
    }
}

/// Unsubscribes its callback when dropped.
#[derive(Debug)]
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.lock().remove(self.id);
        }
    }
}

/// The capability handed to consumer views: read the mode, request a toggle,
/// and watch for changes. It never sets a mode directly.
#[derive(Debug, Clone)]
pub struct ThemeHandle(Arc<ThemeStore>);

impl ThemeHandle {
    pub fn initialize(&self) -> ThemeMode {
        self.0.initialize()
    }

    pub fn current(&self) -> ThemeMode {
        self.0.current()
    }

    pub fn state(&self) -> ThemeState {
        self.0.state()
    }

    pub fn toggle(&self) -> ThemeMode {
        self.0.toggle()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ThemeMode) + Send + Sync + 'static,
    {
        self.0.subscribe(callback)
    }

    pub fn subscribe_scoped<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ThemeMode) + Send + Sync + 'static,
    {
        self.0.subscribe_scoped(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.0.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::presentation::RootNode;
    use crate::shared::storage::{DisabledStore, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config() -> ThemeConfig {
        ThemeConfig {
            prefs_path: "unused.json".into(),
            ..ThemeConfig::default()
        }
    }

    fn store_with(storage: MemoryStore) -> (ThemeStore, RootNode) {
        let root = RootNode::new();
        (ThemeStore::new(&config(), storage, root.clone()), root)
    }

    #[test]
    fn not_ready_reads_default_and_leaves_root_unmarked() {
        let (store, root) = store_with(MemoryStore::with_entry("theme", "dark"));
        assert_eq!(store.state(), ThemeState::NotReady);
        assert_eq!(store.current(), ThemeMode::Light);
        assert_eq!(root.attribute("data-theme"), None);
        assert!(root.classes().is_empty());
    }

    #[test]
    fn initialize_adopts_stored_mode() {
        let (store, root) = store_with(MemoryStore::with_entry("theme", "dark"));
        assert_eq!(store.initialize(), ThemeMode::Dark);
        assert_eq!(store.state(), ThemeState::Ready(ThemeMode::Dark));
        assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
        assert!(root.has_class("dark"));
    }

    #[test]
    fn invalid_stored_values_fall_back_to_light() {
        for value in ["", "DARK", "system", " dark"] {
            let (store, _) = store_with(MemoryStore::with_entry("theme", value));
            assert_eq!(store.initialize(), ThemeMode::Light, "value {value:?}");
            assert!(store.is_persistent());
        }
    }

    #[test]
    fn initialize_is_idempotent_and_notifies_once() {
        let (store, _) = store_with(MemoryStore::with_entry("theme", "dark"));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = store.initialize();
        for _ in 0..3 {
            assert_eq!(store.initialize(), first);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn toggle_persists_and_marks_root() {
        let storage = MemoryStore::new();
        let (store, root) = store_with(storage.clone());
        store.initialize();

        assert_eq!(store.toggle(), ThemeMode::Dark);
        assert_eq!(storage.entry("theme").as_deref(), Some("dark"));
        assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
        assert!(root.has_class("dark") && !root.has_class("light"));

        assert_eq!(store.toggle(), ThemeMode::Light);
        assert_eq!(storage.entry("theme").as_deref(), Some("light"));
        assert!(root.has_class("light") && !root.has_class("dark"));
    }

    #[test]
    fn toggle_before_initialize_starts_from_saved_mode() {
        let (store, _) = store_with(MemoryStore::with_entry("theme", "dark"));
        assert_eq!(store.toggle(), ThemeMode::Light);
        assert!(store.is_ready());
        assert_eq!(store.initialize(), ThemeMode::Light);
    }

    #[test]
    fn unavailable_storage_degrades_to_memory() {
        let root = RootNode::new();
        let store = ThemeStore::new(&config(), DisabledStore, root.clone());

        assert_eq!(store.initialize(), ThemeMode::Light);
        assert!(!store.is_persistent());
        assert_eq!(store.toggle(), ThemeMode::Dark);
        assert_eq!(store.current(), ThemeMode::Dark);
        assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn subscribers_see_the_same_mode() {
        let (store, _) = store_with(MemoryStore::new());
        store.initialize();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            store.subscribe(move |mode| seen.lock().push(mode));
        }

        store.toggle();
        assert_eq!(*seen.lock(), vec![ThemeMode::Dark; 3]);
    }

    #[test]
    fn callbacks_may_read_the_store() {
        let handle = store_with(MemoryStore::new()).0.into_handle();
        handle.initialize();
        let observed = Arc::new(Mutex::new(None));
        let (reader, sink) = (handle.clone(), Arc::clone(&observed));
        handle.subscribe(move |mode| {
            *sink.lock() = Some((mode, reader.current()));
        });

        handle.toggle();
        assert_eq!(*observed.lock(), Some((ThemeMode::Dark, ThemeMode::Dark)));
    }

    #[test]
    fn toggle_from_a_callback_leaves_every_subscriber_on_the_final_mode() {
        let handle = store_with(MemoryStore::new()).0.into_handle();
        handle.initialize();
        let last_seen = Arc::new(Mutex::new(vec![None; 3]));
        let toggled_once = Arc::new(AtomicUsize::new(0));

        for slot in 0..3 {
            let (seen, store, toggled) =
                (Arc::clone(&last_seen), handle.clone(), Arc::clone(&toggled_once));
            handle.subscribe(move |mode| {
                seen.lock()[slot] = Some(mode);
                if slot == 0 && toggled.fetch_add(1, Ordering::SeqCst) == 0 {
                    store.toggle();
                }
            });
        }

        handle.toggle();
        let current = handle.current();
        assert_eq!(current, ThemeMode::Light);
        assert_eq!(*last_seen.lock(), vec![Some(current); 3]);
    }

    #[test]
    fn invalid_entry_in_storage_falls_back_to_light_and_keeps_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme":7,"visits":3}"#).unwrap();
        let root = RootNode::new();
        let store = ThemeStore::new(&config(), JsonFileStore::new(&path), root);

        assert_eq!(store.initialize(), ThemeMode::Light);
        assert!(store.is_persistent());
        store.toggle();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"dark\"") && written.contains("visits"));
    }

    #[test]
    fn unsubscribe_and_scoped_guard() {
        let (store, _) = store_with(MemoryStore::new());
        let id = store.subscribe(|_| {});
        let guard = store.subscribe_scoped(|_| {});
        assert_eq!(store.subscriber_count(), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        drop(guard);
        assert_eq!(store.subscriber_count(), 0);
    }
}
