use log::{debug, error, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::storage::{Origin, Storage, StorageEvent};
use crate::error::{BrowserError, Result};

/// Storage key of the favorites slot
pub const FAVORITES_KEY: &str = "selectedRecipes";

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

/// Favorite recipe ids persisted in a single storage slot.
///
/// Every read goes to storage. Read and write failures are logged and never
/// returned to the caller. Concurrent writers from other handles are not
/// coordinated: the last write wins.
pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    origin: Origin,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// All favorite ids in insertion order; empty when absent or unreadable
    pub fn get_all(&self) -> Vec<String> {
        match self.read() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Error reading favorites, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    fn read(&self) -> Result<Vec<String>> {
        let stored = self
            .storage
            .get_item(FAVORITES_KEY)
            .map_err(|e| BrowserError::PersistenceReadError(e.to_string()))?;

        match stored {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| BrowserError::PersistenceReadError(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, ids: &[String]) {
        let result = serde_json::to_string(ids)
            .map_err(BrowserError::from)
            .and_then(|raw| {
                self.storage
                    .set_item(FAVORITES_KEY, &raw, self.origin)
                    .map_err(BrowserError::from)
            });

        if let Err(e) = result {
            error!("Error saving favorites: {}", e);
        }
    }

    pub fn add(&self, id: &str) {
        let mut ids = self.get_all();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
            self.save(&ids);
        }
    }

    pub fn remove(&self, id: &str) {
        let mut ids = self.get_all();
        ids.retain(|existing| existing != id);
        self.save(&ids);
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.get_all().iter().any(|existing| existing == id)
    }

    /// Add `id` if absent, otherwise remove it. Returns the new membership.
    pub fn toggle(&self, id: &str) -> bool {
        if self.is_selected(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Remove the slot entirely
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(FAVORITES_KEY, self.origin) {
            error!("Error clearing favorites: {}", e);
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.storage.subscribe()
    }
}

/// In-memory view of the favorites for one context, kept in step with
/// writes made through other [`FavoritesStore`] handles.
///
/// The view registers for storage notifications when created and
/// deregisters when dropped.
pub struct FavoritesView {
    store: FavoritesStore,
    events: broadcast::Receiver<StorageEvent>,
    ids: Vec<String>,
}

impl FavoritesView {
    pub fn new(store: FavoritesStore) -> Self {
        let events = store.subscribe();
        let ids = store.get_all();
        Self { store, events, ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    pub fn add(&mut self, id: &str) {
        self.store.add(id);
        if !self.is_selected(id) {
            self.ids.push(id.to_string());
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.store.remove(id);
        self.ids.retain(|existing| existing != id);
    }

    /// Toggle against the persisted state, not the cached one
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.store.is_selected(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Remove every favorite one by one
    pub fn remove_all(&mut self) {
        for id in self.ids.clone() {
            self.remove(&id);
        }
    }

    /// Remove the persisted slot and empty the view
    pub fn clear(&mut self) {
        self.store.clear();
        self.ids.clear();
    }

    fn is_external(&self, event: &StorageEvent) -> bool {
        event.key == FAVORITES_KEY && event.origin != self.store.origin()
    }

    fn reload(&mut self) {
        self.ids = self.store.get_all();
        debug!("Reloaded {} favorites after external change", self.ids.len());
    }

    /// Apply pending notifications without waiting. Returns whether the view
    /// was reloaded.
    pub fn poll(&mut self) -> bool {
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => stale |= self.is_external(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Missed {} storage notifications", skipped);
                    stale = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if stale {
            self.reload();
        }
        stale
    }

    /// Wait for the next external change and reload. Returns `false` once
    /// the storage stops publishing.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.events.recv().await {
                Ok(event) if self.is_external(&event) => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => break,
                Err(RecvError::Closed) => return false,
            }
        }
        self.reload();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::storage::MemoryStorage;

    fn store() -> FavoritesStore {
        FavoritesStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_empty_when_absent() {
        assert!(store().get_all().is_empty());
    }

    #[test]
    fn test_add_is_unique_and_ordered() {
        let store = store();
        store.add("3");
        store.add("1");
        store.add("3");
        assert_eq!(store.get_all(), vec!["3", "1"]);
    }

    #[test]
    fn test_add_remove_round_trip() {
        let store = store();
        store.add("52772");
        assert!(store.is_selected("52772"));
        store.remove("52772");
        assert!(!store.is_selected("52772"));
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        let store = store();
        store.add("a");

        assert!(!store.toggle("a"));
        assert!(store.toggle("a"));
        assert!(store.is_selected("a"));

        assert!(store.toggle("b"));
        assert!(!store.toggle("b"));
        assert!(!store.is_selected("b"));
    }

    #[test]
    fn test_remove_drops_every_occurrence() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(FAVORITES_KEY, r#"["x","y","x"]"#, 0)
            .unwrap();

        let store = FavoritesStore::new(storage);
        store.remove("x");
        assert_eq!(store.get_all(), vec!["y"]);
    }

    #[test]
    fn test_corrupt_slot_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(FAVORITES_KEY, "{not json", 0).unwrap();

        let store = FavoritesStore::new(storage.clone());
        assert!(store.get_all().is_empty());
        assert!(matches!(store.read(), Err(BrowserError::PersistenceReadError(_))));

        store.add("1");
        assert_eq!(store.get_all(), vec!["1"]);
    }

    #[test]
    fn test_clear_removes_slot() {
        let storage = Arc::new(MemoryStorage::new());
        let store = FavoritesStore::new(storage.clone());
        store.add("1");
        store.clear();
        assert_eq!(storage.get_item(FAVORITES_KEY).unwrap(), None);
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_view_ignores_own_writes_and_reloads_on_external_ones() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut view = FavoritesView::new(FavoritesStore::new(storage.clone()));
        let other_tab = FavoritesStore::new(storage);

        view.add("1");
        assert!(!view.poll());
        assert_eq!(view.ids(), ["1"]);

        other_tab.add("2");
        assert_eq!(view.ids(), ["1"]);
        assert!(view.poll());
        assert_eq!(view.ids(), ["1", "2"]);

        other_tab.clear();
        assert!(view.poll());
        assert_eq!(view.count(), 0);
    }

    #[test]
    fn test_view_ignores_other_keys() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut view = FavoritesView::new(FavoritesStore::new(storage.clone()));

        storage.set_item("theme", "dark", 999).unwrap();
        assert!(!view.poll());
    }

    #[test]
    fn test_view_toggle_and_remove_all() {
        let mut view = FavoritesView::new(store());
        assert!(view.toggle("1"));
        assert!(view.toggle("2"));
        assert!(!view.toggle("1"));
        assert_eq!(view.ids(), ["2"]);

        view.add("3");
        view.remove_all();
        assert_eq!(view.count(), 0);
        assert!(view.store().get_all().is_empty());
    }

    #[tokio::test]
    async fn test_view_waits_for_external_change() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut view = FavoritesView::new(FavoritesStore::new(storage.clone()));
        let other_tab = FavoritesStore::new(storage);

        let writer = tokio::spawn(async move {
            other_tab.add("42");
        });

        assert!(view.changed().await);
        assert_eq!(view.ids(), ["42"]);
        writer.await.unwrap();
    }
}
