use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{MarkerError, StoreError};
use crate::marker::Marker;

/// Key under which the whole marker collection is persisted.
pub const MARKERS_KEY: &str = "gta-markers";

// ---------------------------------------------------------------------------
// Key/value capability
// ---------------------------------------------------------------------------

/// A string-keyed store of string values.
///
/// The marker store is its only writer. Implementations must treat
/// deleting a missing key as success.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Marker store
// ---------------------------------------------------------------------------

/// The in-memory marker collection, written through to a [`KeyValueStore`].
///
/// The in-memory list is authoritative during a session. Every mutation
/// serializes the whole list and writes it before returning; if that write
/// fails the list is left untouched.
pub struct MarkerStore<S: KeyValueStore> {
    store: S,
    key: String,
    markers: Vec<Marker>,
}

impl<S: KeyValueStore> MarkerStore<S> {
    /// Load the collection stored under [`MARKERS_KEY`].
    ///
    /// A missing key means no markers. A payload that cannot be read or
    /// parsed is reported as [`MarkerError::PersistenceRead`].
    pub fn initialize(store: S) -> crate::Result<Self> {
        Self::initialize_with_key(store, MARKERS_KEY)
    }

    pub fn initialize_with_key(store: S, key: &str) -> crate::Result<Self> {
        let markers = load_markers(&store, key)?;
        info!("Loaded {} markers from {key:?}", markers.len());
        Ok(Self {
            store,
            key: key.to_string(),
            markers,
        })
    }

    /// Like [`initialize`](Self::initialize), but a bad payload degrades to
    /// an empty collection. The error is handed back so the caller can
    /// tell the user.
    pub fn initialize_or_empty(store: S) -> (Self, Option<MarkerError>) {
        match load_markers(&store, MARKERS_KEY) {
            Ok(markers) => {
                info!("Loaded {} markers from {MARKERS_KEY:?}", markers.len());
                (
                    Self {
                        store,
                        key: MARKERS_KEY.to_string(),
                        markers,
                    },
                    None,
                )
            }
            Err(e) => {
                warn!("Starting with no markers: {e}");
                (
                    Self {
                        store,
                        key: MARKERS_KEY.to_string(),
                        markers: Vec::new(),
                    },
                    Some(e),
                )
            }
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// The backing store (for inspection in tests and diagnostics).
    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append one marker. Callers must not reuse ids.
    pub fn add(&mut self, marker: Marker) -> crate::Result<&[Marker]> {
        debug!("Adding marker {} ({})", marker.id, marker.display_title());
        let mut next = self.markers.clone();
        next.push(marker);
        self.commit(next)
    }

    /// Append a sequence of markers with a single write.
    ///
    /// An empty batch does not touch the store.
    pub fn add_batch(&mut self, markers: Vec<Marker>) -> crate::Result<&[Marker]> {
        if markers.is_empty() {
            return Ok(&self.markers);
        }
        let count = markers.len();
        let mut next = self.markers.clone();
        next.extend(markers);
        self.commit(next)?;
        info!("Imported {count} markers");
        Ok(&self.markers)
    }

    /// Remove the marker with `id`. An unknown id is not an error.
    ///
    /// Removing the last marker deletes the persisted key, so the store reads
    /// back exactly as it did before the first add.
    pub fn remove(&mut self, id: &str) -> crate::Result<&[Marker]> {
        let next: Vec<Marker> = self
            .markers
            .iter()
            .filter(|m| m.id != id)
            .cloned()
            .collect();
        if next.len() == self.markers.len() {
            debug!("Remove: no marker with id {id}");
        } else {
            info!("Removing marker {id}");
        }
        if next.is_empty() {
            self.delete_persisted()?;
            self.markers = next;
            return Ok(&self.markers);
        }
        self.commit(next)
    }

    /// Drop every marker and delete the persisted key.
    pub fn clear(&mut self) -> crate::Result<&[Marker]> {
        self.delete_persisted()?;
        info!("Cleared {} markers", self.markers.len());
        self.markers.clear();
        Ok(&self.markers)
    }

    // -- Internal helpers ---------------------------------------------------

    fn delete_persisted(&mut self) -> crate::Result<()> {
        self.store
            .delete(&self.key)
            .map_err(|e| MarkerError::PersistenceWrite {
                key: self.key.clone(),
                reason: e.to_string(),
            })
    }

    /// Persist `next` and, only once that succeeded, adopt it.
    ///
    /// Non-finite coordinates would serialize as `null` and make the payload
    /// unreadable, so they are refused before anything is written.
    fn commit(&mut self, next: Vec<Marker>) -> crate::Result<&[Marker]> {
        if let Some((axis, value)) = next.iter().find_map(non_finite_axis) {
            return Err(MarkerError::InvalidCoordinate {
                axis,
                input: value.to_string(),
            });
        }
        let json = serde_json::to_string(&next).map_err(|e| MarkerError::PersistenceWrite {
            key: self.key.clone(),
            reason: e.to_string(),
        })?;
        self.store
            .write(&self.key, &json)
            .map_err(|e| MarkerError::PersistenceWrite {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        debug!("Wrote {} markers to {:?}", next.len(), self.key);
        self.markers = next;
        Ok(&self.markers)
    }
}

fn non_finite_axis(marker: &Marker) -> Option<(&'static str, f64)> {
    if !marker.x.is_finite() {
        Some(("x", marker.x))
    } else if !marker.y.is_finite() {
        Some(("y", marker.y))
    } else {
        None
    }
}

fn load_markers<S: KeyValueStore>(store: &S, key: &str) -> crate::Result<Vec<Marker>> {
    let payload = store.read(key).map_err(|e| MarkerError::PersistenceRead {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    match payload {
        None => Ok(Vec::new()),
        Some(json) => serde_json::from_str(&json).map_err(|e| MarkerError::PersistenceRead {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::marker::{MarkerDraft, MonotonicIds};

    fn marker(ids: &mut MonotonicIds, x: f64, y: f64, title: &str) -> Marker {
        MarkerDraft::new(x, y, Some(title.to_string()), None).commit(ids, 1_000)
    }

    /// Accepts reads, rejects every write and delete.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.read(key)
        }
        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
        fn delete(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn initialize_missing_key_is_empty() {
        let store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        assert!(store.is_empty());
        assert!(!store.backend().contains_key(MARKERS_KEY));
    }

    #[test]
    fn initialize_malformed_payload_is_read_error() {
        let backend = MemoryStore::with_entry(MARKERS_KEY, "{not json");
        let err = MarkerStore::initialize(backend).err().unwrap();
        assert!(matches!(err, MarkerError::PersistenceRead { .. }));
    }

    #[test]
    fn initialize_or_empty_degrades() {
        let backend = MemoryStore::with_entry(MARKERS_KEY, "[{\"id\":1}]");
        let (store, err) = MarkerStore::initialize_or_empty(backend);
        assert!(store.is_empty());
        assert!(matches!(err, Some(MarkerError::PersistenceRead { .. })));
    }

    #[test]
    fn add_writes_through() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        let m = marker(&mut ids, 1.0, 2.0, "A");
        let list = store.add(m.clone()).unwrap();
        assert_eq!(list, &[m.clone()]);

        let persisted: Vec<Marker> =
            serde_json::from_str(store.backend().get(MARKERS_KEY).unwrap()).unwrap();
        assert_eq!(persisted, vec![m]);
    }

    #[test]
    fn add_then_remove_restores_prior_state() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 1.0, 2.0, "Existing")).unwrap();
        let before_list = store.markers().to_vec();
        let before_payload = store.backend().get(MARKERS_KEY).unwrap().to_string();

        let extra = marker(&mut ids, 3.0, 4.0, "Extra");
        let extra_id = extra.id.clone();
        store.add(extra).unwrap();
        store.remove(&extra_id).unwrap();

        assert_eq!(store.markers(), before_list.as_slice());
        assert_eq!(store.backend().get(MARKERS_KEY).unwrap(), before_payload);
    }

    #[test]
    fn removing_last_marker_deletes_key() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        let only = marker(&mut ids, 1.0, 2.0, "Only");
        let id = only.id.clone();
        store.add(only).unwrap();
        assert!(store.backend().contains_key(MARKERS_KEY));

        assert!(store.remove(&id).unwrap().is_empty());
        assert!(!store.backend().contains_key(MARKERS_KEY));
    }

    #[test]
    fn non_finite_marker_is_refused() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 1.0, 2.0, "Keep")).unwrap();
        let payload = store.backend().get(MARKERS_KEY).unwrap().to_string();

        let err = store
            .add(marker(&mut ids, 3.0, f64::INFINITY, "Broken"))
            .err()
            .unwrap();
        assert!(matches!(err, MarkerError::InvalidCoordinate { axis: "y", .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().get(MARKERS_KEY).unwrap(), payload);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 1.0, 2.0, "A")).unwrap();
        let list = store.remove("does-not-exist").unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn empty_batch_is_noop() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 1.0, 2.0, "A")).unwrap();
        let payload = store.backend().get(MARKERS_KEY).unwrap().to_string();

        store.add_batch(Vec::new()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().get(MARKERS_KEY).unwrap(), payload);
    }

    #[test]
    fn empty_batch_on_fresh_store_writes_nothing() {
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add_batch(Vec::new()).unwrap();
        assert!(!store.backend().contains_key(MARKERS_KEY));
    }

    #[test]
    fn add_batch_preserves_order() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 0.0, 0.0, "First")).unwrap();
        let batch = vec![
            marker(&mut ids, 1.0, 1.0, "B1"),
            marker(&mut ids, 2.0, 2.0, "B2"),
        ];
        let titles: Vec<&str> = store
            .add_batch(batch)
            .unwrap()
            .iter()
            .map(|m| m.display_title())
            .collect();
        assert_eq!(titles, vec!["First", "B1", "B2"]);
    }

    #[test]
    fn clear_deletes_key_and_is_idempotent() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 1.0, 2.0, "A")).unwrap();
        assert!(store.clear().unwrap().is_empty());
        assert!(!store.backend().contains_key(MARKERS_KEY));

        assert!(store.clear().unwrap().is_empty());
        assert!(!store.backend().contains_key(MARKERS_KEY));
    }

    #[test]
    fn failed_write_leaves_collection_unchanged() {
        let mut ids = MonotonicIds::new();
        let m = marker(&mut ids, 1.0, 2.0, "A");
        let payload = serde_json::to_string(&vec![m.clone()]).unwrap();
        let backend = ReadOnlyStore(MemoryStore::with_entry(MARKERS_KEY, &payload));
        let mut store = MarkerStore::initialize(backend).unwrap();

        let err = store.add(marker(&mut ids, 3.0, 4.0, "B")).err().unwrap();
        assert!(matches!(err, MarkerError::PersistenceWrite { .. }));
        assert_eq!(store.markers(), &[m.clone()]);

        assert!(store.remove(&m.id).is_err());
        assert_eq!(store.len(), 1);

        assert!(store.clear().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rehydrates_after_restart() {
        let mut ids = MonotonicIds::new();
        let mut store = MarkerStore::initialize(MemoryStore::new()).unwrap();
        store.add(marker(&mut ids, 1.0, 2.0, "A")).unwrap();
        store.add(marker(&mut ids, 3.0, 4.0, "B")).unwrap();
        let expected = store.markers().to_vec();

        let backend = store.backend().clone();
        let reloaded = MarkerStore::initialize(backend).unwrap();
        assert_eq!(reloaded.markers(), expected.as_slice());
        assert_eq!(reloaded.find(&expected[1].id), Some(&expected[1]));
    }
}
