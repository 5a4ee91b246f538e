use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio::sync::{Mutex, RwLock};

use super::{Document, DocumentStore, FieldValue, Fields, StoreError, new_document_id};

/// MemoryDocumentStore
///
/// An in-process `DocumentStore` used for local development (no `DATABASE_URL`)
/// and for tests. It keeps the store-side semantics of the Postgres backend:
/// ids and server timestamps are assigned here, never by the caller.
///
/// Every stamp is strictly later than the previous one, so an update always
/// sorts after the create that preceded it even inside one clock tick.
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
    last_stamp: Mutex<Option<DateTime<Utc>>>,
    calls: AtomicUsize,
    /// When true, every operation returns a simulated failure.
    pub should_fail: bool,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            last_stamp: Mutex::new(None),
            calls: AtomicUsize::new(0),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// Number of store operations attempted so far (including failed ones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seeds a document with explicit field values, bypassing the sentinel
    /// resolution. Does not count as a call.
    pub async fn insert_raw(&self, collection: &str, id: &str, fields: Fields) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    fn begin(&self, op: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(StoreError::Unavailable(format!(
                "simulated {} failure",
                op
            )));
        }
        Ok(())
    }

    async fn next_stamp(&self) -> DateTime<Utc> {
        let mut last = self.last_stamp.lock().await;
        let now = Utc::now();
        let stamp = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }

    async fn resolve(&self, fields: Fields) -> Fields {
        let mut resolved = Fields::new();
        for (name, value) in fields {
            let value = match value {
                FieldValue::ServerTimestamp => FieldValue::Timestamp(self.next_stamp().await),
                other => other,
            };
            resolved.insert(name, value);
        }
        resolved
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.begin("add")?;
        let fields = self.resolve(fields).await;
        let id = new_document_id();

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.begin("list")?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.begin("update")?;
        let fields = self.resolve(fields).await;

        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        existing.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.begin("delete")?;
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
