use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

/// FieldValue
///
/// A single typed value inside a document. The serialized form mirrors the
/// typed-value encoding used by schemaless document databases, so a stored
/// document stays self-describing (`{"stringValue": "Travel"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    #[serde(rename = "nullValue")]
    Null,
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "integerValue")]
    Integer(i64),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "arrayValue")]
    Array(Vec<FieldValue>),
    #[serde(rename = "mapValue")]
    Map(Fields),
    #[serde(rename = "timestampValue")]
    Timestamp(DateTime<Utc>),
    /// Write-only sentinel. The store replaces it with its own clock reading
    /// at write time; it is never persisted or returned from `list`.
    #[serde(skip)]
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Boolean(flag),
            Value::Number(n) => match n.as_i64() {
                Some(int) => FieldValue::Integer(int),
                // u64 beyond i64::MAX, or a fraction.
                None => FieldValue::Double(n.as_f64().unwrap_or_default()),
            },
            Value::String(text) => FieldValue::String(text),
            Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(name, value)| (name, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Option<Value>> for FieldValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::from)
    }
}

impl FieldValue {
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// The plain JSON form of a data value. Timestamps (and the sentinel)
    /// have none and are dropped, including from inside arrays and maps.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Null => Some(Value::Null),
            FieldValue::String(text) => Some(Value::String(text.clone())),
            FieldValue::Boolean(flag) => Some(Value::Bool(*flag)),
            FieldValue::Integer(int) => Some(Value::from(*int)),
            FieldValue::Double(float) => serde_json::Number::from_f64(*float).map(Value::Number),
            FieldValue::Array(items) => Some(Value::Array(
                items.iter().filter_map(FieldValue::to_json).collect(),
            )),
            FieldValue::Map(fields) => Some(Value::Object(
                fields
                    .iter()
                    .filter_map(|(name, value)| Some((name.clone(), value.to_json()?)))
                    .collect(),
            )),
            FieldValue::Timestamp(_) | FieldValue::ServerTimestamp => None,
        }
    }
}

/// Named fields of a document.
pub type Fields = BTreeMap<String, FieldValue>;

/// Document
///
/// A stored record as returned by `DocumentStore::list`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// StoreError
///
/// Failures surfaced by a `DocumentStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {id} not found in collection {collection}")]
    NotFound { collection: String, id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// DocumentStore Trait
///
/// The logical operations the service needs from a document database. Every
/// call is a single round-trip; implementations own all persisted state.
///
/// `Send + Sync + async_trait` keep `Arc<dyn DocumentStore>` shareable across
/// Axum's request tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and returns the identifier the store assigned.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Returns every document in the collection, in no particular order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Overwrites the named fields of an existing document. Fields not named
    /// in `fields` are kept. Fails with `StoreError::NotFound` if `id` is absent.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Permanently removes a document. Removing an absent id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// DocumentStoreState
///
/// The concrete type used to share the store across the application state.
pub type DocumentStoreState = Arc<dyn DocumentStore>;

/// Generates an opaque document identifier (32 lowercase hex characters).
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Splits `fields` into the values to persist verbatim and the names of the
/// fields the store must stamp with its own clock.
pub(crate) fn split_server_timestamps(fields: Fields) -> (Fields, Vec<String>) {
    let mut stamped = Vec::new();
    let values = fields
        .into_iter()
        .filter_map(|(name, value)| match value {
            FieldValue::ServerTimestamp => {
                stamped.push(name);
                None
            }
            other => Some((name, other)),
        })
        .collect();
    (values, stamped)
}
