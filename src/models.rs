use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::store::{Document, FieldValue, Fields};

// --- Core Domain Record (Mapped to the Document Store) ---

/// Category
///
/// A category as read back from the `categories` collection. The title and
/// description hold whatever JSON value the client sent, since nothing
/// validates them on the way in; timestamps are the store-assigned values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Category {
    pub id: String,
    pub category_title: Option<Value>,
    pub description: Option<Value>,
    // Set once by the store on create.
    pub created_at: Option<DateTime<Utc>>,
    // Absent until the first update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    // Document field names. The text fields keep the wire casing.
    pub const TITLE_FIELD: &'static str = "categoryTitle";
    pub const DESCRIPTION_FIELD: &'static str = "description";
    pub const CREATED_AT_FIELD: &'static str = "created_at";
    pub const UPDATED_AT_FIELD: &'static str = "updated_at";

    /// Decodes a stored document. Missing, null or mistyped fields read as `None`.
    pub fn from_document(doc: Document) -> Self {
        let text = |name: &str| {
            doc.fields
                .get(name)
                .and_then(FieldValue::to_json)
                .filter(|value| !value.is_null())
        };
        let stamp = |name: &str| doc.fields.get(name).and_then(FieldValue::as_timestamp);

        Category {
            category_title: text(Self::TITLE_FIELD),
            description: text(Self::DESCRIPTION_FIELD),
            created_at: stamp(Self::CREATED_AT_FIELD),
            updated_at: stamp(Self::UPDATED_AT_FIELD),
            id: doc.id,
        }
    }
}

// --- Input Schemas (Request Body) ---

/// CategoryInput
///
/// Body of POST /categories and PUT /categories/{id}, accepted either
/// form-encoded or as JSON. Both fields are optional and untyped: an absent
/// field is stored as null, and any JSON value (`5`, `true`, a list) is
/// stored as sent. Form values always arrive as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub category_title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub description: Option<Value>,
}

impl CategoryInput {
    /// Text-valued input, the common case.
    pub fn text(category_title: &str, description: &str) -> Self {
        CategoryInput {
            category_title: Some(Value::from(category_title)),
            description: Some(Value::from(description)),
        }
    }

    /// The input fields as document values. Absent inputs overwrite with null.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            Category::TITLE_FIELD.to_string(),
            FieldValue::from(self.category_title.clone()),
        );
        fields.insert(
            Category::DESCRIPTION_FIELD.to_string(),
            FieldValue::from(self.description.clone()),
        );
        fields
    }
}

// --- Output Schemas (Response Body) ---

/// CategoryView
///
/// One entry of GET /categories. Timestamps are rendered with
/// `format_timestamp`; the raw store values never leave the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CategoryView {
    pub id: String,
    #[serde(rename = "categoryTitle", default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub category_title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub description: Option<Value>,
    /// e.g. "January 5, 2024, 3:04:05 PM", or null.
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        CategoryView {
            id: category.id,
            category_title: category.category_title,
            description: category.description,
            created_at: category.created_at.as_ref().map(format_timestamp),
            updated_at: category.updated_at.as_ref().map(format_timestamp),
        }
    }
}

/// CreateCategoryResponse
///
/// 201 body of POST /categories. Echoes the input only; the generated id is
/// not returned.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateCategoryResponse {
    pub message: String,
    pub data: CategoryInput,
}

/// ListCategoriesResponse
///
/// 200 body of GET /categories.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ListCategoriesResponse {
    pub success: bool,
    pub categories: Vec<CategoryView>,
}

/// UpdateCategoryResponse
///
/// 200 body of PUT /categories/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateCategoryResponse {
    pub success: bool,
    pub message: String,
    pub data: CategoryInput,
}

/// DeleteCategoryResponse
///
/// 200 body of DELETE /categories/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DeleteCategoryResponse {
    pub success: bool,
    pub message: String,
}

/// ErrorResponse
///
/// Body of every failed category request (404 and 500).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// format_timestamp
///
/// Renders a store timestamp the way the API has always shown it: en-US month
/// name, 12-hour clock, UTC, no zero padding on day or hour.
/// `2024-01-05T15:04:05Z` becomes `"January 5, 2024, 3:04:05 PM"`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y, %-I:%M:%S %p").to_string()
}
