use crate::{
    models::{Category, CategoryInput},
    store::{DocumentStoreState, FieldValue, StoreError},
};

/// CategoryRepository
///
/// Typed access to the `categories` collection. Each method is exactly one
/// document-store call; nothing is cached between requests.
#[derive(Clone)]
pub struct CategoryRepository {
    store: DocumentStoreState,
}

impl CategoryRepository {
    /// The fixed collection every category lives in.
    pub const COLLECTION: &'static str = "categories";

    pub fn new(store: DocumentStoreState) -> Self {
        Self { store }
    }

    /// create
    ///
    /// Adds a new category. The store assigns both the id (returned) and
    /// `created_at`.
    pub async fn create(&self, input: &CategoryInput) -> Result<String, StoreError> {
        let mut fields = input.to_fields();
        fields.insert(
            Category::CREATED_AT_FIELD.to_string(),
            FieldValue::ServerTimestamp,
        );
        self.store.add(Self::COLLECTION, fields).await
    }

    /// Every category in the collection, in store order.
    pub async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let docs = self.store.list(Self::COLLECTION).await?;
        Ok(docs.into_iter().map(Category::from_document).collect())
    }

    /// update
    ///
    /// Overwrites `categoryTitle` and `description` (absent inputs become
    /// null) and stamps `updated_at`. `created_at` is left untouched.
    pub async fn update(&self, id: &str, input: &CategoryInput) -> Result<(), StoreError> {
        let mut fields = input.to_fields();
        fields.insert(
            Category::UPDATED_AT_FIELD.to_string(),
            FieldValue::ServerTimestamp,
        );
        self.store.update(Self::COLLECTION, id, fields).await
    }

    /// Permanently removes a category. Unknown ids succeed.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(Self::COLLECTION, id).await
    }
}
