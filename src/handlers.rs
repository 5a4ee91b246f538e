use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    extract::FormOrJson,
    models::{
        CategoryInput, CategoryView, CreateCategoryResponse, DeleteCategoryResponse,
        ErrorResponse, ListCategoriesResponse, UpdateCategoryResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// --- Handlers ---
//
// Every handler sits behind the auth middleware and receives the resolved
// `AuthUser`; each performs exactly one store call through the repository.

/// create_category
///
/// [Authenticated Route] Adds a new category. The response echoes the
/// submitted fields; the generated id and `created_at` are not returned.
#[utoipa::path(
    post,
    path = "/categories",
    request_body(content(
        (CategoryInput = "application/x-www-form-urlencoded"),
        (CategoryInput = "application/json")
    )),
    responses(
        (status = 201, description = "Created", body = CreateCategoryResponse),
        (status = 401, description = "Missing or invalid credential"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_category(
    AuthUser { uid }: AuthUser,
    State(state): State<AppState>,
    FormOrJson(input): FormOrJson<CategoryInput>,
) -> Result<(StatusCode, Json<CreateCategoryResponse>), ApiError> {
    let id = state.repo.create(&input).await.map_err(|e| {
        tracing::error!("create_category failed: {}", e);
        ApiError::from(e)
    })?;
    tracing::info!(uid = %uid, category_id = %id, "category created");

    Ok((
        StatusCode::CREATED,
        Json(CreateCategoryResponse {
            message: "Added a new category successfully".to_string(),
            data: input,
        }),
    ))
}

/// list_categories
///
/// [Authenticated Route] Lists every category with rendered timestamps.
/// An empty collection is a normal 200 with an empty array.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories", body = ListCategoriesResponse),
        (status = 401, description = "Missing or invalid credential"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_categories(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let categories = state.repo.list().await.map_err(|e| {
        tracing::error!("list_categories failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ListCategoriesResponse {
        success: true,
        categories: categories.into_iter().map(CategoryView::from).collect(),
    }))
}

/// update_category
///
/// [Authenticated Route] Replaces a category's title and description and
/// stamps `updated_at`. Returns 200 with a body; an unknown id is a 404.
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = String, Path, description = "Category ID")),
    request_body(content(
        (CategoryInput = "application/x-www-form-urlencoded"),
        (CategoryInput = "application/json")
    )),
    responses(
        (status = 200, description = "Updated", body = UpdateCategoryResponse),
        (status = 401, description = "Missing or invalid credential"),
        (status = 404, description = "Not Found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn update_category(
    AuthUser { uid }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormOrJson(input): FormOrJson<CategoryInput>,
) -> Result<Json<UpdateCategoryResponse>, ApiError> {
    state.repo.update(&id, &input).await.map_err(|e| {
        tracing::error!("update_category {} failed: {}", id, e);
        ApiError::from(e)
    })?;
    tracing::info!(uid = %uid, category_id = %id, "category updated");

    Ok(Json(UpdateCategoryResponse {
        success: true,
        message: format!("Category with ID {} updated successfully", id),
        data: input,
    }))
}

/// delete_category
///
/// [Authenticated Route] Permanently deletes a category. Deleting an id that
/// does not exist succeeds the same way.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteCategoryResponse),
        (status = 401, description = "Missing or invalid credential"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    AuthUser { uid }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCategoryResponse>, ApiError> {
    state.repo.delete(&id).await.map_err(|e| {
        tracing::error!("delete_category {} failed: {}", id, e);
        ApiError::from(e)
    })?;
    tracing::info!(uid = %uid, category_id = %id, "category deleted");

    Ok(Json(DeleteCategoryResponse {
        success: true,
        message: format!("Category with ID {} deleted successfully", id),
    }))
}
