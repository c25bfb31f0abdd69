//! Route handlers for listing, creating, modifying and reordering the
//! categories visible to the authenticated user.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::Claims,
    models::{Category, CategoryName, DatabaseID, TransactionType},
    response::ApiResponse,
    state::AppState,
    stores::{CategoryPatch, CategoryStore, NewCategory},
};

#[derive(Debug, Deserialize)]
pub(crate) struct ListCategoriesParams {
    /// Restrict the listing to one type. Unknown values are ignored, so the
    /// full listing is returned rather than an error.
    r#type: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct CategoriesData {
    categories: Vec<Category>,
}

#[derive(Serialize)]
pub(crate) struct CategoryData {
    category: Category,
}

/// A route handler for listing the categories visible to the caller.
pub(crate) async fn list_categories(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<ListCategoriesParams>,
) -> Result<ApiResponse<CategoriesData>, Error> {
    let type_filter = params
        .r#type
        .as_deref()
        .and_then(|raw_type| raw_type.parse::<TransactionType>().ok());

    let categories = state.category_store.list(claims.user_id(), type_filter)?;

    Ok(ApiResponse::ok("ok", CategoriesData { categories }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCategoryBody {
    name: Option<String>,
    r#type: Option<String>,
    icon: Option<String>,
    color: Option<String>,
}

/// A route handler for creating a new category owned by the caller.
pub(crate) async fn create_category(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(body): Json<CreateCategoryBody>,
) -> Result<ApiResponse<CategoryData>, Error> {
    let (Some(name), Some(raw_type)) = (body.name, body.r#type) else {
        return Err(Error::MissingCategoryFields);
    };

    let category = state.category_store.create(NewCategory {
        user_id: claims.user_id(),
        name: CategoryName::new(&name)?,
        r#type: raw_type.parse()?,
        icon: body.icon,
        color: body.color,
    })?;

    Ok(ApiResponse::ok("created", CategoryData { category }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateCategoryBody {
    name: Option<String>,
    icon: Option<String>,
    color: Option<String>,
}

/// A route handler for renaming or restyling a category the caller owns.
pub(crate) async fn update_category(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(category_id): Path<DatabaseID>,
    Json(body): Json<UpdateCategoryBody>,
) -> Result<ApiResponse<CategoryData>, Error> {
    let name = body.name.as_deref().map(CategoryName::new).transpose()?;

    let category = state.category_store.update(
        claims.user_id(),
        category_id,
        CategoryPatch {
            name,
            icon: body.icon,
            color: body.color,
        },
    )?;

    Ok(ApiResponse::ok("updated", CategoryData { category }))
}

/// A route handler for deleting a category the caller owns.
pub(crate) async fn delete_category(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(category_id): Path<DatabaseID>,
) -> Result<ApiResponse<()>, Error> {
    state.category_store.delete(claims.user_id(), category_id)?;

    Ok(ApiResponse::message("deleted"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReorderBody {
    category_ids: Vec<DatabaseID>,
}

/// A route handler for reassigning the display order of categories.
///
/// The id list is applied as one atomic batch: the category at position
/// `index` receives sort order `index + 1`, and the whole request is rejected
/// when any id is not visible to the caller.
pub(crate) async fn reorder_categories(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(body): Json<ReorderBody>,
) -> Result<ApiResponse<()>, Error> {
    state
        .category_store
        .reorder(claims.user_id(), &body.category_ids)?;

    Ok(ApiResponse::message("reordered"))
}
