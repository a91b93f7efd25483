use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::categories::{CreateSubCategoryRequest, SubCategoryList, UpdateSubCategoryRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::SubCategory,
    response::ApiResponse,
    routes::params::ChildListQuery,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sub_categories).post(create_sub_category))
        .route(
            "/{id}",
            get(get_sub_category)
                .put(update_sub_category)
                .delete(delete_sub_category),
        )
        .route("/{id}/archive", patch(archive_sub_category))
        .route("/{id}/unarchive", patch(unarchive_sub_category))
}

/// `parent_id` filters by category.
#[utoipa::path(
    get,
    path = "/api/sub-categories",
    params(ChildListQuery),
    responses(
        (status = 200, description = "List sub-categories", body = ApiResponse<SubCategoryList>)
    ),
    tag = "Sub-categories"
)]
pub async fn list_sub_categories(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> AppResult<Json<ApiResponse<SubCategoryList>>> {
    Ok(Json(category_service::list_sub_categories(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/sub-categories/{id}",
    params(("id" = i32, Path, description = "Sub-category ID")),
    responses(
        (status = 200, description = "Get sub-category", body = ApiResponse<SubCategory>),
        (status = 404, description = "Sub-category not found"),
    ),
    tag = "Sub-categories"
)]
pub async fn get_sub_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SubCategory>>> {
    Ok(Json(category_service::get_sub_category(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sub-categories",
    request_body = CreateSubCategoryRequest,
    responses(
        (status = 201, description = "Create sub-category", body = ApiResponse<SubCategory>)
    ),
    security(("bearer_auth" = [])),
    tag = "Sub-categories"
)]
pub async fn create_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSubCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SubCategory>>)> {
    let resp = category_service::create_sub_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/sub-categories/{id}",
    params(("id" = i32, Path, description = "Sub-category ID")),
    request_body = UpdateSubCategoryRequest,
    responses(
        (status = 200, description = "Updated sub-category", body = ApiResponse<SubCategory>)
    ),
    security(("bearer_auth" = [])),
    tag = "Sub-categories"
)]
pub async fn update_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSubCategoryRequest>,
) -> AppResult<Json<ApiResponse<SubCategory>>> {
    let resp = category_service::update_sub_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sub-categories/{id}",
    params(("id" = i32, Path, description = "Sub-category ID")),
    responses((status = 200, description = "Deleted sub-category")),
    security(("bearer_auth" = [])),
    tag = "Sub-categories"
)]
pub async fn delete_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(category_service::delete_sub_category(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/sub-categories/{id}/archive",
    params(("id" = i32, Path, description = "Sub-category ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<SubCategory>)),
    security(("bearer_auth" = [])),
    tag = "Sub-categories"
)]
pub async fn archive_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SubCategory>>> {
    let resp = category_service::set_sub_category_archived(&state, &user, id, true).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/sub-categories/{id}/unarchive",
    params(("id" = i32, Path, description = "Sub-category ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<SubCategory>)),
    security(("bearer_auth" = [])),
    tag = "Sub-categories"
)]
pub async fn unarchive_sub_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SubCategory>>> {
    let resp = category_service::set_sub_category_archived(&state, &user, id, false).await?;
    Ok(Json(resp))
}
