use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::{
        products::StockTotals,
        sizes::{CreateSizeRequest, SizeList, SizeWrite, UpdateSizeRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Size,
    response::ApiResponse,
    routes::params::ChildListQuery,
    services::size_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sizes).post(create_size))
        .route("/{id}", get(get_size).put(update_size).delete(delete_size))
        .route("/{id}/archive", patch(archive_size))
        .route("/{id}/unarchive", patch(unarchive_size))
}

#[utoipa::path(
    get,
    path = "/api/sizes",
    params(ChildListQuery),
    responses((status = 200, description = "List sizes, parent_id filters by variant", body = ApiResponse<SizeList>)),
    tag = "Sizes"
)]
pub async fn list_sizes(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> AppResult<Json<ApiResponse<SizeList>>> {
    Ok(Json(size_service::list_sizes(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/sizes/{id}",
    params(("id" = i32, Path, description = "Size ID")),
    responses(
        (status = 200, description = "Get size", body = ApiResponse<Size>),
        (status = 404, description = "Size not found"),
    ),
    tag = "Sizes"
)]
pub async fn get_size(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Size>>> {
    Ok(Json(size_service::get_size(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sizes",
    request_body = CreateSizeRequest,
    responses(
        (status = 201, description = "Size created", body = ApiResponse<SizeWrite>),
        (status = 400, description = "Variant missing or single-size"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn create_size(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSizeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SizeWrite>>)> {
    let resp = size_service::create_size(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/sizes/{id}",
    params(("id" = i32, Path, description = "Size ID")),
    request_body = UpdateSizeRequest,
    responses(
        (status = 200, description = "Updated size", body = ApiResponse<SizeWrite>),
        (status = 404, description = "Size not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn update_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSizeRequest>,
) -> AppResult<Json<ApiResponse<SizeWrite>>> {
    let resp = size_service::update_size(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sizes/{id}",
    params(("id" = i32, Path, description = "Size ID")),
    responses(
        (status = 200, description = "Deleted size", body = ApiResponse<StockTotals>),
        (status = 404, description = "Size not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn delete_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<StockTotals>>> {
    Ok(Json(size_service::delete_size(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/sizes/{id}/archive",
    params(("id" = i32, Path, description = "Size ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<SizeWrite>)),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn archive_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SizeWrite>>> {
    Ok(Json(size_service::set_size_archived(&state, &user, id, true).await?))
}

#[utoipa::path(
    patch,
    path = "/api/sizes/{id}/unarchive",
    params(("id" = i32, Path, description = "Size ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<SizeWrite>)),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn unarchive_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SizeWrite>>> {
    Ok(Json(size_service::set_size_archived(&state, &user, id, false).await?))
}
