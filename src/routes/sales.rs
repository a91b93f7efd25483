use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::sales::{CreateSaleRequest, SaleList, UpdateSaleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Sale,
    response::ApiResponse,
    routes::params::ListQuery,
    services::sale_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/{id}", get(get_sale).put(update_sale).delete(delete_sale))
        .route("/{id}/archive", patch(archive_sale))
        .route("/{id}/unarchive", patch(unarchive_sale))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    params(ListQuery),
    responses((status = 200, description = "List sales", body = ApiResponse<SaleList>)),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<SaleList>>> {
    Ok(Json(sale_service::list_sales(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    params(("id" = i32, Path, description = "Sale ID")),
    responses(
        (status = 200, description = "Get sale", body = ApiResponse<Sale>),
        (status = 404, description = "Sale not found"),
    ),
    tag = "Sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    Ok(Json(sale_service::get_sale(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale created", body = ApiResponse<Sale>),
        (status = 400, description = "Bad window, percent or scope"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSaleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sale>>)> {
    let resp = sale_service::create_sale(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    params(("id" = i32, Path, description = "Sale ID")),
    request_body = UpdateSaleRequest,
    responses((status = 200, description = "Updated sale", body = ApiResponse<Sale>)),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn update_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSaleRequest>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    Ok(Json(sale_service::update_sale(&state, &user, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    params(("id" = i32, Path, description = "Sale ID")),
    responses(
        (status = 200, description = "Deleted sale"),
        (status = 404, description = "Sale not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(sale_service::delete_sale(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/sales/{id}/archive",
    params(("id" = i32, Path, description = "Sale ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<Sale>)),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn archive_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    Ok(Json(sale_service::set_sale_archived(&state, &user, id, true).await?))
}

#[utoipa::path(
    patch,
    path = "/api/sales/{id}/unarchive",
    params(("id" = i32, Path, description = "Sale ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<Sale>)),
    security(("bearer_auth" = [])),
    tag = "Sales"
)]
pub async fn unarchive_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    Ok(Json(sale_service::set_sale_archived(&state, &user, id, false).await?))
}
