use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::{
        inventory::{CreateInventoryRequest, InventoryList, InventoryWrite, UpdateInventoryRequest},
        products::StockTotals,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Inventory,
    response::ApiResponse,
    routes::params::ChildListQuery,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route(
            "/{id}",
            get(get_inventory)
                .put(update_inventory)
                .delete(delete_inventory),
        )
        .route("/{id}/archive", patch(archive_inventory))
        .route("/{id}/unarchive", patch(unarchive_inventory))
}

#[utoipa::path(
    get,
    path = "/api/inventory",
    params(ChildListQuery),
    responses((status = 200, description = "Stock rows per location, parent_id filters by variant", body = ApiResponse<InventoryList>)),
    tag = "Inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> AppResult<Json<ApiResponse<InventoryList>>> {
    Ok(Json(inventory_service::list_inventory(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory row ID")),
    responses(
        (status = 200, description = "Get inventory row", body = ApiResponse<Inventory>),
        (status = 404, description = "Inventory row not found"),
    ),
    tag = "Inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Inventory>>> {
    Ok(Json(inventory_service::get_inventory(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = CreateInventoryRequest,
    responses(
        (status = 201, description = "Inventory row created", body = ApiResponse<InventoryWrite>),
        (status = 400, description = "Variant missing, multi-size or location taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInventoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<InventoryWrite>>)> {
    let resp = inventory_service::create_inventory(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory row ID")),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Updated inventory row", body = ApiResponse<InventoryWrite>),
        (status = 404, description = "Inventory row not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> AppResult<Json<ApiResponse<InventoryWrite>>> {
    let resp = inventory_service::update_inventory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory row ID")),
    responses(
        (status = 200, description = "Deleted inventory row", body = ApiResponse<StockTotals>),
        (status = 404, description = "Inventory row not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn delete_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<StockTotals>>> {
    Ok(Json(inventory_service::delete_inventory(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/{id}/archive",
    params(("id" = i32, Path, description = "Inventory row ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<InventoryWrite>)),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn archive_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<InventoryWrite>>> {
    let resp = inventory_service::set_inventory_archived(&state, &user, id, true).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/{id}/unarchive",
    params(("id" = i32, Path, description = "Inventory row ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<InventoryWrite>)),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn unarchive_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<InventoryWrite>>> {
    let resp = inventory_service::set_inventory_archived(&state, &user, id, false).await?;
    Ok(Json(resp))
}
