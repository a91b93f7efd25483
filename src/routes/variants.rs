use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::{
        products::StockTotals,
        variants::{CreateVariantRequest, UpdateVariantRequest, VariantList, VariantWrite},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ProductVariant,
    response::ApiResponse,
    routes::params::ChildListQuery,
    services::variant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_variants).post(create_variant))
        .route(
            "/{id}",
            get(get_variant).put(update_variant).delete(delete_variant),
        )
        .route("/{id}/archive", patch(archive_variant))
        .route("/{id}/unarchive", patch(unarchive_variant))
}

/// `parent_id` filters by product.
#[utoipa::path(
    get,
    path = "/api/variants",
    params(ChildListQuery),
    responses((status = 200, description = "List variants", body = ApiResponse<VariantList>)),
    tag = "Variants"
)]
pub async fn list_variants(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> AppResult<Json<ApiResponse<VariantList>>> {
    Ok(Json(variant_service::list_variants(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/variants/{id}",
    params(("id" = i32, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Get variant", body = ApiResponse<ProductVariant>),
        (status = 404, description = "Variant not found"),
    ),
    tag = "Variants"
)]
pub async fn get_variant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    Ok(Json(variant_service::get_variant(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/variants",
    request_body = CreateVariantRequest,
    responses(
        (status = 201, description = "Variant created; totals hold the rolled-up quantities", body = ApiResponse<VariantWrite>),
        (status = 400, description = "Invalid variant"),
    ),
    security(("bearer_auth" = [])),
    tag = "Variants"
)]
pub async fn create_variant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateVariantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<VariantWrite>>)> {
    let resp = variant_service::create_variant(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/variants/{id}",
    params(("id" = i32, Path, description = "Variant ID")),
    request_body = UpdateVariantRequest,
    responses(
        (status = 200, description = "Updated variant", body = ApiResponse<VariantWrite>),
        (status = 400, description = "Quantity cannot be set on this variant"),
        (status = 404, description = "Variant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Variants"
)]
pub async fn update_variant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVariantRequest>,
) -> AppResult<Json<ApiResponse<VariantWrite>>> {
    let resp = variant_service::update_variant(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/variants/{id}",
    params(("id" = i32, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Deleted variant, product totals after roll-up", body = ApiResponse<StockTotals>),
        (status = 404, description = "Variant not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Variants"
)]
pub async fn delete_variant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<StockTotals>>> {
    Ok(Json(variant_service::delete_variant(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/variants/{id}/archive",
    params(("id" = i32, Path, description = "Variant ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<VariantWrite>)),
    security(("bearer_auth" = [])),
    tag = "Variants"
)]
pub async fn archive_variant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<VariantWrite>>> {
    let resp = variant_service::set_variant_archived(&state, &user, id, true).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/variants/{id}/unarchive",
    params(("id" = i32, Path, description = "Variant ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<VariantWrite>)),
    security(("bearer_auth" = [])),
    tag = "Variants"
)]
pub async fn unarchive_variant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<VariantWrite>>> {
    let resp = variant_service::set_variant_archived(&state, &user, id, false).await?;
    Ok(Json(resp))
}
