use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::promo_codes::{CreatePromoCodeRequest, PromoCodeList, UpdatePromoCodeRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::PromoCode,
    response::ApiResponse,
    routes::params::ListQuery,
    services::promo_code_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promo_codes).post(create_promo_code))
        .route("/code/{code}", get(validate_promo_code))
        .route(
            "/{id}",
            get(get_promo_code)
                .put(update_promo_code)
                .delete(delete_promo_code),
        )
        .route("/{id}/archive", patch(archive_promo_code))
        .route("/{id}/unarchive", patch(unarchive_promo_code))
}

#[utoipa::path(
    get,
    path = "/api/promo-codes",
    params(ListQuery),
    responses(
        (status = 200, description = "List promo codes", body = ApiResponse<PromoCodeList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn list_promo_codes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<PromoCodeList>>> {
    let resp = promo_code_service::list_promo_codes(&state, &user, query).await?;
    Ok(Json(resp))
}

/// Case-insensitive lookup used by the storefront before checkout.
#[utoipa::path(
    get,
    path = "/api/promo-codes/code/{code}",
    params(("code" = String, Path, description = "Promo code")),
    responses(
        (status = 200, description = "Code is usable", body = ApiResponse<PromoCode>),
        (status = 400, description = "Expired, archived or used up"),
        (status = 404, description = "Unknown code"),
    ),
    tag = "Promo codes"
)]
pub async fn validate_promo_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    Ok(Json(promo_code_service::validate_promo_code(&state, &code).await?))
}

#[utoipa::path(
    get,
    path = "/api/promo-codes/{id}",
    params(("id" = i32, Path, description = "Promo code ID")),
    responses(
        (status = 200, description = "Get promo code", body = ApiResponse<PromoCode>),
        (status = 404, description = "Promo code not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn get_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    Ok(Json(promo_code_service::get_promo_code(&state, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/promo-codes",
    request_body = CreatePromoCodeRequest,
    responses(
        (status = 201, description = "Promo code created", body = ApiResponse<PromoCode>),
        (status = 400, description = "Invalid or duplicate code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn create_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePromoCodeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PromoCode>>)> {
    let resp = promo_code_service::create_promo_code(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/promo-codes/{id}",
    params(("id" = i32, Path, description = "Promo code ID")),
    request_body = UpdatePromoCodeRequest,
    responses((status = 200, description = "Updated promo code", body = ApiResponse<PromoCode>)),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn update_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePromoCodeRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::update_promo_code(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/promo-codes/{id}",
    params(("id" = i32, Path, description = "Promo code ID")),
    responses(
        (status = 200, description = "Deleted promo code"),
        (status = 404, description = "Promo code not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn delete_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(promo_code_service::delete_promo_code(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/promo-codes/{id}/archive",
    params(("id" = i32, Path, description = "Promo code ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<PromoCode>)),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn archive_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::set_promo_code_archived(&state, &user, id, true).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/promo-codes/{id}/unarchive",
    params(("id" = i32, Path, description = "Promo code ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<PromoCode>)),
    security(("bearer_auth" = [])),
    tag = "Promo codes"
)]
pub async fn unarchive_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::set_promo_code_archived(&state, &user, id, false).await?;
    Ok(Json(resp))
}
