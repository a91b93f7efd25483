use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::images::{CreateImageRequest, ImageList, UpdateImageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ProductImage,
    response::ApiResponse,
    routes::params::ChildListQuery,
    services::image_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images).post(create_image))
        .route(
            "/{id}",
            get(get_image).put(update_image).delete(delete_image),
        )
        .route("/{id}/archive", patch(archive_image))
        .route("/{id}/unarchive", patch(unarchive_image))
}

#[utoipa::path(
    get,
    path = "/api/product-images",
    params(ChildListQuery),
    responses((status = 200, description = "List images, parent_id filters by product", body = ApiResponse<ImageList>)),
    tag = "Images"
)]
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    Ok(Json(image_service::list_images(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/product-images/{id}",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Get image", body = ApiResponse<ProductImage>),
        (status = 404, description = "Image not found"),
    ),
    tag = "Images"
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    Ok(Json(image_service::get_image(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/product-images",
    request_body = CreateImageRequest,
    responses((status = 201, description = "Image created", body = ApiResponse<ProductImage>)),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn create_image(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateImageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductImage>>)> {
    let resp = image_service::create_image(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/product-images/{id}",
    params(("id" = i32, Path, description = "Image ID")),
    request_body = UpdateImageRequest,
    responses((status = 200, description = "Updated image", body = ApiResponse<ProductImage>)),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn update_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateImageRequest>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    Ok(Json(image_service::update_image(&state, &user, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/product-images/{id}",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Deleted image"),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(image_service::delete_image(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/product-images/{id}/archive",
    params(("id" = i32, Path, description = "Image ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<ProductImage>)),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn archive_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    Ok(Json(image_service::set_image_archived(&state, &user, id, true).await?))
}

#[utoipa::path(
    patch,
    path = "/api/product-images/{id}/unarchive",
    params(("id" = i32, Path, description = "Image ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<ProductImage>)),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn unarchive_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    Ok(Json(image_service::set_image_archived(&state, &user, id, false).await?))
}
