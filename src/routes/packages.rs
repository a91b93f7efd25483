use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::packages::{CreatePackageRequest, PackageList, PackageWithItems, UpdatePackageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Package,
    response::ApiResponse,
    routes::params::ListQuery,
    services::package_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_packages).post(create_package))
        .route(
            "/{id}",
            get(get_package).put(update_package).delete(delete_package),
        )
        .route("/{id}/archive", patch(archive_package))
        .route("/{id}/unarchive", patch(unarchive_package))
}

#[utoipa::path(
    get,
    path = "/api/packages",
    params(ListQuery),
    responses((status = 200, description = "List packages", body = ApiResponse<PackageList>)),
    tag = "Packages"
)]
pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<PackageList>>> {
    Ok(Json(package_service::list_packages(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/packages/{id}",
    params(("id" = i32, Path, description = "Package ID")),
    responses(
        (status = 200, description = "Package with its products", body = ApiResponse<PackageWithItems>),
        (status = 404, description = "Package not found"),
    ),
    tag = "Packages"
)]
pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<PackageWithItems>>> {
    Ok(Json(package_service::get_package(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/packages",
    request_body = CreatePackageRequest,
    responses(
        (status = 201, description = "Package created", body = ApiResponse<PackageWithItems>),
        (status = 400, description = "Empty, duplicate or unknown products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Packages"
)]
pub async fn create_package(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePackageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PackageWithItems>>)> {
    let resp = package_service::create_package(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/packages/{id}",
    params(("id" = i32, Path, description = "Package ID")),
    request_body = UpdatePackageRequest,
    responses(
        (status = 200, description = "Updated package", body = ApiResponse<PackageWithItems>),
        (status = 404, description = "Package not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Packages"
)]
pub async fn update_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePackageRequest>,
) -> AppResult<Json<ApiResponse<PackageWithItems>>> {
    let resp = package_service::update_package(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/packages/{id}",
    params(("id" = i32, Path, description = "Package ID")),
    responses(
        (status = 200, description = "Deleted package"),
        (status = 404, description = "Package not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Packages"
)]
pub async fn delete_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(package_service::delete_package(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/packages/{id}/archive",
    params(("id" = i32, Path, description = "Package ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<Package>)),
    security(("bearer_auth" = [])),
    tag = "Packages"
)]
pub async fn archive_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Package>>> {
    Ok(Json(package_service::set_package_archived(&state, &user, id, true).await?))
}

#[utoipa::path(
    patch,
    path = "/api/packages/{id}/unarchive",
    params(("id" = i32, Path, description = "Package ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<Package>)),
    security(("bearer_auth" = [])),
    tag = "Packages"
)]
pub async fn unarchive_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Package>>> {
    Ok(Json(package_service::set_package_archived(&state, &user, id, false).await?))
}
