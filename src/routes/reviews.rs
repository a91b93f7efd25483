use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    routes::params::ChildListQuery,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/{id}/archive", patch(archive_review))
        .route("/{id}/unarchive", patch(unarchive_review))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ChildListQuery),
    responses((status = 200, description = "Newest reviews first, parent_id filters by product", body = ApiResponse<ReviewList>)),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ChildListQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    Ok(Json(review_service::list_reviews(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Get review", body = ApiResponse<Review>),
        (status = 404, description = "Review not found"),
    ),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Review>>> {
    Ok(Json(review_service::get_review(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<Review>),
        (status = 400, description = "Bad rating or already reviewed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let resp = review_service::create_review(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Updated review", body = ApiResponse<Review>),
        (status = 403, description = "Not your review"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::update_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Deleted review"),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(review_service::delete_review(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/reviews/{id}/archive",
    params(("id" = i32, Path, description = "Review ID")),
    responses((status = 200, description = "Archived", body = ApiResponse<Review>)),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn archive_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Review>>> {
    Ok(Json(review_service::set_review_archived(&state, &user, id, true).await?))
}

#[utoipa::path(
    patch,
    path = "/api/reviews/{id}/unarchive",
    params(("id" = i32, Path, description = "Review ID")),
    responses((status = 200, description = "Unarchived", body = ApiResponse<Review>)),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn unarchive_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Review>>> {
    Ok(Json(review_service::set_review_archived(&state, &user, id, false).await?))
}
