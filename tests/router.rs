use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use axum_storefront_api::{
    entity::{products, promo_codes},
    routes::create_api_router,
    state::AppState,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

fn app(orm: DatabaseConnection) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(AppState::new(orm, "Uncategorized"))
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn missing_product_is_404_with_envelope() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<products::Model>::new()])
        .into_connection();

    let response = app(orm)
        .oneshot(Request::get("/api/products/1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["error"], "Not Found");
}

#[tokio::test]
async fn unknown_promo_code_is_404() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<promo_codes::Model>::new()])
        .into_connection();

    let response = app(orm)
        .oneshot(
            Request::get("/api/promo-codes/code/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_write_without_token_is_401() {
    let response = app(empty_db())
        .oneshot(
            Request::post("/api/categories")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Shoes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["error"], "Unauthorized Missing Authorization header");
}

#[tokio::test]
async fn cart_requires_bearer_scheme() {
    let response = app(empty_db())
        .oneshot(
            Request::get("/api/cart")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_numeric_id_is_rejected_before_the_database() {
    let response = app(empty_db())
        .oneshot(Request::get("/api/variants/abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
