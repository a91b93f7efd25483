use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod categories;
pub mod doc;
pub mod health;
pub mod images;
pub mod inventory;
pub mod orders;
pub mod packages;
pub mod params;
pub mod products;
pub mod promo_codes;
pub mod reviews;
pub mod sales;
pub mod sizes;
pub mod sub_categories;
pub mod users;
pub mod variants;

// State is bound once at the top level, see `main.rs`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/sub-categories", sub_categories::router())
        .nest("/products", products::router())
        .nest("/variants", variants::router())
        .nest("/sizes", sizes::router())
        .nest("/inventory", inventory::router())
        .nest("/product-images", images::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/reviews", reviews::router())
        .nest("/sales", sales::router())
        .nest("/promo-codes", promo_codes::router())
        .nest("/packages", packages::router())
}
