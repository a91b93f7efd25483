pub mod auth;
pub mod cart;
pub mod categories;
pub mod images;
pub mod inventory;
pub mod orders;
pub mod packages;
pub mod products;
pub mod promo_codes;
pub mod reviews;
pub mod sales;
pub mod sizes;
pub mod users;
pub mod variants;
