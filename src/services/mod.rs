pub mod auth_service;
pub mod cart_service;
pub mod category_service;
pub mod image_service;
pub mod inventory_service;
pub mod order_service;
pub mod package_service;
pub mod product_service;
pub mod promo_code_service;
pub mod review_service;
pub mod sale_service;
pub mod size_service;
pub mod user_service;
pub mod variant_service;
