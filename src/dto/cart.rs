use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Cart, CartItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartWithItems {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}
