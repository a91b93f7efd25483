use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::{product_variants, products},
    models::{Inventory, Product, ProductImage, ProductVariant, Size},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    /// Single-size products carry their own quantity; others sum their variants.
    #[serde(default)]
    pub single_size: bool,
    pub quantity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub single_size: Option<bool>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariantDetail {
    pub variant: ProductVariant,
    pub sizes: Vec<Size>,
    pub inventory: Vec<Inventory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub variants: Vec<VariantDetail>,
    pub images: Vec<ProductImage>,
}

/// Quantities of the parents touched by a stock write, after roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StockTotals {
    pub product_id: i32,
    pub product_quantity: i32,
    pub variant_id: Option<i32>,
    pub variant_quantity: Option<i32>,
}

impl StockTotals {
    pub fn new(product: &products::Model, variant: Option<&product_variants::Model>) -> Self {
        Self {
            product_id: product.id,
            product_quantity: product.quantity,
            variant_id: variant.map(|v| v.id),
            variant_quantity: variant.map(|v| v.quantity),
        }
    }
}
