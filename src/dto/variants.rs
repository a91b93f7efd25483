use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::products::StockTotals, models::ProductVariant};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVariantRequest {
    pub product_id: i32,
    pub name: String,
    pub color: Option<String>,
    pub price: Option<i64>,
    #[serde(default)]
    pub single_size: bool,
    /// Only accepted for single-size variants.
    pub quantity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateVariantRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub price: Option<i64>,
    pub single_size: Option<bool>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct VariantList {
    #[schema(value_type = Vec<ProductVariant>)]
    pub items: Vec<ProductVariant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariantWrite {
    pub variant: ProductVariant,
    pub totals: StockTotals,
}
