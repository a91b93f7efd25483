use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::products::StockTotals, models::Inventory};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryRequest {
    pub variant_id: i32,
    pub location: String,
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInventoryRequest {
    pub location: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct InventoryList {
    #[schema(value_type = Vec<Inventory>)]
    pub items: Vec<Inventory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryWrite {
    pub inventory: Inventory,
    pub totals: StockTotals,
}
