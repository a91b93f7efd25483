use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::products::StockTotals, models::Size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSizeRequest {
    pub variant_id: i32,
    pub label: String,
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSizeRequest {
    pub label: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SizeList {
    #[schema(value_type = Vec<Size>)]
    pub items: Vec<Size>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SizeWrite {
    pub size: Size,
    pub totals: StockTotals,
}
