use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Sale;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSaleRequest {
    pub name: String,
    pub discount_percent: i32,
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSaleRequest {
    pub name: Option<String>,
    pub discount_percent: Option<i32>,
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SaleList {
    #[schema(value_type = Vec<Sale>)]
    pub items: Vec<Sale>,
}
