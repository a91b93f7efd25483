use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PromoCode;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePromoCodeRequest {
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePromoCodeRequest {
    pub code: Option<String>,
    pub discount_percent: Option<i32>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PromoCodeList {
    #[schema(value_type = Vec<PromoCode>)]
    pub items: Vec<PromoCode>,
}
