use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ProductImage;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateImageRequest {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateImageRequest {
    pub variant_id: Option<i32>,
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ImageList {
    #[schema(value_type = Vec<ProductImage>)]
    pub items: Vec<ProductImage>,
}
