use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, SubCategory};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDeleted {
    pub deleted_id: i32,
    pub fallback_category_id: i32,
    pub reassigned_products: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubCategoryRequest {
    pub category_id: i32,
    pub name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSubCategoryRequest {
    pub category_id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubCategoryList {
    #[schema(value_type = Vec<SubCategory>)]
    pub items: Vec<SubCategory>,
}
