use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Package, PackageItem};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PackageItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub items: Vec<PackageItemRequest>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    /// Replaces the whole item set when present.
    pub items: Option<Vec<PackageItemRequest>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PackageWithItems {
    pub package: Package,
    pub items: Vec<PackageItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PackageList {
    #[schema(value_type = Vec<Package>)]
    pub items: Vec<Package>,
}
