use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{
    cart_items, carts, categories, inventories, order_items, orders, package_items, packages,
    product_images, product_variants, products, promo_codes, reviews, sales, sizes,
    sub_categories, users,
};

/// Public view of a user; the password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            is_admin: model.is_admin,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCategory {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<sub_categories::Model> for SubCategory {
    fn from(model: sub_categories::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub quantity: i32,
    pub single_size: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category_id: model.category_id,
            sub_category_id: model.sub_category_id,
            quantity: model.quantity,
            single_size: model.single_size,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductVariant {
    pub id: i32,
    pub product_id: i32,
    pub name: String,
    pub color: Option<String>,
    pub price: Option<i64>,
    pub quantity: i32,
    pub single_size: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_variants::Model> for ProductVariant {
    fn from(model: product_variants::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            name: model.name,
            color: model.color,
            price: model.price,
            quantity: model.quantity,
            single_size: model.single_size,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Size {
    pub id: i32,
    pub variant_id: i32,
    pub label: String,
    pub quantity: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<sizes::Model> for Size {
    fn from(model: sizes::Model) -> Self {
        Self {
            id: model.id,
            variant_id: model.variant_id,
            label: model.label,
            quantity: model.quantity,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Inventory {
    pub id: i32,
    pub variant_id: i32,
    pub location: String,
    pub quantity: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventories::Model> for Inventory {
    fn from(model: inventories::Model) -> Self {
        Self {
            id: model.id,
            variant_id: model.variant_id,
            location: model.location,
            quantity: model.quantity,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub url: String,
    pub alt_text: Option<String>,
    pub position: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_images::Model> for ProductImage {
    fn from(model: product_images::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            variant_id: model.variant_id,
            url: model.url,
            alt_text: model.alt_text,
            position: model.position,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<carts::Model> for Cart {
    fn from(model: carts::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<cart_items::Model> for CartItem {
    fn from(model: cart_items::Model) -> Self {
        Self {
            id: model.id,
            cart_id: model.cart_id,
            product_id: model.product_id,
            variant_id: model.variant_id,
            size_id: model.size_id,
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub invoice_number: String,
    pub subtotal: i64,
    pub discount: i64,
    pub total_amount: i64,
    pub promo_code_id: Option<i32>,
    pub shipping_address: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            status: model.status,
            invoice_number: model.invoice_number,
            subtotal: model.subtotal,
            discount: model.discount,
            total_amount: model.total_amount,
            promo_code_id: model.promo_code_id,
            shipping_address: model.shipping_address,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: i64,
    pub created_at: DateTime<Utc>,
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            variant_id: model.variant_id,
            size_id: model.size_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            rating: model.rating,
            comment: model.comment,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: i32,
    pub name: String,
    pub discount_percent: i32,
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<sales::Model> for Sale {
    fn from(model: sales::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            discount_percent: model.discount_percent,
            product_id: model.product_id,
            category_id: model.category_id,
            starts_at: model.starts_at.with_timezone(&Utc),
            ends_at: model.ends_at.with_timezone(&Utc),
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromoCode {
    pub id: i32,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: Option<i32>,
    pub times_used: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<promo_codes::Model> for PromoCode {
    fn from(model: promo_codes::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            discount_percent: model.discount_percent,
            max_uses: model.max_uses,
            times_used: model.times_used,
            expires_at: model.expires_at.map(|dt| dt.with_timezone(&Utc)),
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Package {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<packages::Model> for Package {
    fn from(model: packages::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            archived: model.archived,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PackageItem {
    pub id: i32,
    pub package_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl From<package_items::Model> for PackageItem {
    fn from(model: package_items::Model) -> Self {
        Self {
            id: model.id,
            package_id: model.package_id,
            product_id: model.product_id,
            quantity: model.quantity,
        }
    }
}
