use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::products::{
        CreateProductRequest, ProductDetail, ProductList, UpdateProductRequest, VariantDetail,
    },
    entity::{
        inventories::{self, Entity as Inventories},
        order_items::{self, Entity as OrderItems},
        product_images::{self, Entity as ProductImages},
        product_variants::{self, Entity as ProductVariants},
        products::{self, ActiveModel, Column, Entity as Products},
        sizes::{self, Entity as Sizes},
        sub_categories::Entity as SubCategories,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Inventory, Product, ProductImage, Size},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::category_service::ensure_category_exists,
    state::AppState,
    stock, validation,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let page = query.page();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(sub_category_id) = query.sub_category_id {
        condition = condition.add(Column::SubCategoryId.eq(sub_category_id));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }
    if !query.include_archived.unwrap_or(false) {
        condition = condition.add(Column::Archived.eq(false));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Quantity => Column::Quantity,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(state.orm.as_ref()).await?;
    let items = finder
        .limit(page.per_page)
        .offset(page.offset)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::paged(&page, total)),
    ))
}

/// Product with its variants (sizes and inventory included) and images.
pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let variants = ProductVariants::find()
        .filter(product_variants::Column::ProductId.eq(id))
        .order_by_asc(product_variants::Column::Id)
        .all(state.orm.as_ref())
        .await?;
    let variant_ids: Vec<i32> = variants.iter().map(|v| v.id).collect();

    let (size_rows, stock_rows) = if variant_ids.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let size_rows = Sizes::find()
            .filter(sizes::Column::VariantId.is_in(variant_ids.clone()))
            .order_by_asc(sizes::Column::Id)
            .all(state.orm.as_ref())
            .await?;
        let stock_rows = Inventories::find()
            .filter(inventories::Column::VariantId.is_in(variant_ids))
            .order_by_asc(inventories::Column::Id)
            .all(state.orm.as_ref())
            .await?;
        (size_rows, stock_rows)
    };

    let images = ProductImages::find()
        .filter(product_images::Column::ProductId.eq(id))
        .filter(product_images::Column::Archived.eq(false))
        .order_by_asc(product_images::Column::Position)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(ProductImage::from)
        .collect();

    let variants = variants
        .into_iter()
        .map(|variant| VariantDetail {
            sizes: size_rows
                .iter()
                .filter(|s| s.variant_id == variant.id)
                .cloned()
                .map(Size::from)
                .collect(),
            inventory: stock_rows
                .iter()
                .filter(|row| row.variant_id == variant.id)
                .cloned()
                .map(Inventory::from)
                .collect(),
            variant: variant.into(),
        })
        .collect();

    Ok(ApiResponse::item(
        "Product",
        ProductDetail {
            product: product.into(),
            variants,
            images,
        },
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = validation::required("name", &payload.name)?;
    validation::non_negative("price", payload.price)?;
    let quantity = initial_quantity(payload.single_size, payload.quantity)?;
    check_placement(state.orm.as_ref(), payload.category_id, payload.sub_category_id).await?;

    let product = ActiveModel {
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        category_id: Set(payload.category_id),
        sub_category_id: Set(payload.sub_category_id),
        quantity: Set(quantity),
        single_size: Set(payload.single_size),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Product created", product.into()))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let single_size = payload.single_size.unwrap_or(existing.single_size);
    if payload.quantity.is_some() && !single_size {
        return Err(AppError::bad_request(
            "quantity of a multi-size product is the sum of its variants",
        ));
    }
    if single_size && !existing.single_size {
        let variants = ProductVariants::find()
            .filter(product_variants::Column::ProductId.eq(id))
            .count(&txn)
            .await?;
        if variants > 0 {
            return Err(AppError::bad_request(
                "product has variants, delete them before making it single-size",
            ));
        }
    }
    let (category_id, sub_category_id) = next_placement(&existing, &payload);
    if payload.category_id.is_some() || payload.sub_category_id.is_some() {
        check_placement(&txn, category_id, sub_category_id).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validation::required("name", &name)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        validation::non_negative("price", price)?;
        active.price = Set(price);
    }
    if let Some(quantity) = payload.quantity {
        validation::non_negative("quantity", i64::from(quantity))?;
        active.quantity = Set(quantity);
    }
    active.category_id = Set(category_id);
    active.sub_category_id = Set(sub_category_id);
    active.single_size = Set(single_size);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    // Switching to multi-size turns the quantity into the variant sum.
    let product = stock::recompute_product(&txn, id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item("Updated", product.into()))
}

pub async fn set_product_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let product = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, product.into()))
}

/// Delete a product and, through the schema, its variants, sizes,
/// inventory and images. Products that were ordered must be archived.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let ordered = OrderItems::find()
        .filter(order_items::Column::ProductId.eq(id))
        .count(state.orm.as_ref())
        .await?;
    if ordered > 0 {
        return Err(AppError::bad_request(
            "product has been ordered, archive it instead",
        ));
    }

    let result = Products::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::done("Deleted"))
}

fn initial_quantity(single_size: bool, quantity: Option<i32>) -> AppResult<i32> {
    match (single_size, quantity) {
        (true, Some(quantity)) => {
            validation::non_negative("quantity", i64::from(quantity))?;
            Ok(quantity)
        }
        (true, None) => Ok(0),
        (false, None) => Ok(0),
        (false, Some(_)) => Err(AppError::bad_request(
            "quantity of a multi-size product is the sum of its variants",
        )),
    }
}

/// Moving a product to another category drops its sub-category unless a new
/// one comes with the move.
fn next_placement(
    existing: &products::Model,
    payload: &UpdateProductRequest,
) -> (Option<i32>, Option<i32>) {
    let category_id = payload.category_id.or(existing.category_id);
    let sub_category_id = match payload.sub_category_id {
        Some(sub_category_id) => Some(sub_category_id),
        None if category_id != existing.category_id => None,
        None => existing.sub_category_id,
    };
    (category_id, sub_category_id)
}

async fn check_placement<C>(
    conn: &C,
    category_id: Option<i32>,
    sub_category_id: Option<i32>,
) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if let Some(category_id) = category_id {
        ensure_category_exists(conn, category_id).await?;
    }
    if let Some(sub_category_id) = sub_category_id {
        let sub_category = SubCategories::find_by_id(sub_category_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(format!("sub-category {sub_category_id} not found"))
            })?;
        if Some(sub_category.category_id) != category_id {
            return Err(AppError::bad_request(
                "sub-category does not belong to the product's category",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;

    fn product(id: i32, quantity: i32, single_size: bool) -> products::Model {
        products::Model {
            id,
            name: "Runner".into(),
            description: None,
            price: 5_000,
            category_id: None,
            sub_category_id: None,
            quantity,
            single_size,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn admin() -> AuthUser {
        AuthUser { user_id: 1, is_admin: true }
    }

    #[test]
    fn multi_size_products_start_empty() {
        assert_eq!(initial_quantity(false, None).unwrap(), 0);
        assert_eq!(initial_quantity(true, Some(4)).unwrap(), 4);
        assert!(initial_quantity(false, Some(4)).is_err());
        assert!(initial_quantity(true, Some(-1)).is_err());
    }

    #[tokio::test]
    async fn create_single_size_product_keeps_quantity() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(1, 12, true)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = create_product(
            &state,
            &admin(),
            CreateProductRequest {
                name: "Runner".into(),
                description: None,
                price: 5_000,
                category_id: None,
                sub_category_id: None,
                single_size: true,
                quantity: Some(12),
            },
        )
        .await
        .unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.quantity, 12);
        assert!(data.single_size);
    }

    #[tokio::test]
    async fn quantity_of_multi_size_product_cannot_be_set() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(1, 9, false)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = update_product(
            &state,
            &admin(),
            1,
            UpdateProductRequest {
                quantity: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn category_move_drops_stale_sub_category() {
        let existing = products::Model {
            category_id: Some(1),
            sub_category_id: Some(3),
            ..product(1, 0, false)
        };

        let moved = UpdateProductRequest {
            category_id: Some(2),
            ..Default::default()
        };
        assert_eq!(next_placement(&existing, &moved), (Some(2), None));

        let moved_with_sub = UpdateProductRequest {
            category_id: Some(2),
            sub_category_id: Some(5),
            ..Default::default()
        };
        assert_eq!(next_placement(&existing, &moved_with_sub), (Some(2), Some(5)));

        let same_category = UpdateProductRequest {
            category_id: Some(1),
            ..Default::default()
        };
        assert_eq!(next_placement(&existing, &same_category), (Some(1), Some(3)));

        let renamed = UpdateProductRequest {
            name: Some("Trail".into()),
            ..Default::default()
        };
        assert_eq!(next_placement(&existing, &renamed), (Some(1), Some(3)));
    }

    #[tokio::test]
    async fn product_with_variants_cannot_become_single_size() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(1, 9, false)]])
            .append_query_results([vec![BTreeMap::from([(
                "num_items".to_owned(),
                sea_orm::Value::from(2i64),
            )])]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = update_product(
            &state,
            &admin(),
            1,
            UpdateProductRequest {
                single_size: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("has variants")));
    }

    #[tokio::test]
    async fn get_missing_product_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<products::Model>::new()])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        assert!(matches!(get_product(&state, 5).await, Err(AppError::NotFound)));
    }
}
