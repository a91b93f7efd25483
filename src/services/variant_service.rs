use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::{
        products::StockTotals,
        variants::{CreateVariantRequest, UpdateVariantRequest, VariantList, VariantWrite},
    },
    entity::{
        inventories::{self, Entity as Inventories},
        product_variants::{self, ActiveModel, Column, Entity as ProductVariants},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::ProductVariant,
    response::{ApiResponse, Meta},
    routes::params::ChildListQuery,
    state::AppState,
    stock, validation,
};

/// Variants, optionally narrowed to one product via `parent_id`.
pub async fn list_variants(
    state: &AppState,
    query: ChildListQuery,
) -> AppResult<ApiResponse<VariantList>> {
    let page = query.page();
    let mut finder = ProductVariants::find().order_by_asc(Column::Id);
    if let Some(product_id) = query.parent_id {
        finder = finder.filter(Column::ProductId.eq(product_id));
    }
    if !query.include_archived() {
        finder = finder.filter(Column::Archived.eq(false));
    }

    let total = finder.clone().count(state.orm.as_ref()).await?;
    let items = finder
        .limit(page.per_page)
        .offset(page.offset)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(ProductVariant::from)
        .collect();

    Ok(ApiResponse::success(
        "Variants",
        VariantList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_variant(state: &AppState, id: i32) -> AppResult<ApiResponse<ProductVariant>> {
    let variant = ProductVariants::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Variant", variant.into()))
}

pub async fn create_variant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateVariantRequest,
) -> AppResult<ApiResponse<VariantWrite>> {
    ensure_admin(user)?;
    let name = validation::required("name", &payload.name)?;
    if let Some(price) = payload.price {
        validation::non_negative("price", price)?;
    }
    let quantity = match (payload.single_size, payload.quantity) {
        (_, None) => 0,
        (true, Some(quantity)) => {
            validation::non_negative("quantity", i64::from(quantity))?;
            quantity
        }
        (false, Some(_)) => {
            return Err(AppError::bad_request(
                "quantity of a multi-size variant is the sum of its sizes",
            ));
        }
    };

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(payload.product_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(format!("product {} not found", payload.product_id))
        })?;
    if product.single_size {
        return Err(AppError::bad_request(format!(
            "product {} is single-size and cannot have variants",
            product.id
        )));
    }

    let inserted = ActiveModel {
        product_id: Set(payload.product_id),
        name: Set(name),
        color: Set(payload.color),
        price: Set(payload.price),
        quantity: Set(quantity),
        single_size: Set(payload.single_size),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let (variant, product) = stock::propagate_from_variant(&txn, inserted.id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Variant created",
        VariantWrite {
            totals: StockTotals::new(&product, Some(&variant)),
            variant: variant.into(),
        },
    ))
}

pub async fn update_variant(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateVariantRequest,
) -> AppResult<ApiResponse<VariantWrite>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = ProductVariants::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let single_size = payload.single_size.unwrap_or(existing.single_size);
    if let Some(quantity) = payload.quantity {
        if !single_size {
            return Err(AppError::bad_request(
                "quantity of a multi-size variant is the sum of its sizes",
            ));
        }
        validation::non_negative("quantity", i64::from(quantity))?;
        let locations = Inventories::find()
            .filter(inventories::Column::VariantId.eq(id))
            .count(&txn)
            .await?;
        if locations > 0 {
            return Err(AppError::bad_request(
                "variant stock is tracked per location, update the inventory rows",
            ));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validation::required("name", &name)?);
    }
    if let Some(color) = payload.color {
        active.color = Set(Some(color));
    }
    if let Some(price) = payload.price {
        validation::non_negative("price", price)?;
        active.price = Set(Some(price));
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity);
    }
    active.single_size = Set(single_size);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    let (variant, product) = stock::propagate_from_variant(&txn, id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Updated",
        VariantWrite {
            totals: StockTotals::new(&product, Some(&variant)),
            variant: variant.into(),
        },
    ))
}

/// Archived variants drop out of the product total.
pub async fn set_variant_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<VariantWrite>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = ProductVariants::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    let (variant, product) = stock::propagate_from_variant(&txn, id).await?;
    txn.commit().await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(
        message,
        VariantWrite {
            totals: StockTotals::new(&product, Some(&variant)),
            variant: variant.into(),
        },
    ))
}

/// Sizes and inventory rows go with the variant through the schema.
pub async fn delete_variant(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<StockTotals>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let variant = ProductVariants::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    ProductVariants::delete_by_id(id).exec(&txn).await?;
    let product = stock::recompute_product(&txn, variant.product_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item("Deleted", StockTotals::new(&product, None)))
}

/// Lock the variant a size or inventory row is written under and check that
/// it tracks stock the way the caller expects.
pub(crate) async fn lock_stock_parent<C>(
    conn: &C,
    variant_id: i32,
    single_size: bool,
) -> AppResult<product_variants::Model>
where
    C: ConnectionTrait,
{
    let variant = ProductVariants::find_by_id(variant_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("variant {variant_id} not found")))?;

    match (single_size, variant.single_size) {
        (true, false) => Err(AppError::bad_request(format!(
            "variant {variant_id} is multi-size, stock it through sizes"
        ))),
        (false, true) => Err(AppError::bad_request(format!(
            "variant {variant_id} is single-size, stock it through inventory"
        ))),
        _ => Ok(variant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{products, sizes};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn product(quantity: i32) -> products::Model {
        products::Model {
            id: 1,
            name: "Runner".into(),
            description: None,
            price: 5_000,
            category_id: None,
            sub_category_id: None,
            quantity,
            single_size: false,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn variant(id: i32, quantity: i32, single_size: bool) -> product_variants::Model {
        product_variants::Model {
            id,
            product_id: 1,
            name: "Blue".into(),
            color: Some("blue".into()),
            price: None,
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

    #[tokio::test]
    async fn create_variant_reports_rolled_up_totals() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(0)]])
            .append_query_results([vec![variant(7, 0, false)]])
            .append_query_results([vec![variant(7, 0, false)]])
            .append_query_results([Vec::<sizes::Model>::new()])
            .append_query_results([vec![product(0)]])
            .append_query_results([vec![variant(7, 0, false)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = create_variant(
            &state,
            &admin(),
            CreateVariantRequest {
                product_id: 1,
                name: "Blue".into(),
                color: Some("blue".into()),
                price: None,
                single_size: false,
                quantity: None,
            },
        )
        .await
        .unwrap();

        let write = resp.data.unwrap();
        assert_eq!(write.variant.id, 7);
        assert_eq!(
            write.totals,
            StockTotals {
                product_id: 1,
                product_quantity: 0,
                variant_id: Some(7),
                variant_quantity: Some(0),
            }
        );
    }

    #[tokio::test]
    async fn multi_size_variant_rejects_direct_quantity() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = create_variant(
            &state,
            &admin(),
            CreateVariantRequest {
                product_id: 1,
                name: "Blue".into(),
                color: None,
                price: None,
                single_size: false,
                quantity: Some(3),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn single_size_product_rejects_new_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![products::Model {
                single_size: true,
                ..product(12)
            }]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = create_variant(
            &state,
            &admin(),
            CreateVariantRequest {
                product_id: 1,
                name: "Blue".into(),
                color: None,
                price: None,
                single_size: true,
                quantity: Some(4),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("cannot have variants")));
    }

    #[tokio::test]
    async fn delete_variant_recomputes_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(7, 4, false)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![product(4)]])
            .append_query_results([Vec::<product_variants::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = delete_variant(&state, &admin(), 7).await.unwrap();
        let totals = resp.data.unwrap();
        assert_eq!(totals.product_quantity, 0);
        assert_eq!(totals.variant_id, None);
    }
}
