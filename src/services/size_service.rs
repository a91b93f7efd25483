use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::{
        products::StockTotals,
        sizes::{CreateSizeRequest, SizeList, SizeWrite, UpdateSizeRequest},
    },
    entity::sizes::{ActiveModel, Column, Entity as Sizes},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Size,
    response::{ApiResponse, Meta},
    routes::params::ChildListQuery,
    services::variant_service::lock_stock_parent,
    state::AppState,
    stock, validation,
};

pub async fn list_sizes(
    state: &AppState,
    query: ChildListQuery,
) -> AppResult<ApiResponse<SizeList>> {
    let page = query.page();
    let mut finder = Sizes::find().order_by_asc(Column::Id);
    if let Some(variant_id) = query.parent_id {
        finder = finder.filter(Column::VariantId.eq(variant_id));
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
        .map(Size::from)
        .collect();

    Ok(ApiResponse::success(
        "Sizes",
        SizeList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_size(state: &AppState, id: i32) -> AppResult<ApiResponse<Size>> {
    let size = Sizes::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Size", size.into()))
}

pub async fn create_size(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSizeRequest,
) -> AppResult<ApiResponse<SizeWrite>> {
    ensure_admin(user)?;
    let label = validation::required("label", &payload.label)?;
    validation::non_negative("quantity", i64::from(payload.quantity))?;

    let txn = state.orm.begin().await?;
    lock_stock_parent(&txn, payload.variant_id, false).await?;

    let size = ActiveModel {
        variant_id: Set(payload.variant_id),
        label: Set(label),
        quantity: Set(payload.quantity),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let (variant, product) = stock::propagate_from_variant(&txn, size.variant_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Size created",
        SizeWrite {
            size: size.into(),
            totals: StockTotals::new(&product, Some(&variant)),
        },
    ))
}

pub async fn update_size(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateSizeRequest,
) -> AppResult<ApiResponse<SizeWrite>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = Sizes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(label) = payload.label {
        active.label = Set(validation::required("label", &label)?);
    }
    if let Some(quantity) = payload.quantity {
        validation::non_negative("quantity", i64::from(quantity))?;
        active.quantity = Set(quantity);
    }
    active.updated_at = Set(Utc::now().into());
    let size = active.update(&txn).await?;

    let (variant, product) = stock::propagate_from_variant(&txn, size.variant_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Updated",
        SizeWrite {
            size: size.into(),
            totals: StockTotals::new(&product, Some(&variant)),
        },
    ))
}

pub async fn set_size_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<SizeWrite>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = Sizes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let size = active.update(&txn).await?;

    let (variant, product) = stock::propagate_from_variant(&txn, size.variant_id).await?;
    txn.commit().await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(
        message,
        SizeWrite {
            size: size.into(),
            totals: StockTotals::new(&product, Some(&variant)),
        },
    ))
}

pub async fn delete_size(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<StockTotals>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let size = Sizes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    Sizes::delete_by_id(id).exec(&txn).await?;
    let (variant, product) = stock::propagate_from_variant(&txn, size.variant_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Deleted",
        StockTotals::new(&product, Some(&variant)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{product_variants, products, sizes};
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

    fn variant(quantity: i32, single_size: bool) -> product_variants::Model {
        product_variants::Model {
            id: 3,
            product_id: 1,
            name: "Blue".into(),
            color: None,
            price: None,
            quantity,
            single_size,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn size(id: i32, quantity: i32) -> sizes::Model {
        sizes::Model {
            id,
            variant_id: 3,
            label: format!("EU{}", 40 + id),
            quantity,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn exec() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn admin() -> AuthUser {
        AuthUser { user_id: 1, is_admin: true }
    }

    #[tokio::test]
    async fn new_size_rolls_up_to_variant_and_product() {
        // Variant already holds size 1 (qty 2); size 2 adds 5.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(2, false)]])
            .append_query_results([vec![size(2, 5)]])
            .append_query_results([vec![variant(2, false)]])
            .append_query_results([vec![size(1, 2), size(2, 5)]])
            .append_exec_results([exec()])
            .append_query_results([vec![product(2)]])
            .append_query_results([vec![variant(7, false)]])
            .append_exec_results([exec()])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = create_size(
            &state,
            &admin(),
            CreateSizeRequest {
                variant_id: 3,
                label: "EU42".into(),
                quantity: 5,
            },
        )
        .await
        .unwrap();

        let totals = resp.data.unwrap().totals;
        assert_eq!(totals.variant_quantity, Some(7));
        assert_eq!(totals.product_quantity, 7);
    }

    #[tokio::test]
    async fn sizes_are_rejected_on_single_size_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(4, true)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = create_size(
            &state,
            &admin(),
            CreateSizeRequest {
                variant_id: 3,
                label: "EU42".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn customers_cannot_write_sizes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let customer = AuthUser { user_id: 9, is_admin: false };

        let err = delete_size(&state, &customer, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
