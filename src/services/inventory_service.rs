use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::{
        inventory::{CreateInventoryRequest, InventoryList, InventoryWrite, UpdateInventoryRequest},
        products::StockTotals,
    },
    entity::inventories::{ActiveModel, Column, Entity as Inventories},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Inventory,
    response::{ApiResponse, Meta},
    routes::params::ChildListQuery,
    services::variant_service::lock_stock_parent,
    state::AppState,
    stock, validation,
};

pub async fn list_inventory(
    state: &AppState,
    query: ChildListQuery,
) -> AppResult<ApiResponse<InventoryList>> {
    let page = query.page();
    let mut finder = Inventories::find().order_by_asc(Column::Id);
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
        .map(Inventory::from)
        .collect();

    Ok(ApiResponse::success(
        "Inventory",
        InventoryList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_inventory(state: &AppState, id: i32) -> AppResult<ApiResponse<Inventory>> {
    let row = Inventories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Inventory", row.into()))
}

pub async fn create_inventory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInventoryRequest,
) -> AppResult<ApiResponse<InventoryWrite>> {
    ensure_admin(user)?;
    let location = validation::required("location", &payload.location)?;
    validation::non_negative("quantity", i64::from(payload.quantity))?;

    let txn = state.orm.begin().await?;
    lock_stock_parent(&txn, payload.variant_id, true).await?;
    ensure_location_free(&txn, payload.variant_id, &location, None).await?;

    let row = ActiveModel {
        variant_id: Set(payload.variant_id),
        location: Set(location),
        quantity: Set(payload.quantity),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let (variant, product) = stock::propagate_from_variant(&txn, row.variant_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Inventory created",
        InventoryWrite {
            inventory: row.into(),
            totals: StockTotals::new(&product, Some(&variant)),
        },
    ))
}

pub async fn update_inventory(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateInventoryRequest,
) -> AppResult<ApiResponse<InventoryWrite>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = Inventories::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let variant_id = existing.variant_id;

    let mut active: ActiveModel = existing.into();
    if let Some(location) = payload.location {
        let location = validation::required("location", &location)?;
        ensure_location_free(&txn, variant_id, &location, Some(id)).await?;
        active.location = Set(location);
    }
    if let Some(quantity) = payload.quantity {
        validation::non_negative("quantity", i64::from(quantity))?;
        active.quantity = Set(quantity);
    }
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    let (variant, product) = stock::propagate_from_variant(&txn, variant_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Updated",
        InventoryWrite {
            inventory: row.into(),
            totals: StockTotals::new(&product, Some(&variant)),
        },
    ))
}

pub async fn set_inventory_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<InventoryWrite>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = Inventories::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let row = active.update(&txn).await?;

    let (variant, product) = stock::propagate_from_variant(&txn, row.variant_id).await?;
    txn.commit().await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(
        message,
        InventoryWrite {
            inventory: row.into(),
            totals: StockTotals::new(&product, Some(&variant)),
        },
    ))
}

pub async fn delete_inventory(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<StockTotals>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let row = Inventories::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    Inventories::delete_by_id(id).exec(&txn).await?;
    let (variant, product) = stock::propagate_from_variant(&txn, row.variant_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Deleted",
        StockTotals::new(&product, Some(&variant)),
    ))
}

async fn ensure_location_free<C>(
    conn: &C,
    variant_id: i32,
    location: &str,
    except: Option<i32>,
) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let mut finder = Inventories::find()
        .filter(Column::VariantId.eq(variant_id))
        .filter(Column::Location.eq(location));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(conn).await? > 0 {
        return Err(AppError::bad_request(format!(
            "variant {variant_id} already has stock at {location}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{inventories, product_variants, products};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    fn product(quantity: i32) -> products::Model {
        products::Model {
            id: 1,
            name: "Tote".into(),
            description: None,
            price: 2_500,
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
            id: 4,
            product_id: 1,
            name: "Canvas".into(),
            color: None,
            price: None,
            quantity,
            single_size,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn row(id: i32, location: &str, quantity: i32) -> inventories::Model {
        inventories::Model {
            id,
            variant_id: 4,
            location: location.into(),
            quantity,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn count(n: i64) -> BTreeMap<String, sea_orm::Value> {
        BTreeMap::from([("num_items".to_owned(), n.into())])
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
    async fn first_location_replaces_variant_quantity() {
        // The variant held 10 on its own; once a location exists only locations count.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(10, true)]])
            .append_query_results([vec![count(0)]])
            .append_query_results([vec![row(1, "main", 3)]])
            .append_query_results([vec![variant(10, true)]])
            .append_query_results([vec![row(1, "main", 3)]])
            .append_exec_results([exec()])
            .append_query_results([vec![product(10)]])
            .append_query_results([vec![variant(3, true)]])
            .append_exec_results([exec()])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = create_inventory(
            &state,
            &admin(),
            CreateInventoryRequest {
                variant_id: 4,
                location: "main".into(),
                quantity: 3,
            },
        )
        .await
        .unwrap();

        let totals = resp.data.unwrap().totals;
        assert_eq!(totals.variant_quantity, Some(3));
        assert_eq!(totals.product_quantity, 3);
    }

    #[tokio::test]
    async fn inventory_requires_single_size_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(0, false)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = create_inventory(
            &state,
            &admin(),
            CreateInventoryRequest {
                variant_id: 4,
                location: "main".into(),
                quantity: 3,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_location_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(3, true)]])
            .append_query_results([vec![count(1)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = create_inventory(
            &state,
            &admin(),
            CreateInventoryRequest {
                variant_id: 4,
                location: "main".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
