use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::sales::{CreateSaleRequest, SaleList, UpdateSaleRequest},
    entity::{
        products::Entity as Products,
        sales::{ActiveModel, Column, Entity as Sales},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Sale,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::category_service::ensure_category_exists,
    state::AppState,
    validation,
};

pub async fn list_sales(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<SaleList>> {
    let page = query.page();
    let mut finder = Sales::find().order_by_desc(Column::StartsAt);
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
        .map(Sale::from)
        .collect();

    Ok(ApiResponse::success(
        "Sales",
        SaleList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_sale(state: &AppState, id: i32) -> AppResult<ApiResponse<Sale>> {
    let sale = Sales::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Sale", sale.into()))
}

pub async fn create_sale(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSaleRequest,
) -> AppResult<ApiResponse<Sale>> {
    ensure_admin(user)?;
    let name = validation::required("name", &payload.name)?;
    validation::percent("discount_percent", payload.discount_percent)?;
    check_window(payload.starts_at, payload.ends_at)?;
    check_scope(state, payload.product_id, payload.category_id).await?;

    let sale = ActiveModel {
        name: Set(name),
        discount_percent: Set(payload.discount_percent),
        product_id: Set(payload.product_id),
        category_id: Set(payload.category_id),
        starts_at: Set(payload.starts_at.into()),
        ends_at: Set(payload.ends_at.into()),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Sale created", sale.into()))
}

pub async fn update_sale(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateSaleRequest,
) -> AppResult<ApiResponse<Sale>> {
    ensure_admin(user)?;
    let existing = Sales::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let starts_at = payload
        .starts_at
        .unwrap_or_else(|| existing.starts_at.with_timezone(&Utc));
    let ends_at = payload
        .ends_at
        .unwrap_or_else(|| existing.ends_at.with_timezone(&Utc));
    check_window(starts_at, ends_at)?;

    let product_id = payload.product_id.or(existing.product_id);
    let category_id = payload.category_id.or(existing.category_id);
    if payload.product_id.is_some() || payload.category_id.is_some() {
        check_scope(state, product_id, category_id).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validation::required("name", &name)?);
    }
    if let Some(percent) = payload.discount_percent {
        validation::percent("discount_percent", percent)?;
        active.discount_percent = Set(percent);
    }
    active.product_id = Set(product_id);
    active.category_id = Set(category_id);
    active.starts_at = Set(starts_at.into());
    active.ends_at = Set(ends_at.into());
    active.updated_at = Set(Utc::now().into());
    let sale = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", sale.into()))
}

pub async fn set_sale_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<Sale>> {
    ensure_admin(user)?;
    let existing = Sales::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let sale = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, sale.into()))
}

pub async fn delete_sale(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Sales::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::done("Deleted"))
}

fn check_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> AppResult<()> {
    if starts_at >= ends_at {
        return Err(AppError::bad_request("starts_at must be before ends_at"));
    }
    Ok(())
}

async fn check_scope(
    state: &AppState,
    product_id: Option<i32>,
    category_id: Option<i32>,
) -> AppResult<()> {
    if product_id.is_none() && category_id.is_none() {
        return Err(AppError::bad_request(
            "a sale applies to a product, a category or both",
        ));
    }
    if let Some(product_id) = product_id {
        Products::find_by_id(product_id)
            .one(state.orm.as_ref())
            .await?
            .ok_or_else(|| AppError::bad_request(format!("product {product_id} not found")))?;
    }
    if let Some(category_id) = category_id {
        ensure_category_exists(state.orm.as_ref(), category_id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn request(product_id: Option<i32>, category_id: Option<i32>) -> CreateSaleRequest {
        let now = Utc::now();
        CreateSaleRequest {
            name: "Summer".into(),
            discount_percent: 20,
            product_id,
            category_id,
            starts_at: now,
            ends_at: now + Duration::days(7),
        }
    }

    #[test]
    fn window_must_be_ordered() {
        let now = Utc::now();
        assert!(check_window(now, now + Duration::hours(1)).is_ok());
        assert!(check_window(now, now).is_err());
        assert!(check_window(now + Duration::hours(1), now).is_err());
    }

    #[tokio::test]
    async fn unscoped_sale_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let admin = AuthUser { user_id: 1, is_admin: true };

        let err = create_sale(&state, &admin, request(None, None)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn discount_over_100_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let admin = AuthUser { user_id: 1, is_admin: true };

        let mut payload = request(Some(1), None);
        payload.discount_percent = 120;
        let err = create_sale(&state, &admin, payload).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
