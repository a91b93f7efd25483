use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::promo_codes::{CreatePromoCodeRequest, PromoCodeList, UpdatePromoCodeRequest},
    entity::promo_codes::{ActiveModel, Column, Entity as PromoCodes},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::PromoCode,
    pricing,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    state::AppState,
    validation,
};

pub async fn list_promo_codes(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<PromoCodeList>> {
    ensure_admin(user)?;
    let page = query.page();
    let mut finder = PromoCodes::find().order_by_asc(Column::Code);
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
        .map(PromoCode::from)
        .collect();

    Ok(ApiResponse::success(
        "Promo codes",
        PromoCodeList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_promo_code(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_admin(user)?;
    let promo = PromoCodes::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Promo code", promo.into()))
}

/// Look a code up for use at checkout. Codes that exist but cannot be
/// redeemed answer 400 with the reason.
pub async fn validate_promo_code(
    state: &AppState,
    code: &str,
) -> AppResult<ApiResponse<PromoCode>> {
    let code = pricing::normalize_code(code);
    let promo = PromoCodes::find()
        .filter(Column::Code.eq(code.as_str()))
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    pricing::check_promo(&promo, Utc::now())?;
    Ok(ApiResponse::item("Promo code is valid", promo.into()))
}

pub async fn create_promo_code(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePromoCodeRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_admin(user)?;
    let code = pricing::normalize_code(&validation::required("code", &payload.code)?);
    validation::percent("discount_percent", payload.discount_percent)?;
    if let Some(max_uses) = payload.max_uses {
        validation::positive("max_uses", max_uses)?;
    }
    ensure_code_free(state, &code, None).await?;

    let promo = ActiveModel {
        code: Set(code),
        discount_percent: Set(payload.discount_percent),
        max_uses: Set(payload.max_uses),
        expires_at: Set(payload.expires_at.map(Into::into)),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Promo code created", promo.into()))
}

pub async fn update_promo_code(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdatePromoCodeRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_admin(user)?;
    let existing = PromoCodes::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(code) = payload.code {
        let code = pricing::normalize_code(&validation::required("code", &code)?);
        ensure_code_free(state, &code, Some(id)).await?;
        active.code = Set(code);
    }
    if let Some(percent) = payload.discount_percent {
        validation::percent("discount_percent", percent)?;
        active.discount_percent = Set(percent);
    }
    if let Some(max_uses) = payload.max_uses {
        validation::positive("max_uses", max_uses)?;
        active.max_uses = Set(Some(max_uses));
    }
    if let Some(expires_at) = payload.expires_at {
        active.expires_at = Set(Some(expires_at.into()));
    }
    active.updated_at = Set(Utc::now().into());
    let promo = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", promo.into()))
}

pub async fn set_promo_code_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_admin(user)?;
    let existing = PromoCodes::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let promo = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, promo.into()))
}

pub async fn delete_promo_code(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = PromoCodes::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::done("Deleted"))
}

async fn ensure_code_free(state: &AppState, code: &str, except: Option<i32>) -> AppResult<()> {
    let mut finder = PromoCodes::find().filter(Column::Code.eq(code));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(state.orm.as_ref()).await?.is_some() {
        return Err(AppError::bad_request(format!("promo code {code} already exists")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::promo_codes;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn promo(expires_in_days: i64, times_used: i32) -> promo_codes::Model {
        promo_codes::Model {
            id: 1,
            code: "WELCOME10".into(),
            discount_percent: 10,
            max_uses: Some(5),
            times_used,
            expires_at: Some((Utc::now() + Duration::days(expires_in_days)).into()),
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn valid_code_is_found_case_insensitively() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![promo(3, 0)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = validate_promo_code(&state, " welcome10 ").await.unwrap();
        assert_eq!(resp.data.unwrap().code, "WELCOME10");
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![promo(-1, 0)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = validate_promo_code(&state, "WELCOME10").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn used_up_code_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![promo(3, 5)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = validate_promo_code(&state, "WELCOME10").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<promo_codes::Model>::new()])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = validate_promo_code(&state, "NOPE").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
