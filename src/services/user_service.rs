use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::users::{UpdateUserRequest, UserList},
    entity::users::{ActiveModel, Column, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::auth_service::{check_password, ensure_email_free, hash_password},
    state::AppState,
    validation,
};

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let page = query.page();
    let mut finder = Users::find().order_by_asc(Column::Id);
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
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_user(state: &AppState, user: &AuthUser, id: i32) -> AppResult<ApiResponse<User>> {
    ensure_owner_or_admin(user, id)?;
    let found = Users::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("User", found.into()))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_owner_or_admin(user, id)?;
    if payload.is_admin.is_some() {
        ensure_admin(user)?;
    }

    let existing = Users::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(email) = payload.email {
        let email = validation::email(&email)?;
        ensure_email_free(state.orm.as_ref(), &email, Some(id)).await?;
        active.email = Set(email);
    }
    if let Some(name) = payload.name {
        active.name = Set(validation::required("name", &name)?);
    }
    if let Some(password) = payload.password {
        check_password(&password)?;
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(is_admin) = payload.is_admin {
        active.is_admin = Set(is_admin);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", updated.into()))
}

/// Archived users keep their history but can no longer log in.
pub async fn set_user_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let existing = Users::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, updated.into()))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_owner_or_admin(user, id)?;
    let result = Users::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(user_id = id, by = user.user_id, "user deleted");
    Ok(ApiResponse::done("Deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn customer(id: i32) -> AuthUser {
        AuthUser { user_id: id, is_admin: false }
    }

    #[tokio::test]
    async fn customers_cannot_read_other_accounts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = get_user(&state, &customer(2), 3).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn customers_cannot_promote_themselves() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = update_user(
            &state,
            &customer(2),
            2,
            UpdateUserRequest {
                is_admin: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn listing_users_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = list_users(&state, &customer(2), ListQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
