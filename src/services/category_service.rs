use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::categories::{
        CategoryDeleted, CategoryList, CreateCategoryRequest, CreateSubCategoryRequest,
        SubCategoryList, UpdateCategoryRequest, UpdateSubCategoryRequest,
    },
    entity::{
        categories::{self, ActiveModel as CategoryActive, Entity as Categories},
        products::{self, Entity as Products},
        sub_categories::{self, ActiveModel as SubCategoryActive, Entity as SubCategories},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, SubCategory},
    response::{ApiResponse, Meta},
    routes::params::{ChildListQuery, ListQuery},
    state::AppState,
    validation,
};

pub async fn list_categories(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<CategoryList>> {
    let page = query.page();
    let mut finder = Categories::find().order_by_asc(categories::Column::Name);
    if !query.include_archived() {
        finder = finder.filter(categories::Column::Archived.eq(false));
    }

    let total = finder.clone().count(state.orm.as_ref()).await?;
    let items = finder
        .limit(page.per_page)
        .offset(page.offset)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_category(state: &AppState, id: i32) -> AppResult<ApiResponse<Category>> {
    let category = Categories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Category", category.into()))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = validation::required("name", &payload.name)?;
    ensure_category_name_free(state.orm.as_ref(), &name, None).await?;

    let category = CategoryActive {
        name: Set(name),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Category created", category.into()))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        let name = validation::required("name", &name)?;
        ensure_category_name_free(state.orm.as_ref(), &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Utc::now().into());
    let category = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", category.into()))
}

pub async fn set_category_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let category = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, category.into()))
}

/// Delete a category, moving its products to the fallback category.
///
/// Products lose their sub-category since the category's sub-categories go
/// with it. Everything happens in one transaction.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<CategoryDeleted>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let category = Categories::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if category.name == state.fallback_category {
        return Err(AppError::bad_request(
            "the fallback category cannot be deleted",
        ));
    }

    let fallback = find_or_create_fallback(&txn, &state.fallback_category).await?;

    let moved = Products::update_many()
        .col_expr(products::Column::CategoryId, Expr::value(fallback.id))
        .col_expr(products::Column::SubCategoryId, Expr::value(Option::<i32>::None))
        .col_expr(products::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(products::Column::CategoryId.eq(id))
        .exec(&txn)
        .await?;

    SubCategories::delete_many()
        .filter(sub_categories::Column::CategoryId.eq(id))
        .exec(&txn)
        .await?;
    Categories::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        category_id = id,
        fallback_category_id = fallback.id,
        products = moved.rows_affected,
        "category deleted, products reassigned"
    );

    Ok(ApiResponse::item(
        "Deleted",
        CategoryDeleted {
            deleted_id: id,
            fallback_category_id: fallback.id,
            reassigned_products: moved.rows_affected,
        },
    ))
}

async fn find_or_create_fallback<C>(conn: &C, name: &str) -> AppResult<categories::Model>
where
    C: ConnectionTrait,
{
    let existing = Categories::find()
        .filter(categories::Column::Name.eq(name))
        .one(conn)
        .await?;
    if let Some(category) = existing {
        return Ok(category);
    }

    let category = CategoryActive {
        name: Set(name.to_string()),
        description: Set(Some("Products whose category was removed".to_string())),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(category)
}

async fn ensure_category_name_free<C>(conn: &C, name: &str, except: Option<i32>) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let mut finder = Categories::find().filter(categories::Column::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(categories::Column::Id.ne(id));
    }
    if finder.one(conn).await?.is_some() {
        return Err(AppError::bad_request("Category name is already taken"));
    }
    Ok(())
}

pub async fn list_sub_categories(
    state: &AppState,
    query: ChildListQuery,
) -> AppResult<ApiResponse<SubCategoryList>> {
    let page = query.page();
    let mut finder = SubCategories::find().order_by_asc(sub_categories::Column::Name);
    if let Some(category_id) = query.parent_id {
        finder = finder.filter(sub_categories::Column::CategoryId.eq(category_id));
    }
    if !query.include_archived() {
        finder = finder.filter(sub_categories::Column::Archived.eq(false));
    }

    let total = finder.clone().count(state.orm.as_ref()).await?;
    let items = finder
        .limit(page.per_page)
        .offset(page.offset)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(SubCategory::from)
        .collect();

    Ok(ApiResponse::success(
        "Sub-categories",
        SubCategoryList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_sub_category(state: &AppState, id: i32) -> AppResult<ApiResponse<SubCategory>> {
    let sub_category = SubCategories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Sub-category", sub_category.into()))
}

pub async fn create_sub_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSubCategoryRequest,
) -> AppResult<ApiResponse<SubCategory>> {
    ensure_admin(user)?;
    let name = validation::required("name", &payload.name)?;
    ensure_category_exists(state.orm.as_ref(), payload.category_id).await?;

    let sub_category = SubCategoryActive {
        category_id: Set(payload.category_id),
        name: Set(name),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Sub-category created", sub_category.into()))
}

pub async fn update_sub_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateSubCategoryRequest,
) -> AppResult<ApiResponse<SubCategory>> {
    ensure_admin(user)?;
    let existing = SubCategories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: SubCategoryActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validation::required("name", &name)?);
    }
    if let Some(category_id) = payload.category_id {
        ensure_category_exists(state.orm.as_ref(), category_id).await?;
        active.category_id = Set(category_id);
    }
    active.updated_at = Set(Utc::now().into());
    let sub_category = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", sub_category.into()))
}

pub async fn set_sub_category_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<SubCategory>> {
    ensure_admin(user)?;
    let existing = SubCategories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: SubCategoryActive = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let sub_category = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, sub_category.into()))
}

pub async fn delete_sub_category(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    Products::update_many()
        .col_expr(products::Column::SubCategoryId, Expr::value(Option::<i32>::None))
        .col_expr(products::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(products::Column::SubCategoryId.eq(id))
        .exec(&txn)
        .await?;
    let result = SubCategories::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    txn.commit().await?;
    Ok(ApiResponse::done("Deleted"))
}

pub(crate) async fn ensure_category_exists<C>(conn: &C, id: i32) -> AppResult<categories::Model>
where
    C: ConnectionTrait,
{
    Categories::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("category {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn category(id: i32, name: &str) -> categories::Model {
        categories::Model {
            id,
            name: name.to_string(),
            description: None,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn admin() -> AuthUser {
        AuthUser { user_id: 1, is_admin: true }
    }

    fn affected(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[tokio::test]
    async fn delete_moves_products_to_fallback() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category(4, "Shoes")]])
            .append_query_results([vec![category(1, "Uncategorized")]])
            .append_exec_results([affected(3), affected(2), affected(1)])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = delete_category(&state, &admin(), 4).await.unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.deleted_id, 4);
        assert_eq!(data.fallback_category_id, 1);
        assert_eq!(data.reassigned_products, 3);
    }

    #[tokio::test]
    async fn fallback_category_cannot_be_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category(1, "Uncategorized")]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = delete_category(&state, &admin(), 1).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn deleting_unknown_category_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<categories::Model>::new()])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = delete_category(&state, &admin(), 9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn customers_cannot_create_categories() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let customer = AuthUser { user_id: 2, is_admin: false };

        let err = create_category(
            &state,
            &customer,
            CreateCategoryRequest {
                name: "Hats".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
