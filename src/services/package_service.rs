use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::packages::{
        CreatePackageRequest, PackageItemRequest, PackageList, PackageWithItems,
        UpdatePackageRequest,
    },
    entity::{
        package_items::{self, Entity as PackageItems},
        packages::{ActiveModel, Column, Entity as Packages},
        products::{self, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Package, PackageItem},
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    state::AppState,
    validation,
};

pub async fn list_packages(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<PackageList>> {
    let page = query.page();
    let mut finder = Packages::find().order_by_asc(Column::Name);
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
        .map(Package::from)
        .collect();

    Ok(ApiResponse::success(
        "Packages",
        PackageList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_package(state: &AppState, id: i32) -> AppResult<ApiResponse<PackageWithItems>> {
    let package = Packages::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    let items = items_of(state.orm.as_ref(), id).await?;
    Ok(ApiResponse::item(
        "Package",
        PackageWithItems {
            package: package.into(),
            items,
        },
    ))
}

pub async fn create_package(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePackageRequest,
) -> AppResult<ApiResponse<PackageWithItems>> {
    ensure_admin(user)?;
    let name = validation::required("name", &payload.name)?;
    validation::non_negative("price", payload.price)?;
    check_items(&payload.items)?;

    let txn = state.orm.begin().await?;
    let package = ActiveModel {
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let items = replace_items(&txn, package.id, &payload.items).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Package created",
        PackageWithItems {
            package: package.into(),
            items,
        },
    ))
}

pub async fn update_package(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdatePackageRequest,
) -> AppResult<ApiResponse<PackageWithItems>> {
    ensure_admin(user)?;
    if let Some(items) = &payload.items {
        check_items(items)?;
    }

    let txn = state.orm.begin().await?;
    let existing = Packages::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

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
    active.updated_at = Set(Utc::now().into());
    let package = active.update(&txn).await?;

    let items = match &payload.items {
        Some(items) => replace_items(&txn, id, items).await?,
        None => items_of(&txn, id).await?,
    };
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Updated",
        PackageWithItems {
            package: package.into(),
            items,
        },
    ))
}

pub async fn set_package_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<Package>> {
    ensure_admin(user)?;
    let existing = Packages::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let package = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, package.into()))
}

pub async fn delete_package(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Packages::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::done("Deleted"))
}

fn check_items(items: &[PackageItemRequest]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::bad_request("a package needs at least one product"));
    }
    let mut seen = HashSet::new();
    for item in items {
        validation::positive("quantity", item.quantity)?;
        if !seen.insert(item.product_id) {
            return Err(AppError::bad_request(format!(
                "product {} is listed twice",
                item.product_id
            )));
        }
    }
    Ok(())
}

/// Swap the package's item set for `items`.
async fn replace_items<C>(
    conn: &C,
    package_id: i32,
    items: &[PackageItemRequest],
) -> AppResult<Vec<PackageItem>>
where
    C: ConnectionTrait,
{
    let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    let found = Products::find()
        .filter(products::Column::Id.is_in(product_ids.clone()))
        .count(conn)
        .await?;
    if found != product_ids.len() as u64 {
        return Err(AppError::bad_request("package references unknown products"));
    }

    PackageItems::delete_many()
        .filter(package_items::Column::PackageId.eq(package_id))
        .exec(conn)
        .await?;

    let mut saved = Vec::with_capacity(items.len());
    for item in items {
        let row = package_items::ActiveModel {
            package_id: Set(package_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        saved.push(PackageItem::from(row));
    }
    Ok(saved)
}

async fn items_of<C>(conn: &C, package_id: i32) -> AppResult<Vec<PackageItem>>
where
    C: ConnectionTrait,
{
    let items = PackageItems::find()
        .filter(package_items::Column::PackageId.eq(package_id))
        .order_by_asc(package_items::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(PackageItem::from)
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i32, quantity: i32) -> PackageItemRequest {
        PackageItemRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn item_set_must_be_non_empty_and_distinct() {
        assert!(check_items(&[]).is_err());
        assert!(check_items(&[item(1, 1), item(1, 2)]).is_err());
        assert!(check_items(&[item(1, 0)]).is_err());
        assert!(check_items(&[item(1, 1), item(2, 3)]).is_ok());
    }

    #[tokio::test]
    async fn unknown_products_roll_back_the_package() {
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::collections::BTreeMap;

        let package = crate::entity::packages::Model {
            id: 2,
            name: "Starter kit".into(),
            description: None,
            price: 9_900,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![package]])
            .append_query_results([vec![BTreeMap::from([(
                "num_items".to_owned(),
                sea_orm::Value::from(1i64),
            )])]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");
        let admin = AuthUser { user_id: 1, is_admin: true };

        let err = create_package(
            &state,
            &admin,
            CreatePackageRequest {
                name: "Starter kit".into(),
                description: None,
                price: 9_900,
                items: vec![item(1, 1), item(2, 1)],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
