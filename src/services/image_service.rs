use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::images::{CreateImageRequest, ImageList, UpdateImageRequest},
    entity::{
        product_images::{ActiveModel, Column, Entity as ProductImages},
        product_variants::Entity as ProductVariants,
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::ProductImage,
    response::{ApiResponse, Meta},
    routes::params::ChildListQuery,
    state::AppState,
    validation,
};

/// Images ordered by position, optionally for a single product.
pub async fn list_images(
    state: &AppState,
    query: ChildListQuery,
) -> AppResult<ApiResponse<ImageList>> {
    let page = query.page();
    let mut finder = ProductImages::find()
        .order_by_asc(Column::ProductId)
        .order_by_asc(Column::Position)
        .order_by_asc(Column::Id);
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
        .map(ProductImage::from)
        .collect();

    Ok(ApiResponse::success(
        "Images",
        ImageList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_image(state: &AppState, id: i32) -> AppResult<ApiResponse<ProductImage>> {
    let image = ProductImages::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Image", image.into()))
}

pub async fn create_image(
    state: &AppState,
    user: &AuthUser,
    payload: CreateImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;
    let url = validation::required("url", &payload.url)?;
    validation::non_negative("position", i64::from(payload.position))?;

    if Products::find_by_id(payload.product_id)
        .one(state.orm.as_ref())
        .await?
        .is_none()
    {
        return Err(AppError::bad_request(format!(
            "product {} not found",
            payload.product_id
        )));
    }
    if let Some(variant_id) = payload.variant_id {
        ensure_variant_of(state.orm.as_ref(), variant_id, payload.product_id).await?;
    }

    let image = ActiveModel {
        product_id: Set(payload.product_id),
        variant_id: Set(payload.variant_id),
        url: Set(url),
        alt_text: Set(payload.alt_text),
        position: Set(payload.position),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Image created", image.into()))
}

pub async fn update_image(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;
    let existing = ProductImages::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(variant_id) = payload.variant_id {
        ensure_variant_of(state.orm.as_ref(), variant_id, existing.product_id).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(url) = payload.url {
        active.url = Set(validation::required("url", &url)?);
    }
    if let Some(alt_text) = payload.alt_text {
        active.alt_text = Set(Some(alt_text));
    }
    if let Some(position) = payload.position {
        validation::non_negative("position", i64::from(position))?;
        active.position = Set(position);
    }
    if payload.variant_id.is_some() {
        active.variant_id = Set(payload.variant_id);
    }
    active.updated_at = Set(Utc::now().into());
    let image = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", image.into()))
}

pub async fn set_image_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;
    let existing = ProductImages::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let image = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, image.into()))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = ProductImages::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::done("Deleted"))
}

async fn ensure_variant_of<C>(conn: &C, variant_id: i32, product_id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let variant = ProductVariants::find_by_id(variant_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("variant {variant_id} not found")))?;
    if variant.product_id != product_id {
        return Err(AppError::bad_request(format!(
            "variant {variant_id} does not belong to product {product_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn deleting_missing_image_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");
        let admin = AuthUser { user_id: 1, is_admin: true };

        let err = delete_image(&state, &admin, 12).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn blank_url_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let admin = AuthUser { user_id: 1, is_admin: true };

        let err = create_image(
            &state,
            &admin,
            CreateImageRequest {
                product_id: 1,
                variant_id: None,
                url: "  ".into(),
                alt_text: None,
                position: 0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
