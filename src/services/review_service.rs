use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
    entity::{
        products::Entity as Products,
        reviews::{ActiveModel, Column, Entity as Reviews, Model},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    models::Review,
    response::{ApiResponse, Meta},
    routes::params::ChildListQuery,
    state::AppState,
    validation,
};

/// Newest first; `parent_id` narrows the list to one product.
pub async fn list_reviews(
    state: &AppState,
    query: ChildListQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let page = query.page();
    let mut finder = Reviews::find().order_by_desc(Column::CreatedAt);
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
        .map(Review::from)
        .collect();

    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::paged(&page, total)),
    ))
}

pub async fn get_review(state: &AppState, id: i32) -> AppResult<ApiResponse<Review>> {
    let review = Reviews::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::item("Review", review.into()))
}

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    validation::rating(payload.rating)?;

    Products::find_by_id(payload.product_id)
        .one(state.orm.as_ref())
        .await?
        .filter(|p| !p.archived)
        .ok_or_else(|| {
            AppError::bad_request(format!("product {} not found", payload.product_id))
        })?;

    let existing = Reviews::find()
        .filter(Column::ProductId.eq(payload.product_id))
        .filter(Column::UserId.eq(user.user_id))
        .one(state.orm.as_ref())
        .await?;
    if existing.is_some() {
        return Err(AppError::bad_request(
            "product already reviewed, update the review instead",
        ));
    }

    let review = ActiveModel {
        product_id: Set(payload.product_id),
        user_id: Set(user.user_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    Ok(ApiResponse::item("Review created", review.into()))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let existing = owned_review(state, user, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(rating) = payload.rating {
        validation::rating(rating)?;
        active.rating = Set(rating);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(Some(comment));
    }
    active.updated_at = Set(Utc::now().into());
    let review = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", review.into()))
}

pub async fn set_review_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<Review>> {
    let existing = owned_review(state, user, id).await?;

    let mut active: ActiveModel = existing.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let review = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, review.into()))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let review = owned_review(state, user, id).await?;
    Reviews::delete_by_id(review.id).exec(state.orm.as_ref()).await?;
    Ok(ApiResponse::done("Deleted"))
}

async fn owned_review(state: &AppState, user: &AuthUser, id: i32) -> AppResult<Model> {
    let review = Reviews::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, review.user_id)?;
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn review(user_id: i32) -> Model {
        Model {
            id: 5,
            product_id: 1,
            user_id,
            rating: 4,
            comment: Some("Fits well".into()),
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn rating_out_of_range_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let user = AuthUser { user_id: 2, is_admin: false };

        let err = create_review(
            &state,
            &user,
            CreateReviewRequest {
                product_id: 1,
                rating: 6,
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn only_the_author_or_admin_may_edit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![review(2)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");
        let stranger = AuthUser { user_id: 3, is_admin: false };

        let err = update_review(&state, &stranger, 5, UpdateReviewRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn admin_may_edit_any_review() {
        let mut edited = review(2);
        edited.rating = 2;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![review(2)]])
            .append_query_results([vec![edited]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");
        let admin = AuthUser { user_id: 1, is_admin: true };

        let resp = update_review(
            &state,
            &admin,
            5,
            UpdateReviewRequest {
                rating: Some(2),
                comment: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.data.unwrap().rating, 2);
    }
}
