use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    dto::cart::{AddToCartRequest, CartWithItems, UpdateCartItemRequest},
    entity::{
        cart_items::{self, Entity as CartItems},
        carts::{self, Entity as Carts},
        product_variants::Entity as ProductVariants,
        products::Entity as Products,
        sizes::Entity as Sizes,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::ApiResponse,
    state::AppState,
    validation,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartWithItems>> {
    let cart = cart_for(state.orm.as_ref(), user.user_id).await?;
    let items = load_items(state.orm.as_ref(), cart.id).await?;
    Ok(ApiResponse::item(
        "OK",
        CartWithItems {
            cart: cart.into(),
            items: items.into_iter().map(CartItem::from).collect(),
        },
    ))
}

/// Add a line to the caller's cart. A line for the same product, variant and
/// size is merged by adding the quantities.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    validation::positive("quantity", payload.quantity)?;
    check_line(state.orm.as_ref(), &payload).await?;
    let cart = cart_for(state.orm.as_ref(), user.user_id).await?;

    let mut finder = CartItems::find()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .filter(cart_items::Column::ProductId.eq(payload.product_id));
    finder = match payload.variant_id {
        Some(id) => finder.filter(cart_items::Column::VariantId.eq(id)),
        None => finder.filter(cart_items::Column::VariantId.is_null()),
    };
    finder = match payload.size_id {
        Some(id) => finder.filter(cart_items::Column::SizeId.eq(id)),
        None => finder.filter(cart_items::Column::SizeId.is_null()),
    };

    let item = match finder.one(state.orm.as_ref()).await? {
        Some(existing) => {
            let quantity = existing
                .quantity
                .checked_add(payload.quantity)
                .ok_or_else(|| AppError::bad_request("quantity is too large"))?;
            let mut active: cart_items::ActiveModel = existing.into();
            active.quantity = Set(quantity);
            active.updated_at = Set(Utc::now().into());
            active.update(state.orm.as_ref()).await?
        }
        None => {
            cart_items::ActiveModel {
                cart_id: Set(cart.id),
                product_id: Set(payload.product_id),
                variant_id: Set(payload.variant_id),
                size_id: Set(payload.size_id),
                quantity: Set(payload.quantity),
                ..Default::default()
            }
            .insert(state.orm.as_ref())
            .await?
        }
    };

    tracing::debug!(user_id = user.user_id, product_id = payload.product_id, "cart updated");
    Ok(ApiResponse::success("OK", item.into(), None))
}

pub async fn update_cart_item(
    state: &AppState,
    user: &AuthUser,
    item_id: i32,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    validation::positive("quantity", payload.quantity)?;
    let item = own_item(state.orm.as_ref(), user, item_id).await?;

    let mut active: cart_items::ActiveModel = item.into();
    active.quantity = Set(payload.quantity);
    active.updated_at = Set(Utc::now().into());
    let item = active.update(state.orm.as_ref()).await?;

    Ok(ApiResponse::item("Updated", item.into()))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    item_id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let item = own_item(state.orm.as_ref(), user, item_id).await?;
    CartItems::delete_by_id(item.id).exec(state.orm.as_ref()).await?;
    Ok(ApiResponse::done("Removed from cart"))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart = cart_for(state.orm.as_ref(), user.user_id).await?;
    let result = CartItems::delete_many()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .exec(state.orm.as_ref())
        .await?;
    tracing::debug!(user_id = user.user_id, removed = result.rows_affected, "cart cleared");
    Ok(ApiResponse::done("Cart cleared"))
}

/// The user's cart, created on first use.
pub(crate) async fn cart_for<C>(conn: &C, user_id: i32) -> AppResult<carts::Model>
where
    C: ConnectionTrait,
{
    if let Some(cart) = Carts::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        return Ok(cart);
    }

    let cart = carts::ActiveModel {
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(cart)
}

pub(crate) async fn load_items<C>(conn: &C, cart_id: i32) -> AppResult<Vec<cart_items::Model>>
where
    C: ConnectionTrait,
{
    let items = CartItems::find()
        .filter(cart_items::Column::CartId.eq(cart_id))
        .filter(cart_items::Column::Archived.eq(false))
        .order_by_asc(cart_items::Column::Id)
        .all(conn)
        .await?;
    Ok(items)
}

async fn own_item<C>(conn: &C, user: &AuthUser, item_id: i32) -> AppResult<cart_items::Model>
where
    C: ConnectionTrait,
{
    let (item, cart) = CartItems::find_by_id(item_id)
        .find_also_related(Carts)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    match cart {
        Some(cart) if cart.user_id == user.user_id => Ok(item),
        _ => Err(AppError::NotFound),
    }
}

/// A cart line must name purchasable stock: an active product, and the
/// variant and size that stock is kept on.
async fn check_line<C>(conn: &C, line: &AddToCartRequest) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let product = Products::find_by_id(line.product_id)
        .one(conn)
        .await?
        .filter(|p| !p.archived)
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;

    let Some(variant_id) = line.variant_id else {
        if line.size_id.is_some() {
            return Err(AppError::bad_request("size requires a variant"));
        }
        if !product.single_size {
            return Err(AppError::bad_request(format!(
                "product {} requires a variant",
                product.id
            )));
        }
        return Ok(());
    };
    if product.single_size {
        return Err(AppError::bad_request(format!(
            "product {} is single-size and has no variants",
            product.id
        )));
    }

    let variant = ProductVariants::find_by_id(variant_id)
        .one(conn)
        .await?
        .filter(|v| !v.archived && v.product_id == product.id)
        .ok_or_else(|| AppError::BadRequest("variant not found".to_string()))?;

    match (variant.single_size, line.size_id) {
        (true, None) => Ok(()),
        (true, Some(_)) => Err(AppError::bad_request(format!(
            "variant {variant_id} has no sizes"
        ))),
        (false, None) => Err(AppError::bad_request(format!(
            "variant {variant_id} requires a size"
        ))),
        (false, Some(size_id)) => {
            Sizes::find_by_id(size_id)
                .one(conn)
                .await?
                .filter(|s| !s.archived && s.variant_id == variant_id)
                .ok_or_else(|| AppError::BadRequest("size not found".to_string()))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::products;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn product(single_size: bool) -> products::Model {
        products::Model {
            id: 1,
            name: "Runner".into(),
            description: None,
            price: 5_000,
            category_id: None,
            sub_category_id: None,
            quantity: 10,
            single_size,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn cart() -> carts::Model {
        carts::Model {
            id: 4,
            user_id: 2,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn line(id: i32, quantity: i32) -> cart_items::Model {
        cart_items::Model {
            id,
            cart_id: 4,
            product_id: 1,
            variant_id: None,
            size_id: None,
            quantity,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn request(quantity: i32) -> AddToCartRequest {
        AddToCartRequest {
            product_id: 1,
            variant_id: None,
            size_id: None,
            quantity,
        }
    }

    fn customer() -> AuthUser {
        AuthUser { user_id: 2, is_admin: false }
    }

    #[tokio::test]
    async fn same_line_merges_quantity() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(true)]])
            .append_query_results([vec![cart()]])
            .append_query_results([vec![line(9, 2)]])
            .append_query_results([vec![line(9, 5)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let resp = add_to_cart(&state, &customer(), request(3)).await.unwrap();
        let item = resp.data.unwrap();
        assert_eq!(item.id, 9);
        assert_eq!(item.quantity, 5);
    }

    #[tokio::test]
    async fn multi_size_product_needs_a_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(false)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = add_to_cart(&state, &customer(), request(1)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn single_size_product_takes_no_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(true)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let payload = AddToCartRequest {
            variant_id: Some(5),
            ..request(1)
        };
        let err = add_to_cart(&state, &customer(), payload).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("has no variants")));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = add_to_cart(&state, &customer(), request(0)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
