use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::{
        cart_items::{self, Entity as CartItems},
        order_items::{self, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        product_variants::{self, Entity as ProductVariants},
        products::{self, Entity as Products},
        promo_codes::{self, Entity as PromoCodes},
        sales::{self, Entity as Sales},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::{Order, OrderItem},
    pricing,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service::{cart_for, load_items},
    state::AppState,
    stock::{self, StockLine},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::bad_request(format!("unknown order status {other:?}"))),
        }
    }
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let page = query.page();
    let mut condition = Condition::all();
    if !user.is_admin {
        condition = condition.add(OrderCol::UserId.eq(user.user_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(OrderStatus::parse(status)?.as_str()));
    }
    if !query.include_archived.unwrap_or(false) {
        condition = condition.add(OrderCol::Archived.eq(false));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(state.orm.as_ref()).await?;
    let orders = finder
        .limit(page.per_page)
        .offset(page.offset)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(Meta::paged(&page, total)),
    ))
}

/// Turn the caller's cart into an order in one transaction: price each line,
/// apply an optional promo code, take the stock and empty the cart.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let now = Utc::now();
    let txn = state.orm.begin().await?;

    let cart = cart_for(&txn, user.user_id).await?;
    let lines = load_items(&txn, cart.id).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
    let product_rows: HashMap<i32, products::Model> = Products::find()
        .filter(products::Column::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let variant_ids: Vec<i32> = lines.iter().filter_map(|l| l.variant_id).collect();
    let variant_rows: HashMap<i32, product_variants::Model> = if variant_ids.is_empty() {
        HashMap::new()
    } else {
        ProductVariants::find()
            .filter(product_variants::Column::Id.is_in(variant_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect()
    };

    let active_sales = Sales::find()
        .filter(sales::Column::Archived.eq(false))
        .filter(sales::Column::StartsAt.lte(now))
        .filter(sales::Column::EndsAt.gt(now))
        .all(&txn)
        .await?;

    let mut priced = Vec::with_capacity(lines.len());
    let mut subtotal: i64 = 0;
    for line in &lines {
        let product = product_rows
            .get(&line.product_id)
            .filter(|p| !p.archived)
            .ok_or_else(|| {
                AppError::bad_request(format!("product {} is no longer available", line.product_id))
            })?;
        let variant = match line.variant_id {
            Some(id) => Some(variant_rows.get(&id).filter(|v| !v.archived).ok_or_else(|| {
                AppError::bad_request(format!("variant {id} is no longer available"))
            })?),
            None => None,
        };

        let base_price = variant.and_then(|v| v.price).unwrap_or(product.price);
        let unit_price = pricing::unit_price(
            base_price,
            &active_sales,
            product.id,
            product.category_id,
            now,
        );
        subtotal = i64::from(line.quantity)
            .checked_mul(unit_price)
            .and_then(|amount| subtotal.checked_add(amount))
            .ok_or_else(|| AppError::bad_request("order total is too large"))?;
        priced.push((line, unit_price));
    }

    let promo = match payload.promo_code.as_deref().map(pricing::normalize_code) {
        Some(code) if !code.is_empty() => Some(redeem_promo(&txn, &code, now).await?),
        _ => None,
    };
    let total_amount = match &promo {
        Some(promo) => pricing::apply_percent(subtotal, promo.discount_percent),
        None => subtotal,
    };

    let order = OrderActive {
        user_id: Set(user.user_id),
        status: Set(OrderStatus::Pending.as_str().into()),
        invoice_number: Set(build_invoice_number(Uuid::new_v4())),
        subtotal: Set(subtotal),
        discount: Set(subtotal - total_amount),
        total_amount: Set(total_amount),
        promo_code_id: Set(promo.as_ref().map(|p| p.id)),
        shipping_address: Set(payload.shipping_address),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(priced.len());
    for (line, unit_price) in priced {
        let item = order_items::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            variant_id: Set(line.variant_id),
            size_id: Set(line.size_id),
            quantity: Set(line.quantity),
            unit_price: Set(unit_price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        stock::consume(&txn, &stock_line(&item)).await?;
        items.push(OrderItem::from(item));
    }

    CartItems::delete_many()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id = user.user_id,
        total_amount = order.total_amount,
        "checkout completed"
    );
    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    if !user.can_access(order.user_id) {
        // Other users' orders are indistinguishable from missing ones.
        return Err(AppError::NotFound);
    }

    let items = items_of(state.orm.as_ref(), order.id).await?;
    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order.into(),
            items: items.into_iter().map(OrderItem::from).collect(),
        },
        Some(Meta::empty()),
    ))
}

/// Move an order to another status. Cancelling puts the items back into
/// stock; a cancelled order cannot be reopened.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let next = OrderStatus::parse(&payload.status)?;
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let current = OrderStatus::parse(&order.status)?;

    if current == OrderStatus::Cancelled && next != OrderStatus::Cancelled {
        return Err(AppError::bad_request("cancelled orders cannot be reopened"));
    }

    let items = items_of(&txn, order.id).await?;
    if next == OrderStatus::Cancelled && current != OrderStatus::Cancelled {
        for item in &items {
            stock::restock(&txn, &stock_line(item)).await?;
        }
    }

    let mut active: OrderActive = order.into();
    active.status = Set(next.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = id,
        from = current.as_str(),
        to = next.as_str(),
        "order status changed"
    );
    Ok(ApiResponse::success(
        "Status updated",
        OrderWithItems {
            order: order.into(),
            items: items.into_iter().map(OrderItem::from).collect(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn set_order_archived(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    archived: bool,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, order.user_id)?;

    let mut active: OrderActive = order.into();
    active.archived = Set(archived);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(state.orm.as_ref()).await?;

    let message = if archived { "Archived" } else { "Unarchived" };
    Ok(ApiResponse::item(message, order.into()))
}

/// Removes the order record only; stock is not returned.
pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Orders::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::done("Deleted"))
}

async fn redeem_promo<C>(
    conn: &C,
    code: &str,
    now: chrono::DateTime<Utc>,
) -> AppResult<promo_codes::Model>
where
    C: ConnectionTrait,
{
    let promo = PromoCodes::find()
        .filter(promo_codes::Column::Code.eq(code))
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("promo code {code} does not exist")))?;
    pricing::check_promo(&promo, now)?;

    PromoCodes::update_many()
        .col_expr(
            promo_codes::Column::TimesUsed,
            Expr::col(promo_codes::Column::TimesUsed).add(1),
        )
        .col_expr(promo_codes::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(promo_codes::Column::Id.eq(promo.id))
        .exec(conn)
        .await?;
    Ok(promo)
}

async fn items_of<C>(conn: &C, order_id: i32) -> AppResult<Vec<order_items::Model>>
where
    C: ConnectionTrait,
{
    let items = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .order_by_asc(order_items::Column::Id)
        .all(conn)
        .await?;
    Ok(items)
}

fn stock_line(item: &order_items::Model) -> StockLine {
    StockLine {
        product_id: item.product_id,
        variant_id: item.variant_id,
        size_id: item.size_id,
        quantity: item.quantity,
    }
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::carts;

    #[test]
    fn invoice_number_has_date_and_short_id() {
        let invoice = build_invoice_number(Uuid::new_v4());
        let parts: Vec<&str> = invoice.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn status_parsing() {
        assert_eq!(OrderStatus::parse(" Shipped ").unwrap(), OrderStatus::Shipped);
        assert_eq!(OrderStatus::parse("cancelled").unwrap().as_str(), "cancelled");
        assert!(OrderStatus::parse("refunded").is_err());
    }

    #[tokio::test]
    async fn checkout_of_empty_cart_is_rejected() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let cart = carts::Model {
            id: 4,
            user_id: 2,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cart]])
            .append_query_results([Vec::<cart_items::Model>::new()])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");
        let user = AuthUser { user_id: 2, is_admin: false };

        let err = checkout(&state, &user, CheckoutRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Cart is empty"));
    }

    #[tokio::test]
    async fn customers_cannot_change_status() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState::new(db, "Uncategorized");
        let user = AuthUser { user_id: 2, is_admin: false };

        let err = update_order_status(
            &state,
            &user,
            1,
            UpdateOrderStatusRequest {
                status: "paid".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
