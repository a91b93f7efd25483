//! Quantity roll-up for the catalog hierarchy.
//!
//! Stock lives at the leaves and is summed upwards:
//!
//! * a multi-size variant holds the sum of its sizes,
//! * a single-size variant holds the sum of its inventory rows, or its own
//!   quantity while it has none,
//! * a multi-size product holds the sum of its variants,
//! * a single-size product holds its own quantity.
//!
//! Archived children do not count. Every write to a size, inventory row or
//! variant must be followed by [`propagate_from_variant`] on the same
//! connection (normally the writer's transaction) so the parents are
//! recomputed from scratch. Parent rows are read `FOR UPDATE`, which
//! serializes concurrent writes to siblings.

use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    entity::{
        inventories::{self, Entity as Inventories},
        product_variants::{self, Entity as ProductVariants},
        products::{self, Entity as Products},
        sizes::{self, Entity as Sizes},
    },
    error::{AppError, AppResult},
};

/// One order line to take out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLine {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
}

pub fn sum_quantities<I>(quantities: I) -> AppResult<i32>
where
    I: IntoIterator<Item = i32>,
{
    let total: i64 = quantities.into_iter().map(i64::from).sum();
    if total < 0 {
        return Err(AppError::bad_request("quantity total cannot be negative"));
    }
    i32::try_from(total).map_err(|_| AppError::bad_request("quantity total out of range"))
}

pub fn variant_total(
    variant: &product_variants::Model,
    sizes: &[sizes::Model],
    stock: &[inventories::Model],
) -> AppResult<i32> {
    if !variant.single_size {
        return sum_quantities(sizes.iter().filter(|s| !s.archived).map(|s| s.quantity));
    }
    if stock.is_empty() {
        return Ok(variant.quantity);
    }
    sum_quantities(stock.iter().filter(|row| !row.archived).map(|row| row.quantity))
}

pub fn product_total(
    product: &products::Model,
    variants: &[product_variants::Model],
) -> AppResult<i32> {
    if product.single_size {
        return Ok(product.quantity);
    }
    sum_quantities(variants.iter().filter(|v| !v.archived).map(|v| v.quantity))
}

/// Take `need` units from `(row id, quantity)` pairs in the given order.
///
/// Returns the new quantity of every row touched, or `None` when the rows
/// cannot cover the request.
pub fn draw_down(rows: &[(i32, i32)], need: i32) -> Option<Vec<(i32, i32)>> {
    let mut remaining = need;
    let mut updates = Vec::new();
    for &(id, available) in rows {
        if remaining == 0 {
            break;
        }
        if available <= 0 {
            continue;
        }
        let taken = available.min(remaining);
        remaining -= taken;
        updates.push((id, available - taken));
    }
    (remaining == 0).then_some(updates)
}

/// Recompute a variant's quantity from its children and store it.
pub async fn recompute_variant<C>(conn: &C, variant_id: i32) -> AppResult<product_variants::Model>
where
    C: ConnectionTrait,
{
    let mut variant = ProductVariants::find_by_id(variant_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let (size_rows, stock_rows) = if variant.single_size {
        let stock_rows = Inventories::find()
            .filter(inventories::Column::VariantId.eq(variant_id))
            .all(conn)
            .await?;
        (Vec::new(), stock_rows)
    } else {
        let size_rows = Sizes::find()
            .filter(sizes::Column::VariantId.eq(variant_id))
            .all(conn)
            .await?;
        (size_rows, Vec::new())
    };

    let total = variant_total(&variant, &size_rows, &stock_rows)?;
    if total != variant.quantity {
        ProductVariants::update_many()
            .col_expr(product_variants::Column::Quantity, Expr::value(total))
            .col_expr(product_variants::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(product_variants::Column::Id.eq(variant_id))
            .exec(conn)
            .await?;
        tracing::debug!(variant_id, from = variant.quantity, to = total, "variant quantity recomputed");
        variant.quantity = total;
    }
    Ok(variant)
}

/// Recompute a product's quantity from its variants and store it.
pub async fn recompute_product<C>(conn: &C, product_id: i32) -> AppResult<products::Model>
where
    C: ConnectionTrait,
{
    let mut product = Products::find_by_id(product_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let variants = if product.single_size {
        Vec::new()
    } else {
        ProductVariants::find()
            .filter(product_variants::Column::ProductId.eq(product_id))
            .all(conn)
            .await?
    };

    let total = product_total(&product, &variants)?;
    if total != product.quantity {
        Products::update_many()
            .col_expr(products::Column::Quantity, Expr::value(total))
            .col_expr(products::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(products::Column::Id.eq(product_id))
            .exec(conn)
            .await?;
        tracing::debug!(product_id, from = product.quantity, to = total, "product quantity recomputed");
        product.quantity = total;
    }
    Ok(product)
}

/// Re-establish the roll-up for a variant and its product.
pub async fn propagate_from_variant<C>(
    conn: &C,
    variant_id: i32,
) -> AppResult<(product_variants::Model, products::Model)>
where
    C: ConnectionTrait,
{
    let variant = recompute_variant(conn, variant_id).await?;
    let product = recompute_product(conn, variant.product_id).await?;
    Ok((variant, product))
}

pub async fn propagate_from_size<C>(
    conn: &C,
    size_id: i32,
) -> AppResult<(product_variants::Model, products::Model)>
where
    C: ConnectionTrait,
{
    let size = Sizes::find_by_id(size_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    propagate_from_variant(conn, size.variant_id).await
}

/// Remove an order line from stock at its leaf and roll the change up.
pub async fn consume<C>(conn: &C, line: &StockLine) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if line.quantity <= 0 {
        return Err(AppError::bad_request("quantity must be greater than 0"));
    }

    if let Some(size_id) = line.size_id {
        let size = Sizes::find_by_id(size_id)
            .lock(LockType::Update)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::bad_request(format!("size {size_id} not found")))?;
        if line.variant_id.is_some_and(|variant_id| variant_id != size.variant_id) {
            return Err(AppError::bad_request(format!(
                "size {size_id} does not belong to variant {}",
                line.variant_id.unwrap_or_default()
            )));
        }
        let variant = ProductVariants::find_by_id(size.variant_id)
            .lock(LockType::Update)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::bad_request(format!("variant {} not found", size.variant_id)))?;
        ensure_product(&variant, line)?;
        if variant.single_size {
            return Err(AppError::bad_request(format!(
                "variant {} does not take sizes",
                variant.id
            )));
        }
        if size.archived || size.quantity < line.quantity {
            return Err(insufficient(line));
        }
        Sizes::update_many()
            .col_expr(sizes::Column::Quantity, Expr::value(size.quantity - line.quantity))
            .col_expr(sizes::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(sizes::Column::Id.eq(size_id))
            .exec(conn)
            .await?;
        propagate_from_variant(conn, size.variant_id).await?;
        return Ok(());
    }

    if let Some(variant_id) = line.variant_id {
        let variant = ProductVariants::find_by_id(variant_id)
            .lock(LockType::Update)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::bad_request(format!("variant {variant_id} not found")))?;
        ensure_product(&variant, line)?;
        if !variant.single_size {
            return Err(AppError::bad_request(format!(
                "variant {variant_id} requires a size"
            )));
        }
        let product = Products::find_by_id(variant.product_id)
            .lock(LockType::Update)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::bad_request(format!("product {} not found", line.product_id)))?;
        if product.single_size {
            return Err(AppError::bad_request(format!(
                "product {} is single-size and has no variants to sell",
                product.id
            )));
        }
        if variant.archived {
            return Err(insufficient(line));
        }

        let stock_rows = Inventories::find()
            .filter(inventories::Column::VariantId.eq(variant_id))
            .order_by_asc(inventories::Column::Id)
            .all(conn)
            .await?;

        if stock_rows.is_empty() {
            if variant.quantity < line.quantity {
                return Err(insufficient(line));
            }
            ProductVariants::update_many()
                .col_expr(
                    product_variants::Column::Quantity,
                    Expr::value(variant.quantity - line.quantity),
                )
                .col_expr(product_variants::Column::UpdatedAt, Expr::current_timestamp().into())
                .filter(product_variants::Column::Id.eq(variant_id))
                .exec(conn)
                .await?;
        } else {
            let live: Vec<(i32, i32)> = stock_rows
                .iter()
                .filter(|row| !row.archived)
                .map(|row| (row.id, row.quantity))
                .collect();
            let updates = draw_down(&live, line.quantity).ok_or_else(|| insufficient(line))?;
            for (id, quantity) in updates {
                Inventories::update_many()
                    .col_expr(inventories::Column::Quantity, Expr::value(quantity))
                    .col_expr(inventories::Column::UpdatedAt, Expr::current_timestamp().into())
                    .filter(inventories::Column::Id.eq(id))
                    .exec(conn)
                    .await?;
            }
        }
        propagate_from_variant(conn, variant_id).await?;
        return Ok(());
    }

    let product = Products::find_by_id(line.product_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::bad_request(format!("product {} not found", line.product_id)))?;
    if !product.single_size {
        return Err(AppError::bad_request(format!(
            "product {} requires a variant",
            product.id
        )));
    }
    if product.archived || product.quantity < line.quantity {
        return Err(insufficient(line));
    }
    Products::update_many()
        .col_expr(products::Column::Quantity, Expr::value(product.quantity - line.quantity))
        .col_expr(products::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(products::Column::Id.eq(product.id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Put an order line back into stock, the reverse of [`consume`].
///
/// Single-size variants backed by inventory receive the units on their
/// lowest-id live row. Leaves that no longer exist are skipped, and so are
/// product-level lines on a multi-size product.
pub async fn restock<C>(conn: &C, line: &StockLine) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if let Some(size_id) = line.size_id {
        let Some(size) = Sizes::find_by_id(size_id)
            .lock(LockType::Update)
            .one(conn)
            .await?
        else {
            tracing::warn!(size_id, "restock skipped, size no longer exists");
            return Ok(());
        };
        Sizes::update_many()
            .col_expr(sizes::Column::Quantity, Expr::value(size.quantity + line.quantity))
            .col_expr(sizes::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(sizes::Column::Id.eq(size_id))
            .exec(conn)
            .await?;
        propagate_from_variant(conn, size.variant_id).await?;
        return Ok(());
    }

    if let Some(variant_id) = line.variant_id {
        let Some(variant) = ProductVariants::find_by_id(variant_id)
            .lock(LockType::Update)
            .one(conn)
            .await?
        else {
            tracing::warn!(variant_id, "restock skipped, variant no longer exists");
            return Ok(());
        };
        let target = Inventories::find()
            .filter(inventories::Column::VariantId.eq(variant_id))
            .filter(inventories::Column::Archived.eq(false))
            .order_by_asc(inventories::Column::Id)
            .one(conn)
            .await?;
        match target {
            Some(row) => {
                Inventories::update_many()
                    .col_expr(inventories::Column::Quantity, Expr::value(row.quantity + line.quantity))
                    .col_expr(inventories::Column::UpdatedAt, Expr::current_timestamp().into())
                    .filter(inventories::Column::Id.eq(row.id))
                    .exec(conn)
                    .await?;
            }
            None => {
                ProductVariants::update_many()
                    .col_expr(
                        product_variants::Column::Quantity,
                        Expr::value(variant.quantity + line.quantity),
                    )
                    .col_expr(product_variants::Column::UpdatedAt, Expr::current_timestamp().into())
                    .filter(product_variants::Column::Id.eq(variant_id))
                    .exec(conn)
                    .await?;
            }
        }
        propagate_from_variant(conn, variant_id).await?;
        return Ok(());
    }

    let Some(product) = Products::find_by_id(line.product_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
    else {
        tracing::warn!(product_id = line.product_id, "restock skipped, product no longer exists");
        return Ok(());
    };
    if !product.single_size {
        // Leaf ids are nulled when a size or variant is deleted.
        tracing::warn!(
            product_id = product.id,
            quantity = line.quantity,
            "restock skipped, line has no leaf on a multi-size product"
        );
        return Ok(());
    }
    Products::update_many()
        .col_expr(
            products::Column::Quantity,
            Expr::col(products::Column::Quantity).add(line.quantity),
        )
        .col_expr(products::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(products::Column::Id.eq(product.id))
        .exec(conn)
        .await?;
    Ok(())
}

fn ensure_product(variant: &product_variants::Model, line: &StockLine) -> AppResult<()> {
    if variant.product_id != line.product_id {
        return Err(AppError::bad_request(format!(
            "variant {} does not belong to product {}",
            variant.id, line.product_id
        )));
    }
    Ok(())
}

fn insufficient(line: &StockLine) -> AppError {
    AppError::bad_request(format!(
        "Insufficient stock for product {}",
        line.product_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

    fn variant(id: i32, product_id: i32, quantity: i32, single_size: bool) -> product_variants::Model {
        product_variants::Model {
            id,
            product_id,
            name: format!("variant {id}"),
            color: None,
            price: None,
            quantity,
            single_size,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn size(id: i32, variant_id: i32, quantity: i32) -> sizes::Model {
        sizes::Model {
            id,
            variant_id,
            label: format!("S{id}"),
            quantity,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn stock(id: i32, variant_id: i32, quantity: i32) -> inventories::Model {
        inventories::Model {
            id,
            variant_id,
            location: format!("warehouse-{id}"),
            quantity,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn product(id: i32, quantity: i32, single_size: bool) -> products::Model {
        products::Model {
            id,
            name: format!("product {id}"),
            description: None,
            price: 1_000,
            category_id: None,
            sub_category_id: None,
            quantity,
            single_size,
            archived: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn updated() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn bound(log: &[Transaction], index: usize) -> Vec<Value> {
        log[index].statements()[0]
            .values
            .as_ref()
            .map(|values| values.0.clone())
            .unwrap_or_default()
    }

    fn line(variant_id: Option<i32>, size_id: Option<i32>, quantity: i32) -> StockLine {
        StockLine {
            product_id: 10,
            variant_id,
            size_id,
            quantity,
        }
    }

    #[test]
    fn multi_size_variant_sums_live_sizes() {
        let mut archived = size(3, 1, 100);
        archived.archived = true;
        let sizes = vec![size(1, 1, 4), size(2, 1, 6), archived];
        let total = variant_total(&variant(1, 1, 0, false), &sizes, &[]).unwrap();
        assert_eq!(total, 10);
    }

    #[test]
    fn single_size_variant_keeps_own_quantity_without_inventory() {
        let total = variant_total(&variant(1, 1, 7, true), &[], &[]).unwrap();
        assert_eq!(total, 7);
    }

    #[test]
    fn single_size_variant_sums_inventory_rows() {
        let rows = vec![stock(1, 1, 3), stock(2, 1, 9)];
        let total = variant_total(&variant(1, 1, 7, true), &[], &rows).unwrap();
        assert_eq!(total, 12);
    }

    #[test]
    fn fully_archived_inventory_counts_as_zero() {
        let mut row = stock(1, 1, 3);
        row.archived = true;
        let total = variant_total(&variant(1, 1, 7, true), &[], &[row]).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn product_total_follows_single_size_flag() {
        let mut hidden = variant(3, 1, 50, false);
        hidden.archived = true;
        let variants = vec![variant(1, 1, 5, false), variant(2, 1, 8, true), hidden];
        assert_eq!(product_total(&product(1, 0, false), &variants).unwrap(), 13);
        assert_eq!(product_total(&product(1, 42, true), &variants).unwrap(), 42);
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let sizes = vec![size(1, 1, i32::MAX), size(2, 1, 1)];
        let err = variant_total(&variant(1, 1, 0, false), &sizes, &[]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn draw_down_takes_rows_in_order() {
        let rows = vec![(1, 2), (2, 0), (3, 5)];
        assert_eq!(draw_down(&rows, 4), Some(vec![(1, 0), (3, 3)]));
        assert_eq!(draw_down(&rows, 2), Some(vec![(1, 0)]));
        assert_eq!(draw_down(&rows, 8), None);
    }

    #[tokio::test]
    async fn recompute_variant_writes_new_total() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(1, 10, 0, false)]])
            .append_query_results([vec![size(1, 1, 2), size(2, 1, 3)]])
            .append_exec_results([updated()])
            .into_connection();

        let variant = recompute_variant(&db, 1).await.unwrap();
        assert_eq!(variant.quantity, 5);
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn recompute_variant_skips_write_when_consistent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(1, 10, 5, false)]])
            .append_query_results([vec![size(1, 1, 2), size(2, 1, 3)]])
            .into_connection();

        let variant = recompute_variant(&db, 1).await.unwrap();
        assert_eq!(variant.quantity, 5);
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn recompute_variant_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product_variants::Model>::new()])
            .into_connection();

        let err = recompute_variant(&db, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn propagate_rolls_sizes_up_to_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(1, 10, 0, false)]])
            .append_query_results([vec![size(1, 1, 4), size(2, 1, 1)]])
            .append_exec_results([updated()])
            .append_query_results([vec![product(10, 3, false)]])
            .append_query_results([vec![variant(1, 10, 5, false), variant(2, 10, 6, false)]])
            .append_exec_results([updated()])
            .into_connection();

        let (variant, product) = propagate_from_variant(&db, 1).await.unwrap();
        assert_eq!(variant.quantity, 5);
        assert_eq!(product.quantity, 11);
    }

    #[tokio::test]
    async fn consume_single_size_product_decrements_own_stock() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(10, 3, true)]])
            .append_exec_results([updated()])
            .into_connection();

        let line = StockLine {
            product_id: 10,
            variant_id: None,
            size_id: None,
            quantity: 2,
        };
        consume(&db, &line).await.unwrap();
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn consume_rejects_insufficient_size_stock() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![size(1, 1, 1)]])
            .append_query_results([vec![variant(1, 10, 1, false)]])
            .into_connection();

        let line = StockLine {
            product_id: 10,
            variant_id: Some(1),
            size_id: Some(1),
            quantity: 2,
        };
        let err = consume(&db, &line).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("Insufficient stock")));
    }

    #[tokio::test]
    async fn consume_requires_variant_for_multi_size_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(10, 30, false)]])
            .into_connection();

        let line = StockLine {
            product_id: 10,
            variant_id: None,
            size_id: None,
            quantity: 1,
        };
        let err = consume(&db, &line).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("requires a variant")));
    }

    #[tokio::test]
    async fn consume_rejects_variant_of_single_size_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(5, 10, 4, true)]])
            .append_query_results([vec![product(10, 10, true)]])
            .into_connection();

        let err = consume(&db, &line(Some(5), None, 3)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("single-size")));
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn consume_rejects_size_of_single_size_variant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![size(1, 5, 3)]])
            .append_query_results([vec![variant(5, 10, 0, true)]])
            .into_connection();

        let err = consume(&db, &line(Some(5), Some(1), 1)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("does not take sizes")));
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn consume_draws_across_live_inventory_rows() {
        let archived = || inventories::Model {
            archived: true,
            ..stock(1, 5, 3)
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(5, 10, 6, true)]])
            .append_query_results([vec![product(10, 6, false)]])
            .append_query_results([vec![archived(), stock(2, 5, 2), stock(3, 5, 4)]])
            .append_exec_results([updated(), updated()])
            .append_query_results([vec![variant(5, 10, 6, true)]])
            .append_query_results([vec![archived(), stock(2, 5, 0), stock(3, 5, 1)]])
            .append_exec_results([updated()])
            .append_query_results([vec![product(10, 6, false)]])
            .append_query_results([vec![variant(5, 10, 1, true)]])
            .append_exec_results([updated()])
            .into_connection();

        consume(&db, &line(Some(5), None, 5)).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 11);
        assert_eq!(bound(&log, 3), vec![Value::from(0), Value::from(2)]);
        assert_eq!(bound(&log, 4), vec![Value::from(1), Value::from(3)]);
        assert_eq!(bound(&log, 7)[0], Value::from(1));
    }

    #[tokio::test]
    async fn restock_size_line_adds_back_and_rolls_up() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![size(1, 5, 3)]])
            .append_exec_results([updated()])
            .append_query_results([vec![variant(5, 10, 3, false)]])
            .append_query_results([vec![size(1, 5, 5)]])
            .append_exec_results([updated()])
            .append_query_results([vec![product(10, 3, false)]])
            .append_query_results([vec![variant(5, 10, 5, false)]])
            .append_exec_results([updated()])
            .into_connection();

        restock(&db, &line(Some(5), Some(1), 2)).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 8);
        assert_eq!(bound(&log, 1), vec![Value::from(5), Value::from(1)]);
        assert_eq!(bound(&log, 7)[0], Value::from(5));
    }

    #[tokio::test]
    async fn restock_inventory_variant_lands_on_lowest_live_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![variant(5, 10, 4, true)]])
            .append_query_results([vec![stock(2, 5, 1)]])
            .append_exec_results([updated()])
            .append_query_results([vec![variant(5, 10, 4, true)]])
            .append_query_results([vec![stock(2, 5, 4), stock(3, 5, 3)]])
            .append_exec_results([updated()])
            .append_query_results([vec![product(10, 4, false)]])
            .append_query_results([vec![variant(5, 10, 7, true)]])
            .append_exec_results([updated()])
            .into_connection();

        restock(&db, &line(Some(5), None, 3)).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 9);
        let target = &log[1].statements()[0].sql;
        assert!(target.contains(r#""inventories"."archived" = "#));
        assert!(target.contains(r#"ORDER BY "inventories"."id" ASC"#));
        assert_eq!(bound(&log, 2), vec![Value::from(4), Value::from(2)]);
    }

    #[tokio::test]
    async fn restock_single_size_product_adds_to_own_stock() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(10, 3, true)]])
            .append_exec_results([updated()])
            .into_connection();

        restock(&db, &line(None, None, 2)).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert_eq!(bound(&log, 1), vec![Value::from(2), Value::from(10)]);
    }

    #[tokio::test]
    async fn restock_without_leaf_on_multi_size_product_is_skipped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product(10, 8, false)]])
            .into_connection();

        restock(&db, &line(None, None, 2)).await.unwrap();
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
