use chrono::{DateTime, Utc};

use crate::{
    entity::{promo_codes, sales},
    error::{AppError, AppResult},
};

/// Amount left after taking `percent` off, rounding the discount down.
pub fn apply_percent(amount: i64, percent: i32) -> i64 {
    let percent = i128::from(percent.clamp(0, 100));
    let discount = i128::from(amount) * percent / 100;
    // The discount is never larger than the amount, so it fits back in i64.
    amount - discount as i64
}

pub fn sale_is_active(sale: &sales::Model, now: DateTime<Utc>) -> bool {
    !sale.archived && sale.starts_at <= now && now < sale.ends_at
}

/// Deepest active sale covering a product directly or through its category.
pub fn best_sale<'a>(
    sales: &'a [sales::Model],
    product_id: i32,
    category_id: Option<i32>,
    now: DateTime<Utc>,
) -> Option<&'a sales::Model> {
    sales
        .iter()
        .filter(|sale| sale_is_active(sale, now))
        .filter(|sale| {
            sale.product_id == Some(product_id)
                || (category_id.is_some() && sale.category_id == category_id)
        })
        .max_by_key(|sale| sale.discount_percent)
}

pub fn unit_price(
    base_price: i64,
    sales: &[sales::Model],
    product_id: i32,
    category_id: Option<i32>,
    now: DateTime<Utc>,
) -> i64 {
    match best_sale(sales, product_id, category_id, now) {
        Some(sale) => apply_percent(base_price, sale.discount_percent),
        None => base_price,
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn check_promo(promo: &promo_codes::Model, now: DateTime<Utc>) -> AppResult<()> {
    if promo.archived {
        return Err(AppError::bad_request("promo code is not active"));
    }
    if promo.expires_at.is_some_and(|expires_at| expires_at <= now) {
        return Err(AppError::bad_request("promo code has expired"));
    }
    if promo.max_uses.is_some_and(|max| promo.times_used >= max) {
        return Err(AppError::bad_request("promo code has been used up"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sale(id: i32, percent: i32, product_id: Option<i32>, category_id: Option<i32>) -> sales::Model {
        let now = Utc::now();
        sales::Model {
            id,
            name: format!("sale {id}"),
            discount_percent: percent,
            product_id,
            category_id,
            starts_at: (now - Duration::days(1)).into(),
            ends_at: (now + Duration::days(1)).into(),
            archived: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn promo(max_uses: Option<i32>, times_used: i32, expires_in: Option<Duration>) -> promo_codes::Model {
        let now = Utc::now();
        promo_codes::Model {
            id: 1,
            code: "SPRING".into(),
            discount_percent: 10,
            max_uses,
            times_used,
            expires_at: expires_in.map(|d| (now + d).into()),
            archived: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn percent_discount_rounds_in_customer_favour() {
        assert_eq!(apply_percent(999, 10), 900);
        assert_eq!(apply_percent(1000, 100), 0);
        assert_eq!(apply_percent(1000, 0), 1000);
    }

    #[test]
    fn percent_discount_holds_for_largest_prices() {
        assert_eq!(apply_percent(i64::MAX / 10, 20), 737_869_762_948_382_064);
        assert_eq!(apply_percent(i64::MAX, 100), 0);
        assert_eq!(apply_percent(i64::MAX, 1), i64::MAX - i64::MAX / 100);
    }

    #[test]
    fn deepest_matching_sale_wins() {
        let sales = vec![
            sale(1, 10, Some(7), None),
            sale(2, 25, None, Some(3)),
            sale(3, 50, Some(8), None),
        ];
        let now = Utc::now();
        assert_eq!(best_sale(&sales, 7, Some(3), now).map(|s| s.id), Some(2));
        assert_eq!(best_sale(&sales, 7, None, now).map(|s| s.id), Some(1));
        assert!(best_sale(&sales, 9, None, now).is_none());
        assert_eq!(unit_price(2000, &sales, 7, Some(3), now), 1500);
    }

    #[test]
    fn sales_outside_window_are_ignored() {
        let mut expired = sale(1, 30, Some(7), None);
        expired.ends_at = (Utc::now() - Duration::hours(1)).into();
        let mut archived = sale(2, 40, Some(7), None);
        archived.archived = true;
        assert_eq!(unit_price(1000, &[expired, archived], 7, None, Utc::now()), 1000);
    }

    #[test]
    fn promo_checks_expiry_and_usage() {
        let now = Utc::now();
        assert!(check_promo(&promo(None, 0, None), now).is_ok());
        assert!(check_promo(&promo(Some(2), 2, None), now).is_err());
        assert!(check_promo(&promo(None, 0, Some(Duration::hours(-1))), now).is_err());
        assert_eq!(normalize_code(" spring "), "SPRING");
    }
}
