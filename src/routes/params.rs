use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
    pub offset: u64,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Largest offset Postgres accepts as a bigint.
const MAX_OFFSET: u64 = i64::MAX as u64;

impl Pagination {
    pub fn normalize(&self) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        Page {
            page,
            per_page,
            offset: (page - 1).saturating_mul(per_page).min(MAX_OFFSET),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
    Quantity,
}

/// Query accepted by list endpoints without entity-specific filters.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Include archived records, default false.
    pub include_archived: Option<bool>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
        .normalize()
    }

    pub fn include_archived(&self) -> bool {
        self.include_archived.unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include_archived: Option<bool>,
    pub q: Option<String>,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn page(&self) -> Page {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
        .normalize()
    }
}

/// List query for rows that hang off a parent record, e.g. variants of a product.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChildListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include_archived: Option<bool>,
    pub parent_id: Option<i32>,
}

impl ChildListQuery {
    pub fn page(&self) -> Page {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
        .normalize()
    }

    pub fn include_archived(&self) -> bool {
        self.include_archived.unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub include_archived: Option<bool>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn page(&self) -> Page {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
        .normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_and_upper_bound() {
        let page = Pagination {
            page: Some(0),
            per_page: Some(1000),
        }
        .normalize();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn offset_follows_page() {
        let page = Pagination {
            page: Some(3),
            per_page: Some(10),
        }
        .normalize();
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let page = Pagination {
            page: Some(u64::MAX),
            per_page: Some(100),
        }
        .normalize();
        assert_eq!(page.page, u64::MAX);
        assert_eq!(page.offset, i64::MAX as u64);
    }

    #[test]
    fn defaults_are_first_page_of_twenty() {
        let page = ListQuery::default().page();
        assert_eq!(page, Page { page: 1, per_page: 20, offset: 0 });
        assert!(!ListQuery::default().include_archived());
    }
}
