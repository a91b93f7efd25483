use std::sync::Arc;

use crate::db::OrmConn;

#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<OrmConn>,
    pub fallback_category: String,
}

impl AppState {
    pub fn new(orm: OrmConn, fallback_category: impl Into<String>) -> Self {
        Self {
            orm: Arc::new(orm),
            fallback_category: fallback_category.into(),
        }
    }
}
