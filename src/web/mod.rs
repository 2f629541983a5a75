pub mod routes;

use sqlx::SqlitePool;

use crate::services::query::QueryComposer;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub composer: QueryComposer,
}
