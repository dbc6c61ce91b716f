use axum::Router;

use crate::db::DbPool;

pub mod analysis;
pub mod categories;
pub mod customers;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod seed;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<DbPool> {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/customers", customers::router())
        .nest("/orders", orders::router())
        .merge(orders::legacy_router())
        .nest("/analysis", analysis::router())
        .merge(seed::router())
}
