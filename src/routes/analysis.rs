use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    db::DbPool,
    dto::analysis::{ProductSales, StoreStats},
    error::AppResult,
    response::ApiResponse,
    services::analysis_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/revenue/{product_id}", get(revenue_for_product))
        .route("/highest-selling", get(highest_selling))
        .route("/stats", get(store_stats))
}

#[utoipa::path(
    get,
    path = "/analysis/revenue/{product_id}",
    params(("product_id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Revenue and quantity totals at current pricing", body = ApiResponse<ProductSales>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Analysis"
)]
pub async fn revenue_for_product(
    State(pool): State<DbPool>,
    Path(product_id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductSales>>> {
    let resp = analysis_service::revenue_for_product(&pool, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/analysis/highest-selling",
    responses(
        (status = 200, description = "Top product by summed quantity", body = ApiResponse<ProductSales>),
        (status = 404, description = "No sales data found"),
    ),
    tag = "Analysis"
)]
pub async fn highest_selling(
    State(pool): State<DbPool>,
) -> AppResult<Json<ApiResponse<ProductSales>>> {
    let resp = analysis_service::highest_selling(&pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/analysis/stats",
    responses(
        (status = 200, description = "Store-wide record counters", body = ApiResponse<StoreStats>)
    ),
    tag = "Analysis"
)]
pub async fn store_stats(
    State(pool): State<DbPool>,
) -> AppResult<Json<ApiResponse<StoreStats>>> {
    let resp = analysis_service::store_stats(&pool).await?;
    Ok(Json(resp))
}
