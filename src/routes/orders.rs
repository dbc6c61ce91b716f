use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    db::DbPool,
    dto::orders::{
        BulkStatusRequest, BulkStatusResponse, CreateOrderRequest, CreateOrderResponse,
        EnrichedOrder, EnrichedOrderList, UpdateOrderRequest,
    },
    error::AppResult,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/bulk-status", post(bulk_update_status))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

// The storefront still calls the pre-pagination list endpoints.
pub fn legacy_router() -> Router<DbPool> {
    Router::new()
        .route("/orders-shipped", get(orders_shipped))
        .route("/orders-unshipped", get(orders_unshipped))
}

#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Page size, default 100"),
        ("shipped" = Option<bool>, Query, description = "Filter by shipping status"),
    ),
    responses(
        (status = 200, description = "List orders, newest first, enriched", body = ApiResponse<EnrichedOrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(pool): State<DbPool>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<EnrichedOrderList>>> {
    let resp = order_service::list_orders(&pool, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Enriched order", body = ApiResponse<EnrichedOrder>),
        (status = 404, description = "Order, or its product or customer, not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(pool): State<DbPool>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<EnrichedOrder>>> {
    let resp = order_service::get_order(&pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Create order", body = ApiResponse<CreateOrderResponse>),
        (status = 404, description = "Referenced product or customer not found"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<CreateOrderResponse>>> {
    let resp = order_service::create_order(&pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order, enriched", body = ApiResponse<EnrichedOrder>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(pool): State<DbPool>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<EnrichedOrder>>> {
    let resp = order_service::update_order(&pool, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted order"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(pool): State<DbPool>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::delete_order(&pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/orders/bulk-status",
    request_body = BulkStatusRequest,
    responses(
        (status = 200, description = "Bulk shipping-status update", body = ApiResponse<BulkStatusResponse>)
    ),
    tag = "Orders"
)]
pub async fn bulk_update_status(
    State(pool): State<DbPool>,
    Json(payload): Json<BulkStatusRequest>,
) -> AppResult<Json<ApiResponse<BulkStatusResponse>>> {
    let resp = order_service::bulk_update_status(&pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders-shipped",
    responses(
        (status = 200, description = "Shipped orders, enriched", body = ApiResponse<EnrichedOrderList>)
    ),
    tag = "Legacy Orders"
)]
pub async fn orders_shipped(
    State(pool): State<DbPool>,
) -> AppResult<Json<ApiResponse<EnrichedOrderList>>> {
    let resp = order_service::list_shipped(&pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders-unshipped",
    responses(
        (status = 200, description = "Unshipped orders, enriched", body = ApiResponse<EnrichedOrderList>)
    ),
    tag = "Legacy Orders"
)]
pub async fn orders_unshipped(
    State(pool): State<DbPool>,
) -> AppResult<Json<ApiResponse<EnrichedOrderList>>> {
    let resp = order_service::list_unshipped(&pool).await?;
    Ok(Json(resp))
}
