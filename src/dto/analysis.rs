use serde::Serialize;
use utoipa::ToSchema;

/// Revenue and quantity totals for one product, at its current pricing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSales {
    pub product_id: i32,
    pub product_name: String,
    pub total_revenue: f64,
    pub total_quantity_sold: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreStats {
    pub total_products: i64,
    pub total_customers: i64,
    pub total_orders: i64,
    pub shipped_orders: i64,
    pub pending_orders: i64,
    pub total_categories: i64,
}
