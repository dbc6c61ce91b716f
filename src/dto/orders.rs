use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: i32,
    pub customer_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Partial update. Only fields present in the payload are applied; the
/// nullable columns use a double `Option` so "address": null clears the
/// address while an omitted field leaves it alone.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub product_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub quantity: Option<i32>,
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    pub status: Option<bool>,
}

/// Flat record returned by order creation, with the amount computed at
/// current product pricing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: i32,
    pub product_id: i32,
    pub customer_id: i32,
    pub quantity: i32,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub date_ordered: Option<String>,
    pub status: bool,
    pub date_shipped: Option<String>,
    pub amount_paid: f64,
    pub customer_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LineItemProduct {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineItem {
    pub product: LineItemProduct,
    pub quantity: i32,
    pub price: f64,
}

/// Denormalized order view in the shape the legacy storefront consumes.
/// `items_list` is a list even though an order currently carries exactly
/// one product, so multi-line orders stay representable downstream.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrichedOrder {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub shipping_address: String,
    pub amount_paid: f64,
    pub date_ordered: Option<String>,
    pub shipped: bool,
    pub date_shipped: Option<String>,
    pub items_list: Vec<OrderLineItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrichedOrderList {
    pub items: Vec<EnrichedOrder>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkStatusRequest {
    pub order_ids: Vec<i32>,
    pub status: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkStatusResponse {
    pub updated_count: i64,
    pub order_ids: Vec<i32>,
}
