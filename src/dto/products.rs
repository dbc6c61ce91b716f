use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

fn default_category_id() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_category_id")]
    pub category_id: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_sale: bool,
    #[serde(default)]
    pub sale_price: f64,
}

/// Partial update. Nullable columns use a double `Option` so that an
/// omitted field is left untouched while an explicit `null` clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i32>,
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    pub is_sale: Option<bool>,
    pub sale_price: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
