use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub category_id: i32,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_sale: bool,
    pub sale_price: f64,
}

/// `password` holds the argon2 hash and never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Order {
    pub id: i32,
    pub product_id: i32,
    pub customer_id: i32,
    pub quantity: i32,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: bool,
    pub date_shipped: Option<DateTime<Utc>>,
}
