use axum::{Json, Router, extract::State, routing::get};

use crate::{
    db::DbPool,
    dto::customers::{CreateCustomerRequest, CustomerList},
    error::AppResult,
    models::Customer,
    response::ApiResponse,
    services::customer_service,
};

pub fn router() -> Router<DbPool> {
    Router::new().route("/", get(list_customers).post(create_customer))
}

#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "List customers", body = ApiResponse<CustomerList>)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(pool): State<DbPool>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Create customer (idempotent by email)", body = ApiResponse<Customer>)
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::create_customer(&pool, payload).await?;
    Ok(Json(resp))
}
