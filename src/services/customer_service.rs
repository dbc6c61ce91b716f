use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::customers::{CreateCustomerRequest, CustomerList},
    error::{AppError, AppResult},
    models::Customer,
    response::{ApiResponse, Meta},
};

pub async fn list_customers(pool: &DbPool) -> AppResult<ApiResponse<CustomerList>> {
    let items: Vec<Customer> = sqlx::query_as("SELECT * FROM customers ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(Meta::empty()),
    ))
}

/// Idempotent by email: registering an address twice hands back the
/// existing record instead of erroring.
pub async fn create_customer(
    pool: &DbPool,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    let existing: Option<Customer> = sqlx::query_as("SELECT * FROM customers WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(pool)
        .await?;

    if let Some(customer) = existing {
        return Ok(ApiResponse::success(
            "Customer already registered",
            customer,
            Some(Meta::empty()),
        ));
    }

    let password = hash_password(&payload.password)?;

    let customer: Customer = sqlx::query_as(
        r#"
        INSERT INTO customers (first_name, last_name, phone, email, password)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.phone)
    .bind(payload.email)
    .bind(password)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        "customer_create",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Customer created",
        customer,
        Some(Meta::empty()),
    ))
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}
