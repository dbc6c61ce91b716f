use chrono::Utc;

use crate::{
    audit::log_audit,
    db::DbPool,
    error::AppResult,
    response::{ApiResponse, Meta},
    services::customer_service::hash_password,
};

/// Idempotent sample fixture: one category, one customer, two products,
/// one unshipped and one shipped order. A no-op as soon as any order
/// exists.
pub async fn create_sample_data(pool: &DbPool) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM orders LIMIT 1")
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(ApiResponse::success(
            "Sample data already exists",
            serde_json::json!({}),
            Some(Meta::empty()),
        ));
    }

    let password = hash_password("password")?;

    let mut txn = pool.begin().await?;

    let (category_id,): (i32,) =
        sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind("Sample Category")
            .fetch_one(&mut *txn)
            .await?;

    let (customer_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO customers (first_name, last_name, email, password)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind("John")
    .bind("Doe")
    .bind("john.doe@example.com")
    .bind(password)
    .fetch_one(&mut *txn)
    .await?;

    let (unshipped_product_id,): (i32,) = sqlx::query_as(
        "INSERT INTO products (name, price, category_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Sample Unshipped Product")
    .bind(29.99)
    .bind(category_id)
    .fetch_one(&mut *txn)
    .await?;

    let (shipped_product_id,): (i32,) = sqlx::query_as(
        "INSERT INTO products (name, price, category_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Sample Shipped Product")
    .bind(49.99)
    .bind(category_id)
    .fetch_one(&mut *txn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO orders (product_id, customer_id, quantity, address, status)
        VALUES ($1, $2, $3, $4, FALSE)
        "#,
    )
    .bind(unshipped_product_id)
    .bind(customer_id)
    .bind(2)
    .bind("123 Main St")
    .execute(&mut *txn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO orders (product_id, customer_id, quantity, address, status, date_shipped)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        "#,
    )
    .bind(shipped_product_id)
    .bind(customer_id)
    .bind(1)
    .bind("456 Oak Ave")
    .bind(Utc::now())
    .execute(&mut *txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(pool, "sample_data_create", Some("orders"), None).await {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Sample data created successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
