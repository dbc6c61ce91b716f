use crate::{
    db::DbPool,
    dto::analysis::{ProductSales, StoreStats},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    services::pricing::effective_price,
};

/// Totals for one product at its current pricing. A product with no
/// orders yields zero totals, not an error.
pub async fn revenue_for_product(
    pool: &DbPool,
    product_id: i32,
) -> AppResult<ApiResponse<ProductSales>> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    let product = match product {
        Some(p) => p,
        None => {
            return Err(AppError::NotFound(format!(
                "Product with ID {product_id} not found"
            )));
        }
    };

    let (total_revenue, total_quantity) = product_totals(pool, &product).await?;

    let data = ProductSales {
        product_id,
        product_name: product.name,
        total_revenue,
        total_quantity_sold: total_quantity,
    };
    Ok(ApiResponse::success(
        "Revenue for product",
        data,
        Some(Meta::empty()),
    ))
}

/// Winner by summed quantity over all orders; ties go to the lowest
/// product id so the result is reproducible.
pub async fn highest_selling(pool: &DbPool) -> AppResult<ApiResponse<ProductSales>> {
    let top: Option<(i32, i64)> = sqlx::query_as(
        r#"
        SELECT product_id, SUM(quantity) AS total_quantity
        FROM orders
        GROUP BY product_id
        ORDER BY total_quantity DESC, product_id ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;
    let (product_id, total_quantity) = match top {
        Some(row) => row,
        None => return Err(AppError::NotFound("No sales data found".to_string())),
    };

    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    let product = match product {
        Some(p) => p,
        None => {
            return Err(AppError::NotFound(format!(
                "Product with ID {product_id} not found"
            )));
        }
    };

    let (total_revenue, _) = product_totals(pool, &product).await?;

    let data = ProductSales {
        product_id,
        product_name: product.name,
        total_revenue,
        total_quantity_sold: total_quantity,
    };
    Ok(ApiResponse::success(
        "Highest selling product",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn store_stats(pool: &DbPool) -> AppResult<ApiResponse<StoreStats>> {
    let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT count(*) FROM products),
            (SELECT count(*) FROM customers),
            (SELECT count(*) FROM orders),
            (SELECT count(*) FROM orders WHERE status),
            (SELECT count(*) FROM orders WHERE NOT status),
            (SELECT count(*) FROM categories)
        "#,
    )
    .fetch_one(pool)
    .await?;

    let data = StoreStats {
        total_products: row.0,
        total_customers: row.1,
        total_orders: row.2,
        shipped_orders: row.3,
        pending_orders: row.4,
        total_categories: row.5,
    };
    Ok(ApiResponse::success("Store stats", data, Some(Meta::empty())))
}

/// Fold over the product's orders, resolving the price fresh for each
/// line. Revenue tracks current pricing, never the price at order time.
async fn product_totals(pool: &DbPool, product: &Product) -> AppResult<(f64, i64)> {
    let quantities: Vec<(i32,)> =
        sqlx::query_as("SELECT quantity FROM orders WHERE product_id = $1")
            .bind(product.id)
            .fetch_all(pool)
            .await?;

    let mut total_revenue = 0.0;
    let mut total_quantity = 0i64;
    for (quantity,) in quantities {
        total_revenue += quantity as f64 * effective_price(product);
        total_quantity += quantity as i64;
    }
    Ok((total_revenue, total_quantity))
}
