use crate::{
    audit::log_audit,
    db::DbPool,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
};

pub async fn list_products(
    pool: &DbPool,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (skip, limit) = query.list.normalize();
    let pattern = query.search.as_ref().map(|s| format!("%{s}%"));

    let items: Vec<Product> = sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
          AND ($2::integer IS NULL OR category_id = $2)
          AND ($3::boolean IS NULL OR is_sale = $3)
          AND ($4::double precision IS NULL OR price >= $4)
          AND ($5::double precision IS NULL OR price <= $5)
        ORDER BY id
        LIMIT $6 OFFSET $7
        "#,
    )
    .bind(&pattern)
    .bind(query.category_id)
    .bind(query.is_sale)
    .bind(query.min_price)
    .bind(query.max_price)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT count(*) FROM products
        WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
          AND ($2::integer IS NULL OR category_id = $2)
          AND ($3::boolean IS NULL OR is_sale = $3)
          AND ($4::double precision IS NULL OR price >= $4)
          AND ($5::double precision IS NULL OR price <= $5)
        "#,
    )
    .bind(&pattern)
    .bind(query.category_id)
    .bind(query.is_sale)
    .bind(query.min_price)
    .bind(query.max_price)
    .fetch_one(pool)
    .await?;

    let meta = Meta::new(skip, limit, total.0);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(pool: &DbPool, id: i32) -> AppResult<ApiResponse<Product>> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product not found".to_string())),
    };
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    pool: &DbPool,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (name, price, category_id, description, image, is_sale, sale_price)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.category_id)
    .bind(payload.description)
    .bind(payload.image)
    .bind(payload.is_sale)
    .bind(payload.sale_price)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

/// Upsert keyed by the caller-supplied id: creates the product when the
/// id is free (absent fields fall back to the column defaults), otherwise
/// applies a partial update.
pub async fn upsert_product(
    pool: &DbPool,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let (product, message) = match existing {
        None => {
            let product: Product = sqlx::query_as(
                r#"
                INSERT INTO products
                    (id, name, price, category_id, description, image, is_sale, sale_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(payload.name.unwrap_or_default())
            .bind(payload.price.unwrap_or(0.0))
            .bind(payload.category_id.unwrap_or(1))
            .bind(payload.description.flatten())
            .bind(payload.image.flatten())
            .bind(payload.is_sale.unwrap_or(false))
            .bind(payload.sale_price.unwrap_or(0.0))
            .fetch_one(pool)
            .await?;

            // Inserting an explicit id does not advance the serial, so
            // realign it or the next plain create collides.
            sqlx::query(
                "SELECT setval(pg_get_serial_sequence('products', 'id'), (SELECT max(id) FROM products))",
            )
            .execute(pool)
            .await?;

            (product, "Product created")
        }
        Some(mut product) => {
            if let Some(name) = payload.name {
                product.name = name;
            }
            if let Some(price) = payload.price {
                product.price = price;
            }
            if let Some(category_id) = payload.category_id {
                product.category_id = category_id;
            }
            if let Some(description) = payload.description {
                product.description = description;
            }
            if let Some(image) = payload.image {
                product.image = image;
            }
            if let Some(is_sale) = payload.is_sale {
                product.is_sale = is_sale;
            }
            if let Some(sale_price) = payload.sale_price {
                product.sale_price = sale_price;
            }

            let product: Product = sqlx::query_as(
                r#"
                UPDATE products
                SET name = $2, price = $3, category_id = $4, description = $5,
                    image = $6, is_sale = $7, sale_price = $8
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(product.id)
            .bind(product.name)
            .bind(product.price)
            .bind(product.category_id)
            .bind(product.description)
            .bind(product.image)
            .bind(product.is_sale)
            .bind(product.sale_price)
            .fetch_one(pool)
            .await?;

            (product, "Product updated")
        }
    };

    if let Err(err) = log_audit(
        pool,
        "product_upsert",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(message, product, Some(Meta::empty())))
}

pub async fn delete_product(
    pool: &DbPool,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    if let Err(err) = log_audit(
        pool,
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        format!("Product {id} deleted successfully"),
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
