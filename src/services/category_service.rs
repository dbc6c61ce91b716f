use crate::{
    audit::log_audit,
    db::DbPool,
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
};

pub async fn list_categories(pool: &DbPool) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = sqlx::query_as("SELECT * FROM categories ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(pool: &DbPool, id: i32) -> AppResult<ApiResponse<Category>> {
    let category: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let category = match category {
        Some(c) => c,
        None => return Err(AppError::NotFound("Category not found".to_string())),
    };
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    pool: &DbPool,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let category: Category =
        sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING *")
            .bind(payload.name)
            .fetch_one(pool)
            .await?;

    if let Err(err) = log_audit(
        pool,
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    pool: &DbPool,
    id: i32,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound("Category not found".to_string())),
    };

    let name = payload.name.unwrap_or(existing.name);
    let category: Category =
        sqlx::query_as("UPDATE categories SET name = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(name)
            .fetch_one(pool)
            .await?;

    if let Err(err) = log_audit(
        pool,
        "category_update",
        Some("categories"),
        Some(serde_json::json!({ "category_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category updated",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    pool: &DbPool,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    if let Err(err) = log_audit(
        pool,
        "category_delete",
        Some("categories"),
        Some(serde_json::json!({ "category_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        format!("Category {id} deleted successfully"),
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
