use axum::{Json, Router, extract::State, routing::post};

use crate::{db::DbPool, error::AppResult, response::ApiResponse, services::seed_service};

pub fn router() -> Router<DbPool> {
    Router::new().route("/create-sample-data", post(create_sample_data))
}

#[utoipa::path(
    post,
    path = "/create-sample-data",
    responses(
        (status = 200, description = "Seed sample data; no-op when orders already exist")
    ),
    tag = "Utility"
)]
pub async fn create_sample_data(
    State(pool): State<DbPool>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = seed_service::create_sample_data(&pool).await?;
    Ok(Json(resp))
}
