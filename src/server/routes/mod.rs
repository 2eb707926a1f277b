mod categories;
mod questions;
mod quiz;

use axum::Json;
use serde::Serialize;

use super::error::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quiz::quiz_router;

/// Successful responses carry `"success": true` next to the payload fields.
#[derive(Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub type ApiResponse<T> = Result<Json<Success<T>>, ApiError>;

fn success<T: Serialize>(body: T) -> ApiResponse<T> {
    Ok(Json(Success {
        success: true,
        body,
    }))
}

#[derive(Serialize)]
struct Data<T> {
    data: T,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}
