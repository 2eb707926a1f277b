use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{self, get_all_categories, get_category, get_category_by_type},
            questions::{count_questions, get_questions_for_category},
        },
        Category, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extract::{ApiJson, ApiPath},
    },
    validation::checked_text,
};

use super::{success, ApiResponse, Data, Deleted};

#[derive(Deserialize)]
struct NewCategory {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
pub(super) struct CategoryQuestions {
    data: Vec<Question>,
    category: Category,
    total: usize,
}

pub(super) async fn category_questions(
    pool: &SqlitePool,
    category: Category,
) -> ApiResponse<CategoryQuestions> {
    let questions = get_questions_for_category(pool, category.id).await?;
    success(CategoryQuestions {
        total: questions.len(),
        data: questions,
        category,
    })
}

async fn require_category(pool: &SqlitePool, id: i64) -> Result<Category, ApiError> {
    get_category(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))
}

// unlike lookups by path, an unknown category in a payload or filter is a client error
pub(super) async fn checked_category(pool: &SqlitePool, id: i64) -> Result<Category, ApiError> {
    get_category(pool, id)
        .await?
        .ok_or_else(|| ApiError::unprocessable(format!("Category #{id} does not exist")))
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Data<Vec<Category>>> {
    let categories = get_all_categories(&pool).await?;
    success(Data { data: categories })
}

async fn category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Data<Category>> {
    let c = require_category(&pool, id).await?;
    success(Data { data: c })
}

async fn create_category(
    State(pool): State<SqlitePool>,
    ApiJson(new_category): ApiJson<NewCategory>,
) -> ApiResponse<Data<Category>> {
    let kind = checked_text("Category type", &new_category.kind)?;
    let taken = || ApiError::unprocessable(format!("Category {kind} already exists"));
    if get_category_by_type(&pool, &kind).await?.is_some() {
        return Err(taken());
    }

    let id = match categories::create_category(&pool, &kind).await {
        Ok(id) => id,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => return Err(taken()),
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Created category #{id} ({kind})");
    success(Data {
        data: require_category(&pool, id).await?,
    })
}

async fn delete_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Deleted> {
    require_category(&pool, id).await?;
    let in_use = count_questions(&pool, Some(id)).await?;
    if in_use > 0 {
        return Err(ApiError::unprocessable(format!(
            "Category #{id} still has {in_use} questions"
        )));
    }

    categories::delete_category(&pool, id).await?;
    tracing::info!("Deleted category #{id}");
    success(Deleted { deleted: id })
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<CategoryQuestions> {
    let category = require_category(&pool, id).await?;
    category_questions(&pool, category).await
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories).post(create_category))
        .route("/categories/{id}", get(category).delete(delete_category))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
