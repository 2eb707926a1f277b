use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_candidates, Category, Question},
    quiz::{self, Draw},
    server::{app::AppState, deserializers, extract::ApiJson},
    telemetry,
};

use super::categories::checked_category;
use super::{success, ApiResponse};

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default, deserialize_with = "deserializers::deserialize_loose_id")]
    category: Option<i64>,
    #[serde(
        default,
        alias = "previous_questions",
        deserialize_with = "deserializers::deserialize_loose_ids"
    )]
    previous: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct QuizQuestion {
    data: Option<Question>,
    category: Option<Category>,
    previous: Vec<i64>,
    available: usize,
}

async fn random_question(
    State(pool): State<SqlitePool>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let category = match request.category {
        Some(id) => Some(checked_category(&pool, id).await?),
        None => None,
    };
    let category_id = category.as_ref().map(|c| c.id);
    let previous = request.previous.unwrap_or_default();

    let candidates = get_candidates(&pool, category_id).await?;
    let Draw {
        question,
        previous,
        available,
    } = quiz::draw(candidates, previous, &mut rand::thread_rng());

    match &question {
        Some(q) => {
            telemetry::record_draw(category_id);
            tracing::debug!("Drew question #{}, {available} left", q.id);
        }
        None => tracing::debug!("No questions left to draw"),
    }

    success(QuizQuestion {
        data: question,
        category,
        previous,
        available,
    })
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/questions/random", post(random_question))
        .with_state(state)
}
