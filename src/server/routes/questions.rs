use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category_by_type},
            questions::{
                self, count_questions, get_question, get_questions_page, search_questions,
            },
        },
        Category, Question,
    },
    pagination::PageRequest,
    server::{
        app::{AppState, Listing},
        deserializers::empty_string_as_none,
        error::ApiError,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    validation::{checked_difficulty, checked_text},
};

use super::categories::{category_questions, checked_category, CategoryQuestions};
use super::{success, ApiResponse, Data, Deleted};

#[derive(Deserialize)]
struct QuestionsQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    page: Option<i64>,
    #[serde(default, rename = "perPage", deserialize_with = "empty_string_as_none")]
    per_page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<i64>,
}

#[derive(Serialize)]
struct QuestionsPage {
    data: Vec<Question>,
    total: i64,
    category: Option<Category>,
    categories: Vec<Category>,
    page: i64,
    pages: i64,
    #[serde(rename = "perPage")]
    per_page: i64,
}

#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    category: i64,
    difficulty: i64,
}

#[derive(Deserialize)]
struct QuestionUpdate {
    question: Option<String>,
    answer: Option<String>,
    category: Option<i64>,
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchBody {
    search: String,
}

#[derive(Serialize)]
struct SearchResults {
    data: Vec<Question>,
    found: usize,
}

#[derive(Deserialize)]
struct CategoryFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<i64>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    State(listing): State<Listing>,
    ApiQuery(query): ApiQuery<QuestionsQuery>,
) -> ApiResponse<QuestionsPage> {
    let request = PageRequest::new(
        query.page,
        query.per_page,
        listing.questions_per_page,
        listing.max_per_page,
    )?;
    let category = match query.category {
        Some(id) => Some(checked_category(&pool, id).await?),
        None => None,
    };
    let category_id = category.as_ref().map(|c| c.id);

    let total = count_questions(&pool, category_id).await?;
    let items =
        get_questions_page(&pool, category_id, request.limit(), request.offset()).await?;
    let page = request.into_page(items, total)?;

    success(QuestionsPage {
        total: page.total,
        pages: page.pages(),
        page: page.page,
        per_page: page.per_page,
        data: page.items,
        category,
        categories: get_all_categories(&pool).await?,
    })
}

async fn question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Data<Question>> {
    let q = get_question(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", id))?;
    success(Data { data: q })
}

async fn create_question(
    State(pool): State<SqlitePool>,
    ApiJson(new_question): ApiJson<NewQuestion>,
) -> ApiResponse<Data<Question>> {
    let question = checked_text("question", &new_question.question)?;
    let answer = checked_text("answer", &new_question.answer)?;
    let difficulty = checked_difficulty(new_question.difficulty)?;
    let category = checked_category(&pool, new_question.category).await?;

    let id =
        questions::create_question(&pool, &question, &answer, category.id, difficulty).await?;
    tracing::info!("Created question #{id} in category #{}", category.id);

    let created = get_question(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", id))?;
    success(Data { data: created })
}

async fn update_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<QuestionUpdate>,
) -> ApiResponse<Data<Question>> {
    let mut q = get_question(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question", id))?;

    if let Some(question) = update.question {
        q.question = checked_text("question", &question)?;
    }
    if let Some(answer) = update.answer {
        q.answer = checked_text("answer", &answer)?;
    }
    if let Some(difficulty) = update.difficulty {
        q.difficulty = checked_difficulty(difficulty)?;
    }
    if let Some(category) = update.category {
        q.category = checked_category(&pool, category).await?.id;
    }

    questions::update_question(&pool, &q).await?;
    tracing::info!("Updated question #{id}");
    success(Data { data: q })
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Deleted> {
    if questions::delete_question(&pool, id).await? == 0 {
        return Err(ApiError::not_found("Question", id));
    }
    tracing::info!("Deleted question #{id}");
    success(Deleted { deleted: id })
}

async fn search(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let term = body.search.trim();
    let found = if term.is_empty() {
        vec![]
    } else {
        search_questions(&pool, term).await?
    };
    success(SearchResults {
        found: found.len(),
        data: found,
    })
}

async fn questions_by_category(
    State(pool): State<SqlitePool>,
    ApiQuery(filter): ApiQuery<CategoryFilter>,
) -> ApiResponse<CategoryQuestions> {
    let kind = filter.kind.as_deref().map(str::trim).filter(|k| !k.is_empty());
    let category = match (filter.id, kind) {
        (Some(id), None) => checked_category(&pool, id).await?,
        (None, Some(kind)) => get_category_by_type(&pool, kind)
            .await?
            .ok_or_else(|| ApiError::unprocessable(format!("Category {kind} does not exist")))?,
        (Some(_), Some(_)) => {
            return Err(ApiError::unprocessable(
                "Filter by either category id or type, not both",
            ))
        }
        (None, None) => {
            return Err(ApiError::unprocessable(
                "Either category id or type is required",
            ))
        }
    };
    category_questions(&pool, category).await
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/category", get(questions_by_category))
        .route(
            "/questions/{id}",
            get(question).patch(update_question).delete(delete_question),
        )
        .with_state(state)
}
