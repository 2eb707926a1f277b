#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use trivia_api::db::queries::{categories::create_category, questions::create_question};
use trivia_api::db::{establish_in_memory, run_migrations};
use trivia_api::server::app::{router, AppState, Listing};

pub const CATEGORIES: [&str; 4] = ["arts", "crafts", "beers", "drunken people"];
pub const QUESTIONS_PER_CATEGORY: i64 = 10;
pub const TOTAL_QUESTIONS: i64 = 40;
pub const QUESTIONS_PER_PAGE: i64 = 10;

/// Categories get ids 1..=4, questions 1..=40 with ten per category in id order.
pub async fn seeded_pool() -> SqlitePool {
    let pool = establish_in_memory().await.unwrap();
    run_migrations(&pool).await.unwrap();

    let mut n = 0;
    for kind in CATEGORIES {
        let category = create_category(&pool, kind).await.unwrap();
        for _ in 0..QUESTIONS_PER_CATEGORY {
            create_question(
                &pool,
                &format!("question {n}"),
                &format!("answer {n}"),
                category,
                1 + n % 5,
            )
            .await
            .unwrap();
            n += 1;
        }
    }
    pool
}

pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
}

pub async fn spawn_app() -> TestApp {
    let pool = seeded_pool().await;
    let listing = Listing {
        questions_per_page: QUESTIONS_PER_PAGE,
        max_per_page: 100,
    };
    TestApp {
        router: router(AppState::new(pool.clone(), listing)),
        pool,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
