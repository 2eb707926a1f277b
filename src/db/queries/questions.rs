use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

pub const MIN_DIFFICULTY: i64 = 1;
pub const MAX_DIFFICULTY: i64 = 5;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty FROM questions WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Counts questions, optionally only those of one category.
pub async fn count_questions(pool: &SqlitePool, category: Option<i64>) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
SELECT COUNT(*) FROM questions WHERE (?1 IS NULL OR category = ?1)
        "#,
    )
    .bind(category)
    .fetch_one(pool)
    .await
}

pub async fn get_questions_page(
    pool: &SqlitePool,
    category: Option<i64>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE (?1 IS NULL OR category = ?1)
ORDER BY id
LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(category)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on the question text.
///
/// `instr` treats the term literally, so `%` and `_` need no escaping.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE instr(lower(question), lower(?1)) > 0
ORDER BY id
        "#,
    )
    .bind(term)
    .fetch_all(pool)
    .await
}

/// Questions eligible for a random draw, optionally limited to a category.
/// Previously asked ids are filtered out by the caller.
pub async fn get_candidates(
    pool: &SqlitePool,
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE (?1 IS NULL OR category = ?1)
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: i64,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn update_question(pool: &SqlitePool, question: &Question) -> sqlx::Result<u64> {
    let updated = sqlx::query(
        r#"
UPDATE questions SET question = ?1, answer = ?2, category = ?3, difficulty = ?4 WHERE id = ?5
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .bind(question.id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(updated)
}

/// Returns the number of deleted rows, 0 when the question did not exist.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let deleted = sqlx::query(
        r#"
DELETE FROM questions WHERE id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(deleted)
}

/// Inserts questions keeping their ids, replacing rows that already exist.
pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: &[Question],
) -> sqlx::Result<()> {
    for question in questions {
        sqlx::query(
            r#"
INSERT OR REPLACE INTO questions (id, question, answer, category, difficulty)
VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::categories::create_category;
    use crate::db::{establish_in_memory, run_migrations};

    async fn seeded() -> (SqlitePool, i64, i64) {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let science = create_category(&pool, "Science").await.unwrap();
        let art = create_category(&pool, "Art").await.unwrap();
        for n in 0..6 {
            let category = if n % 2 == 0 { science } else { art };
            create_question(&pool, &format!("Question {n}"), "42", category, 1 + n % 5)
                .await
                .unwrap();
        }
        (pool, science, art)
    }

    #[tokio::test]
    async fn counts_respect_category_filter() {
        let (pool, science, _) = seeded().await;
        assert_eq!(count_questions(&pool, None).await.unwrap(), 6);
        assert_eq!(count_questions(&pool, Some(science)).await.unwrap(), 3);
        assert_eq!(count_questions(&pool, Some(999)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn pages_are_ordered_by_id() {
        let (pool, _, _) = seeded().await;
        let first = get_questions_page(&pool, None, 4, 0).await.unwrap();
        let second = get_questions_page(&pool, None, 4, 4).await.unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 2);
        assert!(first.last().unwrap().id < second[0].id);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let (pool, _, art) = seeded().await;
        create_question(&pool, "100% cotton?", "yes", art, 2).await.unwrap();

        assert_eq!(search_questions(&pool, "QUESTION").await.unwrap().len(), 6);
        assert_eq!(search_questions(&pool, "%").await.unwrap().len(), 1);
        assert!(search_questions(&pool, "nothing like this").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn candidates_filter_by_category() {
        let (pool, science, _) = seeded().await;

        let candidates = get_candidates(&pool, Some(science)).await.unwrap();
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|q| q.category == science));

        let everything = get_candidates(&pool, None).await.unwrap();
        assert_eq!(everything.len(), 6);
        assert!(get_candidates(&pool, Some(999)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_report_affected_rows() {
        let (pool, _, art) = seeded().await;
        let mut question = get_all_questions(&pool).await.unwrap().remove(0);
        question.answer = "43".into();
        question.category = art;

        assert_eq!(update_question(&pool, &question).await.unwrap(), 1);
        assert_eq!(get_question(&pool, question.id).await.unwrap(), Some(question.clone()));

        assert_eq!(delete_question(&pool, question.id).await.unwrap(), 1);
        assert_eq!(delete_question(&pool, question.id).await.unwrap(), 0);
        assert!(get_question(&pool, question.id).await.unwrap().is_none());
    }
}
