//! CSV import and export of the whole trivia dataset.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, import_categories};
use super::queries::questions::{get_all_questions, import_questions};
use super::{Category, Question};
use crate::validation::{checked_difficulty, checked_text, ValidationError};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: &[impl Serialize]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), &categories)?;
    write_to(&dir.join(QUESTIONS_FILE), &questions)?;
    tracing::info!(
        "Exported {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    Ok(())
}

/// Trims category types and checks that, once merged with `existing` by id,
/// no two categories share a type ignoring ASCII case.
fn checked_categories(
    existing: &[Category],
    imported: Vec<Category>,
) -> anyhow::Result<Vec<Category>> {
    let mut categories = Vec::with_capacity(imported.len());
    for category in imported {
        let kind = checked_text("Category type", &category.kind)
            .with_context(|| format!("Invalid category #{}", category.id))?;
        categories.push(Category {
            id: category.id,
            kind,
        });
    }

    let mut merged: BTreeMap<i64, String> = existing
        .iter()
        .map(|c| (c.id, c.kind.to_ascii_lowercase()))
        .collect();
    merged.extend(categories.iter().map(|c| (c.id, c.kind.to_ascii_lowercase())));

    let mut owners: HashMap<&str, i64> = HashMap::new();
    for (id, kind) in &merged {
        if let Some(other) = owners.insert(kind.as_str(), *id) {
            bail!("Categories #{other} and #{id} both have type {kind:?}");
        }
    }
    Ok(categories)
}

fn checked_question(q: Question) -> Result<Question, ValidationError> {
    Ok(Question {
        question: checked_text("question", &q.question)?,
        answer: checked_text("answer", &q.answer)?,
        difficulty: checked_difficulty(q.difficulty)?,
        ..q
    })
}

fn checked_questions(imported: Vec<Question>) -> anyhow::Result<Vec<Question>> {
    imported
        .into_iter()
        .map(|q| {
            let id = q.id;
            checked_question(q).with_context(|| format!("Invalid question #{id}"))
        })
        .collect()
}

/// Loads both files into the database in a single transaction.
///
/// Rows follow the same rules as the API: trimmed non-empty text, difficulty
/// in range and category types unique ignoring case. Questions may only
/// reference categories that exist after the import.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;

    let existing = get_all_categories(pool).await?;
    let categories = checked_categories(&existing, categories)?;
    let questions = checked_questions(questions)?;

    let mut known: HashSet<i64> = existing.iter().map(|c| c.id).collect();
    known.extend(categories.iter().map(|c| c.id));
    if let Some(orphan) = questions.iter().find(|q| !known.contains(&q.category)) {
        bail!(
            "Question #{} references unknown category #{}",
            orphan.id,
            orphan.category
        );
    }

    let mut tx = pool.begin().await?;
    import_categories(&mut *tx, &categories).await?;
    import_questions(&mut *tx, &questions).await?;
    tx.commit().await?;

    tracing::info!(
        "Imported {} categories and {} questions from {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    Ok(())
}
