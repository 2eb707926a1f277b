//! Field rules shared by the HTTP handlers and the CSV import.

use crate::db::queries::questions::{MAX_DIFFICULTY, MIN_DIFFICULTY};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} can not be empty")]
    Empty { field: &'static str },

    #[error(
        "Difficulty must be between {min} and {max}, got {difficulty}",
        min = MIN_DIFFICULTY,
        max = MAX_DIFFICULTY
    )]
    DifficultyOutOfRange { difficulty: i64 },
}

/// Trims `value`, rejecting it when nothing is left.
pub fn checked_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_owned())
}

pub fn checked_difficulty(difficulty: i64) -> Result<i64, ValidationError> {
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(ValidationError::DifficultyOutOfRange { difficulty });
    }
    Ok(difficulty)
}
