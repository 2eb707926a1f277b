//! Random question selection for quiz play.

use std::collections::HashSet;

use rand::Rng;

use crate::db::Question;

#[derive(Debug, PartialEq, Eq)]
pub struct Draw {
    /// The chosen question, `None` once every candidate has been seen.
    pub question: Option<Question>,
    /// Ids already handed out, with the chosen one appended.
    pub previous: Vec<i64>,
    /// Candidates left after this draw.
    pub available: usize,
}

/// Picks one question uniformly among `candidates` that are not in `previous`.
///
/// Ids in `previous` that match no candidate are kept as they are: they do not
/// shrink `available` and are returned untouched.
pub fn draw<R: Rng + ?Sized>(
    mut candidates: Vec<Question>,
    mut previous: Vec<i64>,
    rng: &mut R,
) -> Draw {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    candidates.retain(|question| !seen.contains(&question.id));

    if candidates.is_empty() {
        return Draw {
            question: None,
            previous,
            available: 0,
        };
    }

    let chosen = candidates.swap_remove(rng.gen_range(0..candidates.len()));
    previous.push(chosen.id);
    Draw {
        question: Some(chosen),
        previous,
        available: candidates.len(),
    }
}
