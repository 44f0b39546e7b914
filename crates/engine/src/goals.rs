//! Profile goal list edits.
//!
//! The API stores goals as part of the profile, so every change produces a
//! whole new list that is sent back with the profile.

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Goal {
    pub title: String,
    pub progress: String,
    pub achieved: bool,
}

impl Goal {
    /// A fresh, not yet achieved goal. Title and progress are required.
    pub fn new(title: &str, progress: &str) -> ResultEngine<Self> {
        let title = title.trim();
        let progress = progress.trim();
        if title.is_empty() {
            return Err(EngineError::MissingField("title"));
        }
        if progress.is_empty() {
            return Err(EngineError::MissingField("progress"));
        }
        Ok(Self {
            title: title.to_string(),
            progress: progress.to_string(),
            achieved: false,
        })
    }
}

/// Returns `goals` with `goal` appended.
#[must_use]
pub fn with_added(goals: &[Goal], goal: Goal) -> Vec<Goal> {
    let mut out = goals.to_vec();
    out.push(goal);
    out
}

/// Returns `goals` with the entry at `index` replaced.
pub fn with_replaced(goals: &[Goal], index: usize, goal: Goal) -> ResultEngine<Vec<Goal>> {
    let mut out = goals.to_vec();
    let slot = out
        .get_mut(index)
        .ok_or(EngineError::MissingField("goal"))?;
    *slot = goal;
    Ok(out)
}

/// Returns `goals` without the entry at `index`.
pub fn with_removed(goals: &[Goal], index: usize) -> ResultEngine<Vec<Goal>> {
    if index >= goals.len() {
        return Err(EngineError::MissingField("goal"));
    }
    let mut out = goals.to_vec();
    out.remove(index);
    Ok(out)
}
