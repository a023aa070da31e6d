//! Append-only log of scored repetitions

use serde::Serialize;

use crate::scoring::RepetitionScore;
use crate::thresholds::ExerciseKind;

use super::{ExerciseSummary, SessionSummary};

/// One scored repetition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRep {
    pub exercise: ExerciseKind,
    pub scores: RepetitionScore,
}

/// Scores of every repetition in the current session
#[derive(Debug, Clone, Default)]
pub struct SessionScoreLog {
    entries: Vec<ScoredRep>,
}

impl SessionScoreLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, exercise: ExerciseKind, scores: RepetitionScore) {
        self.entries.push(ScoredRep { exercise, scores });
    }

    pub fn entries(&self) -> &[ScoredRep] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Per-exercise summaries, exercises in order of first appearance
    pub fn summarize(&self) -> SessionSummary {
        let mut order: Vec<ExerciseKind> = Vec::new();
        for entry in &self.entries {
            if !order.contains(&entry.exercise) {
                order.push(entry.exercise);
            }
        }

        let exercises = order
            .into_iter()
            .filter_map(|exercise| {
                ExerciseSummary::from_scores(
                    exercise,
                    self.entries
                        .iter()
                        .filter(|entry| entry.exercise == exercise)
                        .map(|entry| &entry.scores),
                )
            })
            .collect();

        SessionSummary { exercises }
    }
}
