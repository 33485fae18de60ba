//! Plan recommendation from the "which offer suits you" questionnaire.
//!
//! A fixed score table is built per call from the household bracket and
//! device flags; the highest score wins and ties go to the plan declared
//! first in [`ScoredPlan::ALL`].

mod scoring;
mod types;

pub use scoring::{evaluate, recommend, Recommender, ScoreTable, ScoreTableRecommender};
pub use types::*;

/// Starting scores, in [`ScoredPlan::ALL`] order. `smart` leads so that an
/// empty questionnaire lands on it.
pub const BASELINE_SCORES: [u32; 5] = [0, 4, 0, 0, 0];
