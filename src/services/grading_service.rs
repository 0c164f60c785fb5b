use crate::models::question::Question;
use serde::{Deserialize, Serialize};

/// Share of correct answers at or above which an attempt counts as passed.
pub const PASS_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: u32,
    pub total: usize,
    pub percentage: f64,
    pub passed: bool,
}

pub struct GradingService;

impl GradingService {
    /// Exact index match. No partial credit.
    pub fn grade_answer(question: &Question, selected: usize) -> bool {
        question.is_correct(selected)
    }

    pub fn summarize(score: u32, total: usize) -> ScoreSummary {
        let ratio = if total == 0 {
            0.0
        } else {
            f64::from(score) / total as f64
        };
        ScoreSummary {
            score,
            total,
            percentage: (ratio * 1000.0).round() / 10.0,
            passed: total > 0 && ratio >= PASS_THRESHOLD,
        }
    }
}
