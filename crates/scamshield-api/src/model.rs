use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachRequest {
    pub question: String,
    /// Message or situation the question is about.
    pub text: String,
}

/// Structured answer from the coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoachResponse {
    pub answer: String,
}

/// A multiple-choice question. `correct_answer` is expected to equal
/// `answers[correct_answer_index]`, but only the shape is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuizQuestion {
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: String,
    pub correct_answer_index: i64,
    pub explanation: String,
}

impl QuizQuestion {
    /// Whether `correct_answer` is the answer at `correct_answer_index`.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.correct_answer_index)
            .ok()
            .and_then(|i| self.answers.get(i))
            .is_some_and(|answer| *answer == self.correct_answer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuizQuestions {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailyTip {
    pub tip: String,
}
