/// Coaching, quiz and daily-tip services.
///
/// All three run the same pipeline: build a prompt, ask the generator for output
/// constrained to the target type's schema, then validate the raw text against that
/// type. They differ only in prompt and target type.
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use scamshield_common::generation::{GenerationError, GenerationRequest, Generator};
use scamshield_common::structured::{response_format_for, validate, OutputInvalid};

use crate::model::{CoachResponse, DailyTip, QuizQuestions};
use crate::prompts;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    OutputInvalid(#[from] OutputInvalid),
}

#[derive(Clone)]
pub struct CoachService {
    generator: Arc<dyn Generator>,
}

impl CoachService {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub async fn ask(&self, question: &str, context: &str) -> Result<CoachResponse, PipelineError> {
        self.run(prompts::coach_prompt(question, context)).await
    }

    pub async fn quiz(&self) -> Result<QuizQuestions, PipelineError> {
        let quiz: QuizQuestions = self.run(prompts::QUIZ_PROMPT.to_string()).await?;
        audit_quiz(&quiz);
        Ok(quiz)
    }

    pub async fn daily_tip(&self) -> Result<DailyTip, PipelineError> {
        let tip: DailyTip = self.run(prompts::TIP_PROMPT.to_string()).await?;
        let words = tip.tip.split_whitespace().count();
        if words > prompts::TIP_MAX_WORDS {
            warn!(words, limit = prompts::TIP_MAX_WORDS, "tip exceeds requested length");
        }
        Ok(tip)
    }

    async fn run<T>(&self, user: String) -> Result<T, PipelineError>
    where
        T: JsonSchema + DeserializeOwned,
    {
        let request = GenerationRequest {
            system: prompts::SYSTEM_INSTRUCTIONS.to_string(),
            user,
            response_format: response_format_for::<T>(),
        };
        let raw = self.generator.generate(request).await?;
        debug!(bytes = raw.len(), "completion received");
        Ok(validate::<T>(&raw)?)
    }
}

/// Log prompt-contract violations the schema cannot express. The payload is not altered.
fn audit_quiz(quiz: &QuizQuestions) {
    if quiz.questions.len() != prompts::QUIZ_LENGTH {
        warn!(
            questions = quiz.questions.len(),
            expected = prompts::QUIZ_LENGTH,
            "quiz has unexpected length"
        );
    }
    for (position, q) in quiz.questions.iter().enumerate() {
        if q.answers.len() != prompts::QUIZ_CHOICES {
            warn!(position, answers = q.answers.len(), "quiz question has unexpected answer count");
        }
        if !q.is_consistent() {
            warn!(
                position,
                correct_answer_index = q.correct_answer_index,
                "quiz correct_answer does not match answers[correct_answer_index]"
            );
        }
    }
}
