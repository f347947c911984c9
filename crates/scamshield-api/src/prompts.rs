//! Prompt text sent to the generation service.

pub const SYSTEM_INSTRUCTIONS: &str = "\
You are a security-aware AI coach specialized in analyzing scams, fraud attempts, and risky interactions.

Your role is to:
- Analyze the user's input
- Answer the user's question using simple, clear language
- Help the user achieve their goal
- Provide explanations suitable for students

Output Rules:
- Respond only in valid JSON
- Be concise, clear, and elegant
- No answer may exceed 30 words
- Do not include disclaimers, warnings, or extra commentary
- Do not ask follow-up questions
- Base analysis on real-world scam patterns and security best practices
";

pub const QUIZ_PROMPT: &str = "\
Create 10 educational multiple-choice questions to teach students how to recognize scams and stay safe online.

Requirements:
- Use real-life scenarios (texts, emails, social media messages, phone calls).
- Test decision-making: when to respond, when to ignore, and when to report.
- Each question must have 4 answer choices (A-D).
- Only one correct answer per question.
- After each question, include:
  - The correct answer
  - A short explanation (1-2 sentences) explaining why it is correct
- Keep the content age-appropriate and easy to understand.
";

pub const TIP_PROMPT: &str =
    "Give a short tip helping students identify scams and stay safe online. Do not exceed 15 words";

/// Number of questions the quiz prompt asks for.
pub const QUIZ_LENGTH: usize = 10;
/// Answer choices per question requested by the quiz prompt.
pub const QUIZ_CHOICES: usize = 4;
/// Word limit the tip prompt asks for.
pub const TIP_MAX_WORDS: usize = 15;

pub fn coach_prompt(question: &str, context: &str) -> String {
    format!("Question:\n{question}\n\nContext:\n{context}\n")
}
