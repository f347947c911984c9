pub mod error;
pub mod generation;
pub mod openai;
pub mod structured;
