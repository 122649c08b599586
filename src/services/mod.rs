// 服务模块
// 提供核心业务逻辑服务

pub mod database;
pub mod generator;
pub mod llm;
pub mod merge;
pub mod normalizer;
pub mod prompt;
pub mod validation;

pub use database::QuestionStore;

pub use generator::generate_questions;

pub use llm::{ChatProvider, OpenAiChatProvider};

pub use merge::merge_question;

pub use normalizer::{normalize_response, strip_code_fence};

pub use prompt::GenerationPrompt;
