//! AI 响应解析与校验
//!
//! 把模型返回的原始文本整理成题目列表：去掉代码块标记，解析 JSON 数组，
//! 按题型检查字段完整性，再盖上请求里的分类属性。

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{null_as_default, GenerationRequest, Question, QuestionType};

static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```$").unwrap());

/// 模型返回的候选题目
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    answers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    right: Vec<String>,
}

impl Candidate {
    fn is_complete(&self, question_type: Option<QuestionType>) -> bool {
        let needs_options = question_type.map_or(true, QuestionType::has_options);
        !self.title.is_empty()
            && (!needs_options || (!self.answers.is_empty() && !self.right.is_empty()))
    }
}

/// 去掉首尾空白和可选的 ``` 代码块标记
pub fn strip_code_fence(raw: &str) -> &str {
    let content = raw.trim();
    let content = match FENCE_OPEN.find(content) {
        Some(m) => &content[m.end()..],
        None => content,
    };
    let content = match FENCE_CLOSE.find(content) {
        Some(m) => &content[..m.start()],
        None => content,
    };
    content.trim()
}

pub fn normalize_response(
    request: &GenerationRequest,
    raw: &str,
) -> Result<Vec<Question>, AppError> {
    let content = strip_code_fence(raw);

    let candidates: Vec<Candidate> = serde_json::from_str(content)
        .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    if candidates.is_empty() {
        return Err(AppError::EmptyResponse);
    }

    let question_type = request.question_type();
    candidates
        .into_iter()
        .map(|candidate| {
            if !candidate.is_complete(question_type) {
                return Err(AppError::IncompleteCandidate {
                    title: candidate.title,
                    answers: candidate.answers,
                    right: candidate.right,
                });
            }

            Ok(Question {
                id: 0,
                title: candidate.title,
                answers: candidate.answers,
                right: candidate.right,
                type_id: request.type_id,
                difficulty: request.difficulty,
                is_generated: true,
                language: request.language.clone(),
                keyword: request.keyword.clone(),
                active: true,
            })
        })
        .collect()
}
