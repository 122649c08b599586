use crate::error::AppError;
use crate::models::{GenerationRequest, Question};
use crate::services::llm::ChatProvider;
use crate::services::normalizer::normalize_response;
use crate::services::prompt::GenerationPrompt;

/// 出题流程：渲染提示词 → 调用模型 → 解析校验，结果不落库
pub async fn generate_questions(
    provider: &dyn ChatProvider,
    request: &GenerationRequest,
) -> Result<Vec<Question>, AppError> {
    let prompt = GenerationPrompt::render(request);
    let content = provider.complete(&prompt).await?;

    log::debug!("模型返回 {} 字节", content.len());

    normalize_response(request, &content)
}
