//! 大模型调用
//! 通过 OpenAI 兼容的 chat/completions 接口出题，单条 user 消息，单次返回

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AppError;

/// 大模型提供方：输入提示词，返回模型的原始文本
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion 请求
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

/// Chat completion 响应
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenAI 兼容接口客户端，凭据在每次调用时读取
#[derive(Clone)]
pub struct OpenAiChatProvider {
    http_client: reqwest::Client,
}

impl OpenAiChatProvider {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    /// 使用给定凭据发送一次聊天补全
    pub async fn chat(&self, config: &AiConfig, prompt: &str) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let request = ChatCompletionRequest {
            model: &config.model,
            messages: vec![ChatMessage::user(prompt)],
        };

        log::debug!("调用模型 {} @ {}", config.model, url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Provider(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("HTTP {status}: {body}")));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| AppError::Provider(format!("响应解析失败: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Provider("模型没有返回任何结果".to_string()))
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("请求超时: {err}")
    } else {
        err.to_string()
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let config = AiConfig::from_env()?;
        self.chat(&config, prompt).await
    }
}
