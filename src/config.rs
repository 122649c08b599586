//! 配置
//!
//! AI 凭据每次出题时从环境变量读取，缺任何一项只影响当次请求；
//! 服务端配置在启动时读取一次。

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "questionSystem.db";
const DEFAULT_STATIC_DIR: &str = "../client/dist";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// AI 模型配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl AiConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let config = Self {
            api_key: read("DEEPSEEK_API_KEY"),
            base_url: read("DEEPSEEK_URL"),
            model: read("DEEPSEEK_MODEL"),
        };

        let missing: Vec<&str> = [
            ("DEEPSEEK_API_KEY", &config.api_key),
            ("DEEPSEEK_URL", &config.base_url),
            ("DEEPSEEK_MODEL", &config.model),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "缺少 {}",
                missing.join(", ")
            )));
        }

        Ok(config)
    }
}

/// 服务端配置
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    pub llm_timeout: Duration,
    pub log_level: LevelFilter,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr = read("QUIZ_BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("QUIZ_BIND_ADDR 格式错误: {bind_addr}"))?;

        let timeout = read("QUIZ_LLM_TIMEOUT_SECS", &DEFAULT_LLM_TIMEOUT_SECS.to_string());
        let timeout: u64 = timeout
            .parse()
            .with_context(|| format!("QUIZ_LLM_TIMEOUT_SECS 格式错误: {timeout}"))?;
        if timeout == 0 {
            bail!("QUIZ_LLM_TIMEOUT_SECS 必须大于 0");
        }

        let log_level = read("QUIZ_LOG_LEVEL", "info");
        let log_level: LevelFilter = log_level
            .parse()
            .with_context(|| format!("QUIZ_LOG_LEVEL 格式错误: {log_level}"))?;

        Ok(Self {
            bind_addr,
            db_path: PathBuf::from(read("QUIZ_DB_PATH", DEFAULT_DB_PATH)),
            static_dir: PathBuf::from(read("QUIZ_STATIC_DIR", DEFAULT_STATIC_DIR)),
            llm_timeout: Duration::from_secs(timeout),
            log_level,
        })
    }
}
