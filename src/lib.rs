pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;

use commands::{create_router, AppState};
use config::ServerConfig;
use services::{OpenAiChatProvider, QuestionStore};

pub async fn run() -> anyhow::Result<()> {
    // .env 不存在时直接使用进程环境变量
    let env_file = dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    utils::logging::init_logging(config.log_level).context("初始化日志失败")?;
    match env_file {
        Some(path) => log::info!("已加载 {}", path.display()),
        None => log::info!("未找到 .env 文件，使用进程环境变量"),
    }

    let store = QuestionStore::open(&config.db_path)
        .with_context(|| format!("打开数据库失败: {}", config.db_path.display()))?;
    let provider =
        OpenAiChatProvider::new(config.llm_timeout).context("创建 AI 客户端失败")?;

    let app = create_router(AppState::new(store, Arc::new(provider)), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("监听 {} 失败", config.bind_addr))?;
    log::info!("服务已启动: http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("服务异常退出")?;
    Ok(())
}
