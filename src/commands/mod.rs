// HTTP 命令模块
// 提供供前端调用的题库接口，以及前端静态页面

pub mod questions;

use std::path::Path;
use std::sync::Arc;

use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::AppError;
use crate::services::{ChatProvider, QuestionStore};
use crate::utils::index_document;

/// 前端构建产物缺失时的兜底页面
const FALLBACK_DOCUMENT: &str = r#"<!doctype html>
<html lang="zh-CN">
<head><meta charset="utf-8"><title>题库管理</title></head>
<body><p>前端页面尚未构建，请先构建 client 或通过 /api/questions 访问接口。</p></body>
</html>
"#;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub store: QuestionStore,
    pub provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(store: QuestionStore, provider: Arc<dyn ChatProvider>) -> Self {
        Self { store, provider }
    }

    /// 在阻塞线程池里执行数据库操作
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&QuestionStore) -> Result<T, AppError> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| AppError::Persistence(format!("数据库任务异常退出: {e}")))?
    }
}

pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let router = Router::new()
        .route("/api/questions", get(questions::list_questions))
        .route("/api/questions/create", post(questions::create_questions))
        .route("/api/questions/add", post(questions::add_questions))
        .route("/api/questions/edit", post(questions::edit_question))
        .route("/api/questions/delete", post(questions::delete_question))
        .with_state(state);

    if static_dir.is_dir() {
        log::info!("静态文件目录: {}", static_dir.display());
        let spa = ServeDir::new(static_dir).fallback(ServeFile::new(index_document(static_dir)));
        router.fallback_service(spa)
    } else {
        log::warn!("静态文件目录不存在: {}，使用内置页面", static_dir.display());
        router.fallback(fallback_document)
    }
}

async fn fallback_document() -> Html<&'static str> {
    Html(FALLBACK_DOCUMENT)
}
