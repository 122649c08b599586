//! 统一错误类型
//!
//! 所有错误都在请求边界转换成 `{code, msg, data}` 响应体，code 为负数。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::models::ApiResponse;

/// 单个字段的校验失败
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub code: i32,
    pub msg: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", first_violation_message(.0))]
    Validation(Vec<FieldViolation>),

    #[error("请求格式错误: {0}")]
    MalformedRequest(String),

    #[error("题目ID不能为空")]
    MissingId,

    #[error("题目不存在或已删除: id={0}")]
    NotFound(i64),

    #[error("题目数据损坏: id={id}, field={field}")]
    CorruptRecord { id: i64, field: &'static str },

    #[error("AI 配置不完整: {0}")]
    Configuration(String),

    #[error("AI访问失败：{0}")]
    Provider(String),

    #[error("解析ai返回的JSON失败：{0}")]
    MalformedResponse(String),

    #[error("AI 返回的数据为空")]
    EmptyResponse,

    #[error("AI 返回的数据不完整: title={title:?}, answers={answers:?}, right={right:?}")]
    IncompleteCandidate {
        title: String,
        answers: Vec<String>,
        right: Vec<String>,
    },

    #[error("数据库操作失败: {0}")]
    Persistence(String),
}

fn first_violation_message(violations: &[FieldViolation]) -> &'static str {
    violations.first().map(|v| v.msg).unwrap_or("参数校验失败")
}

impl AppError {
    /// 响应体中的业务错误码
    pub fn code(&self) -> i32 {
        match self {
            AppError::Validation(violations) => violations.first().map(|v| v.code).unwrap_or(-400),
            AppError::MalformedRequest(_) => -400,
            AppError::MissingId => -106,
            AppError::NotFound(_) => -108,
            AppError::CorruptRecord { .. } => -109,
            AppError::Configuration(_) => -201,
            AppError::Provider(_) => -202,
            AppError::MalformedResponse(_) => -203,
            AppError::EmptyResponse => -204,
            AppError::IncompleteCandidate { .. } => -205,
            AppError::Persistence(_) => -301,
        }
    }

    /// 服务端自身的故障，日志按 error 级别记录
    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::CorruptRecord { .. } | AppError::Configuration(_) | AppError::Persistence(_)
        )
    }

    fn data(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Validation(violations) => serde_json::to_value(violations).ok(),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            log::error!("请求失败 code={}: {}", self.code(), self);
        } else {
            log::warn!("请求被拒绝 code={}: {}", self.code(), self);
        }

        let body = ApiResponse::failure(self.code(), self.to_string(), self.data());
        // 前端只认 code 字段，HTTP 状态一律 200
        (StatusCode::OK, Json(body)).into_response()
    }
}
