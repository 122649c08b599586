//! 题库接口
//! 请求体自行解析，保证格式错误也返回统一响应体

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;

use super::AppState;
use crate::error::AppError;
use crate::models::{ApiResponse, GenerationRequest, Question, QuestionBatch};
use crate::services::{generate_questions, merge_question, validation};

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::MalformedRequest(e.to_string()))
}

/// AI 出题，结果直接返回不落库
pub async fn create_questions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<Vec<Question>>>, AppError> {
    let mut request: GenerationRequest = parse_body(&body)?;
    validation::fill_defaults(&mut request);
    validation::validate_generation(&request)?;

    let questions = generate_questions(state.provider.as_ref(), &request).await?;
    log::info!(
        "AI 出题完成: keyword={}, type={}, 请求 {} 道, 返回 {} 道",
        request.keyword,
        request.type_id,
        request.count,
        questions.len()
    );

    Ok(Json(ApiResponse::success("success", questions)))
}

/// 获取题库列表
pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Question>>>, AppError> {
    let questions = state.with_store(|store| store.list_active()).await?;
    log::debug!("查询题库: {} 道", questions.len());

    Ok(Json(ApiResponse::success("success", questions)))
}

/// 添加题目（单个或数组），一个事务内全部写入
pub async fn add_questions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut questions = parse_body::<QuestionBatch>(&body)?.into_vec();
    if questions.is_empty() {
        return Err(AppError::MalformedRequest("题目列表不能为空".to_string()));
    }

    for question in &mut questions {
        validation::validate_new_question(question)?;
        question.id = 0;
        question.active = true;
    }

    let ids = state
        .with_store(move |store| store.insert_batch(&questions))
        .await?;
    log::info!("添加题目 {} 道: {:?}", ids.len(), ids);

    Ok(Json(ApiResponse::done("题目添加成功")))
}

/// 编辑题目，空字段保持原值
pub async fn edit_question(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let update: Question = parse_body(&body)?;
    let id = validation::validate_question_update(&update)?;

    state
        .with_store(move |store| {
            let existing = store.find_active(id)?;
            store.update(&merge_question(existing, &update))
        })
        .await?;
    log::info!("更新题目 {}", id);

    Ok(Json(ApiResponse::done("题目更新成功")))
}

/// 删除题目（软删除）
pub async fn delete_question(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let target: Question = parse_body(&body)?;
    let id = validation::require_id(&target)?;

    state.with_store(move |store| store.deactivate(id)).await?;
    log::info!("删除题目 {}", id);

    Ok(Json(ApiResponse::done("题目删除成功")))
}
