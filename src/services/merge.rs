//! 题目编辑合并
//!
//! 部分更新采用"非空覆盖"：更新体中的空字符串、0、空数组都表示未提供，
//! 保留原值。因此无法通过编辑接口把字段清空。

use crate::models::Question;

/// 将更新体合并到数据库中的原题，返回待保存的新记录
///
/// `id`、`is_generated`、`active` 始终沿用原题。
pub fn merge_question(existing: Question, update: &Question) -> Question {
    let mut merged = existing;

    overwrite_text(&mut merged.title, &update.title);
    overwrite_list(&mut merged.answers, &update.answers);
    overwrite_list(&mut merged.right, &update.right);
    overwrite_number(&mut merged.type_id, update.type_id);
    overwrite_number(&mut merged.difficulty, update.difficulty);
    overwrite_text(&mut merged.language, &update.language);
    overwrite_text(&mut merged.keyword, &update.keyword);

    merged
}

fn overwrite_text(target: &mut String, value: &str) {
    if !value.is_empty() {
        *target = value.to_string();
    }
}

fn overwrite_list(target: &mut Vec<String>, value: &[String]) {
    if !value.is_empty() {
        *target = value.to_vec();
    }
}

fn overwrite_number(target: &mut i64, value: i64) {
    if value != 0 {
        *target = value;
    }
}
