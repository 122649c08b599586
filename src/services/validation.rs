//! 请求参数校验
//!
//! 校验会收集全部违规字段（按字段表顺序），最终只产生一个错误响应：
//! 响应的 code/msg 取第一条违规，data 中给出完整列表。

use crate::error::{AppError, FieldViolation};
use crate::models::{
    is_supported_language, Difficulty, GenerationRequest, Question, QuestionType,
    DEFAULT_LANGUAGE,
};

const ASK_COUNT: FieldViolation = FieldViolation {
    field: "number",
    code: -101,
    msg: "number不能为空，至少为1",
};
const ASK_LANGUAGE: FieldViolation = FieldViolation {
    field: "language",
    code: -102,
    msg: "language参数错误，language必须是go/javascript/java/python/c++",
};
const ASK_TYPE: FieldViolation = FieldViolation {
    field: "type",
    code: -103,
    msg: "type参数错误，type必须是1/2/3",
};
const ASK_KEYWORD: FieldViolation = FieldViolation {
    field: "keyword",
    code: -104,
    msg: "keyword不能为空",
};
const ASK_DIFFICULTY: FieldViolation = FieldViolation {
    field: "difficulty",
    code: -105,
    msg: "difficulty参数错误，difficulty必须是1/2/3",
};

const QUESTION_TITLE: FieldViolation = FieldViolation {
    field: "title",
    code: -111,
    msg: "title不能为空",
};
const QUESTION_LANGUAGE: FieldViolation = FieldViolation {
    field: "language",
    code: -112,
    msg: "language参数错误，language必须是go/javascript/java/python/c++",
};
const QUESTION_TYPE: FieldViolation = FieldViolation {
    field: "type_id",
    code: -113,
    msg: "type_id不能为空",
};
const QUESTION_KEYWORD: FieldViolation = FieldViolation {
    field: "keyword",
    code: -114,
    msg: "keyword不能为空",
};
const QUESTION_DIFFICULTY: FieldViolation = FieldViolation {
    field: "difficulty",
    code: -115,
    msg: "difficulty不能为空",
};

/// 零值字段填充默认值，必须在 `validate_generation` 之前调用
pub fn fill_defaults(request: &mut GenerationRequest) {
    if request.language.is_empty() {
        request.language = DEFAULT_LANGUAGE.to_string();
    }
    if request.type_id == 0 {
        request.type_id = QuestionType::SingleChoice.id();
    }
    if request.difficulty == 0 {
        request.difficulty = Difficulty::Easy as i64;
    }
}

pub fn validate_generation(request: &GenerationRequest) -> Result<(), AppError> {
    let mut violations = Vec::new();

    if request.count < 1 {
        violations.push(ASK_COUNT);
    }
    if !request.language.is_empty() && !is_supported_language(&request.language) {
        violations.push(ASK_LANGUAGE);
    }
    if request.type_id != 0 && QuestionType::from_id(request.type_id).is_none() {
        violations.push(ASK_TYPE);
    }
    if request.keyword.is_empty() {
        violations.push(ASK_KEYWORD);
    }
    if request.difficulty != 0 && Difficulty::from_id(request.difficulty).is_none() {
        violations.push(ASK_DIFFICULTY);
    }

    finish(violations)
}

/// 手工添加题目的完整校验
pub fn validate_new_question(question: &Question) -> Result<(), AppError> {
    let mut violations = Vec::new();

    if question.title.is_empty() {
        violations.push(QUESTION_TITLE);
    }
    if !question.language.is_empty() && !is_supported_language(&question.language) {
        violations.push(QUESTION_LANGUAGE);
    }
    if QuestionType::from_id(question.type_id).is_none() {
        violations.push(QUESTION_TYPE);
    }
    if question.keyword.is_empty() {
        violations.push(QUESTION_KEYWORD);
    }
    if Difficulty::from_id(question.difficulty).is_none() {
        violations.push(QUESTION_DIFFICULTY);
    }

    finish(violations)
}

/// 编辑请求只校验提供了的字段，空值表示"不修改"
pub fn validate_question_update(update: &Question) -> Result<i64, AppError> {
    let id = require_id(update)?;
    let mut violations = Vec::new();

    if !update.language.is_empty() && !is_supported_language(&update.language) {
        violations.push(QUESTION_LANGUAGE);
    }
    if update.type_id != 0 && QuestionType::from_id(update.type_id).is_none() {
        violations.push(QUESTION_TYPE);
    }
    if update.difficulty != 0 && Difficulty::from_id(update.difficulty).is_none() {
        violations.push(QUESTION_DIFFICULTY);
    }

    finish(violations).map(|_| id)
}

pub fn require_id(question: &Question) -> Result<i64, AppError> {
    if question.is_persisted() {
        Ok(question.id)
    } else {
        Err(AppError::MissingId)
    }
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), AppError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(err: AppError) -> Vec<i32> {
        match err {
            AppError::Validation(violations) => violations.iter().map(|v| v.code).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn valid_question() -> Question {
        Question {
            title: "什么是闭包".to_string(),
            answers: vec!["A".to_string(), "B".to_string()],
            right: vec!["A".to_string()],
            type_id: 1,
            difficulty: 2,
            language: "javascript".to_string(),
            keyword: "闭包".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn full_generation_request_is_valid() {
        let mut request = GenerationRequest {
            count: 2,
            language: "python".to_string(),
            type_id: 1,
            difficulty: 2,
            keyword: "recursion".to_string(),
        };
        fill_defaults(&mut request);

        assert!(validate_generation(&request).is_ok());
        assert_eq!(request.language, "python");
        assert_eq!(request.difficulty, 2);
    }

    #[test]
    fn defaults_fill_zero_values_only() {
        let mut request = GenerationRequest {
            count: 1,
            keyword: "goroutine".to_string(),
            ..Default::default()
        };
        fill_defaults(&mut request);

        assert_eq!(request.language, "go");
        assert_eq!(request.type_id, 1);
        assert_eq!(request.difficulty, 1);
        assert_eq!(request.count, 1);
        assert!(validate_generation(&request).is_ok());
    }

    #[test]
    fn zero_count_and_empty_keyword_are_both_reported() {
        let mut request = GenerationRequest::default();
        fill_defaults(&mut request);

        let err = validate_generation(&request).unwrap_err();
        assert_eq!(err.code(), -101);
        assert_eq!(codes(err), vec![-101, -104]);
    }

    #[test]
    fn out_of_range_enums_are_rejected() {
        let request = GenerationRequest {
            count: 1,
            language: "Go".to_string(),
            type_id: 4,
            difficulty: -1,
            keyword: "x".to_string(),
        };

        assert_eq!(
            codes(validate_generation(&request).unwrap_err()),
            vec![-102, -103, -105]
        );
    }

    #[test]
    fn new_question_requires_all_fields() {
        assert!(validate_new_question(&valid_question()).is_ok());

        let err = validate_new_question(&Question::default()).unwrap_err();
        assert_eq!(codes(err), vec![-111, -113, -114, -115]);
    }

    #[test]
    fn new_question_type_and_difficulty_must_be_known() {
        let question = Question {
            type_id: 9,
            difficulty: 42,
            ..valid_question()
        };

        assert_eq!(codes(validate_new_question(&question).unwrap_err()), vec![-113, -115]);
    }

    #[test]
    fn new_question_language_is_optional_but_closed() {
        let mut question = valid_question();
        question.language.clear();
        assert!(validate_new_question(&question).is_ok());

        question.language = "rust".to_string();
        assert_eq!(codes(validate_new_question(&question).unwrap_err()), vec![-112]);
    }

    #[test]
    fn update_requires_id_only() {
        let update = Question {
            id: 5,
            title: "New title".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_question_update(&update).unwrap(), 5);

        let missing = Question::default();
        assert!(matches!(
            validate_question_update(&missing),
            Err(AppError::MissingId)
        ));
    }

    #[test]
    fn update_checks_supplied_enums() {
        let update = Question {
            id: 5,
            type_id: 9,
            language: "cobol".to_string(),
            ..Default::default()
        };

        assert_eq!(
            codes(validate_question_update(&update).unwrap_err()),
            vec![-112, -113]
        );
    }
}
