//! 出题提示词工程

use crate::models::{Difficulty, GenerationRequest, QuestionType};

const CODING_EXAMPLE: &str = r#"[{"title":"请用GO实现冒泡排序，代码编程实现"}]"#;

const CHOICE_EXAMPLE: &str = r#"[{"title":"Gin框架的作用是什么","answers":["A.Gin是一个用于前端开发的JavaScript框架，类似React或Vue","B.Gin是Go语言的高性能HTTP Web框架，支持路由分组、中间件等功能","C.Gin主要用于数据库操作，是ORM工具的一种","D.Gin是Python的异步Web框架，类似Django或Flask"],"right":["B"]}]"#;

/// 出题提示词
pub struct GenerationPrompt;

impl GenerationPrompt {
    /// 根据出题请求渲染提示词，相同输入总是得到相同输出
    ///
    /// 请求应已经过默认值填充和校验；越界的类型/难度会渲染成空标签。
    pub fn render(request: &GenerationRequest) -> String {
        let difficulty = Difficulty::from_id(request.difficulty)
            .map(Difficulty::label)
            .unwrap_or_default();
        let question_type = request.question_type();
        let type_label = question_type.map(QuestionType::label).unwrap_or_default();

        let (fields, example) = match question_type {
            Some(QuestionType::Coding) => ("title(题干)", CODING_EXAMPLE),
            _ => (
                "title(题干),answers(选项数组),right(正确答案数组)",
                CHOICE_EXAMPLE,
            ),
        };

        format!(
            "请生成 {} 道难度为 {} 的 {} 语言的关于 {} 知识点的 {} ，并以JSON数组格式输出，每个题目包含以下字段：{}。示例格式：{}。只输出JSON数组，不需要其他内容。",
            request.count,
            difficulty,
            request.language,
            request.keyword,
            type_label,
            fields,
            example
        )
    }
}
