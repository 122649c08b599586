use serde::{Deserialize, Deserializer, Serialize};

/// 支持的编程语言（大小写敏感）
pub const LANGUAGES: [&str; 5] = ["go", "javascript", "java", "python", "c++"];

pub const DEFAULT_LANGUAGE: &str = "go";

/// 题型名称，下标即 type_id，0 号位占位不用
pub const QUESTION_TYPE_LABELS: [&str; 4] = ["", "单选题", "多选题", "编程题"];

/// 难度名称，下标即 difficulty，0 号位占位不用
pub const DIFFICULTY_LABELS: [&str; 4] = ["", "简单", "中等", "困难"];

/// 题目类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    SingleChoice = 1,
    MultipleChoice = 2,
    Coding = 3,
}

impl QuestionType {
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::SingleChoice),
            2 => Some(Self::MultipleChoice),
            3 => Some(Self::Coding),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        QUESTION_TYPE_LABELS[self as usize]
    }

    /// 编程题没有选项和标准答案
    pub fn has_options(self) -> bool {
        self != Self::Coding
    }
}

/// 难度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        DIFFICULTY_LABELS[self as usize]
    }
}

pub fn is_supported_language(language: &str) -> bool {
    LANGUAGES.contains(&language)
}

/// 题目（持久化实体）
///
/// 所有字段在入参中都可省略，缺省或 `null` 一律视为零值，
/// 编辑接口依赖这一点区分"未提供"。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub answers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub right: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub type_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub difficulty: i64,
    #[serde(rename = "is_ai", with = "int_flag")]
    pub is_generated: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(with = "int_flag")]
    pub active: bool,
}

impl Question {
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// AI 出题请求体（不落库）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    #[serde(rename = "number", alias = "count", deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(
        rename = "type",
        alias = "type_id",
        alias = "typeId",
        deserialize_with = "null_as_default"
    )]
    pub type_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub difficulty: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub keyword: String,
}

impl GenerationRequest {
    pub fn question_type(&self) -> Option<QuestionType> {
        QuestionType::from_id(self.type_id)
    }
}

/// 添加接口既接受单个题目也接受题目数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionBatch {
    Many(Vec<Question>),
    One(Question),
}

impl QuestionBatch {
    pub fn into_vec(self) -> Vec<Question> {
        match self {
            Self::Many(questions) => questions,
            Self::One(question) => vec![question],
        }
    }
}

/// 统一响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            msg: msg.into(),
            data: Some(data),
        }
    }

    pub fn failure(code: i32, msg: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data,
        }
    }
}

impl ApiResponse<()> {
    pub fn done(msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            msg: msg.into(),
            data: None,
        }
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 0/1 整数形式的布尔标记，入参也接受 true/false
mod int_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<Flag>::deserialize(deserializer)? {
            Some(Flag::Int(value)) => value != 0,
            Some(Flag::Bool(value)) => value,
            None => false,
        })
    }
}
