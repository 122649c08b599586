// 数据库服务模块
// 提供 SQLite 题库存储，answers/right 以 JSON 文本落库，删除只做软删除

use rusqlite::{Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::AppError;
use crate::models::Question;
use crate::utils::ensure_parent_dir;

const SELECT_COLUMNS: &str = r#"SELECT id, title, answers, "right", type_id, difficulty, is_ai, language, keyword, active
             FROM questions"#;

/// 数据库中读出的原始行，answers/right 仍是 JSON 文本
struct StoredQuestion {
    question: Question,
    answers_json: String,
    right_json: String,
}

impl StoredQuestion {
    /// 严格解码：任一 JSON 字段损坏即报错
    fn decode(mut self) -> Result<Question, AppError> {
        let id = self.question.id;
        self.question.answers = decode_list(&self.answers_json)
            .map_err(|_| AppError::CorruptRecord { id, field: "answers" })?;
        self.question.right = decode_list(&self.right_json)
            .map_err(|_| AppError::CorruptRecord { id, field: "right" })?;
        Ok(self.question)
    }

    /// 宽松解码：损坏字段记警告后按空数组处理，列表接口使用
    fn decode_lenient(mut self) -> Question {
        let id = self.question.id;
        self.question.answers = decode_list_or_warn(id, "answers", &self.answers_json);
        self.question.right = decode_list_or_warn(id, "right", &self.right_json);
        self.question
    }
}

/// 旧数据里空切片可能存成 `null`，按空数组处理
fn decode_list(raw: &str) -> serde_json::Result<Vec<String>> {
    serde_json::from_str::<Option<Vec<String>>>(raw).map(Option::unwrap_or_default)
}

fn decode_list_or_warn(id: i64, field: &str, raw: &str) -> Vec<String> {
    decode_list(raw).unwrap_or_else(|e| {
            log::warn!("题目 {} 的 {} 反序列化失败: {}", id, field, e);
            Vec::new()
        })
}

fn encode_list(field: &str, values: &[String]) -> Result<String, AppError> {
    serde_json::to_string(values)
        .map_err(|e| AppError::Persistence(format!("序列化 {field} 失败: {e}")))
}

/// 题库存储
#[derive(Clone)]
pub struct QuestionStore {
    pool: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl QuestionStore {
    /// 打开（必要时创建）数据库文件并初始化表结构
    pub fn open(db_path: &Path) -> Result<Self, AppError> {
        ensure_parent_dir(db_path)
            .map_err(|e| AppError::Persistence(format!("创建数据目录失败: {e}")))?;

        let conn = Connection::open(db_path)?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::debug!("数据库 {} journal_mode={}", db_path.display(), journal_mode);

        let store = Self {
            pool: Arc::new(Mutex::new(conn)),
            db_path: Some(db_path.to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    /// 内存数据库，用于测试
    pub fn open_in_memory() -> Result<Self, AppError> {
        let store = Self {
            pool: Arc::new(Mutex::new(Connection::open_in_memory()?)),
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// 初始化数据库表结构
    pub fn initialize(&self) -> Result<(), AppError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                answers JSON NOT NULL,
                "right" JSON NOT NULL,
                type_id INTEGER NOT NULL,
                difficulty INTEGER NOT NULL,
                is_ai INTEGER NOT NULL,
                language TEXT NOT NULL,
                keyword TEXT,
                active INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_questions_active ON questions(active);
            "#,
        )?;

        Ok(())
    }

    // ==================== 题目 CRUD ====================

    /// 批量添加题目，单个事务内全部成功或全部回滚，返回新题目 ID
    pub fn insert_batch(&self, questions: &[Question]) -> Result<Vec<i64>, AppError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(questions.len());

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO questions
                 (title, answers, "right", type_id, difficulty, is_ai, language, keyword, active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            )?;

            for question in questions {
                let answers = encode_list("answers", &question.answers)?;
                let right = encode_list("right", &question.right)?;

                stmt.execute(rusqlite::params![
                    question.title,
                    answers,
                    right,
                    question.type_id,
                    question.difficulty,
                    question.is_generated,
                    question.language,
                    question.keyword,
                    question.active,
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        Ok(ids)
    }

    /// 列出所有未删除的题目
    pub fn list_active(&self) -> Result<Vec<Question>, AppError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE active = 1 ORDER BY id"))?;
        let rows = stmt.query_map([], Self::row_to_stored)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?.decode_lenient());
        }

        Ok(questions)
    }

    /// 获取未删除的单道题目，不存在或已删除返回 NotFound
    pub fn find_active(&self, id: i64) -> Result<Question, AppError> {
        let conn = self.lock()?;

        let stored = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1 AND active = 1"),
                rusqlite::params![id],
                Self::row_to_stored,
            )
            .optional()?;

        stored.ok_or(AppError::NotFound(id))?.decode()
    }

    /// 按 ID 整行更新一道未删除的题目
    pub fn update(&self, question: &Question) -> Result<(), AppError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let answers = encode_list("answers", &question.answers)?;
        let right = encode_list("right", &question.right)?;

        let changed = tx.execute(
            r#"UPDATE questions
             SET title = ?1, answers = ?2, "right" = ?3, type_id = ?4, difficulty = ?5,
                 is_ai = ?6, language = ?7, keyword = ?8, active = ?9
             WHERE id = ?10 AND active = 1"#,
            rusqlite::params![
                question.title,
                answers,
                right,
                question.type_id,
                question.difficulty,
                question.is_generated,
                question.language,
                question.keyword,
                question.active,
                question.id,
            ],
        )?;

        if changed == 0 {
            return Err(AppError::NotFound(question.id));
        }

        tx.commit()?;
        Ok(())
    }

    /// 软删除：只把 active 置 0，其余字段保持不变
    pub fn deactivate(&self, id: i64) -> Result<(), AppError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE questions SET active = 0 WHERE id = ?1 AND active = 1",
            rusqlite::params![id],
        )?;

        if changed == 0 {
            return Err(AppError::NotFound(id));
        }

        tx.commit()?;
        Ok(())
    }

    // ==================== 辅助方法 ====================

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.pool
            .lock()
            .map_err(|_| AppError::Persistence("数据库连接锁已损坏".to_string()))
    }

    /// 从数据库行转换为 StoredQuestion
    fn row_to_stored(row: &Row) -> Result<StoredQuestion, rusqlite::Error> {
        Ok(StoredQuestion {
            question: Question {
                id: row.get(0)?,
                title: row.get(1)?,
                answers: Vec::new(),
                right: Vec::new(),
                type_id: row.get(4)?,
                difficulty: row.get(5)?,
                is_generated: row.get(6)?,
                language: row.get(7)?,
                keyword: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
                active: row.get(9)?,
            },
            answers_json: row.get(2)?,
            right_json: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(title: &str) -> Question {
        Question {
            title: title.to_string(),
            answers: vec!["A.栈".to_string(), "B.堆".to_string()],
            right: vec!["A".to_string()],
            type_id: 1,
            difficulty: 2,
            is_generated: false,
            language: "go".to_string(),
            keyword: "内存".to_string(),
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn inserted_rows_round_trip_through_listing() {
        let store = QuestionStore::open_in_memory().unwrap();
        let ids = store
            .insert_batch(&[question("Q1"), question("Q2")])
            .unwrap();

        let listed = store.list_active().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], Question { id: ids[0], ..question("Q1") });
        assert_eq!(listed[1].id, ids[1]);
    }

    #[test]
    fn empty_lists_are_stored_as_json_arrays() {
        let store = QuestionStore::open_in_memory().unwrap();
        let coding = Question {
            answers: vec![],
            right: vec![],
            type_id: 3,
            ..question("实现LRU")
        };
        let id = store.insert_batch(&[coding]).unwrap()[0];

        let raw: String = store
            .lock()
            .unwrap()
            .query_row("SELECT answers FROM questions WHERE id = ?1", [id], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "[]");
        assert!(store.find_active(id).unwrap().answers.is_empty());
    }

    #[test]
    fn failed_row_rolls_back_whole_batch() {
        let store = QuestionStore::open_in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON questions
                 WHEN NEW.title = 'bad' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let err = store
            .insert_batch(&[question("good"), question("bad")])
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence(_)));
        assert!(store.list_active().unwrap().is_empty());
    }

    #[test]
    fn deactivated_rows_disappear_but_keep_content() {
        let store = QuestionStore::open_in_memory().unwrap();
        let ids = store.insert_batch(&[question("Q1"), question("Q2")]).unwrap();

        store.deactivate(ids[0]).unwrap();

        let listed = store.list_active().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ids[1]);
        assert!(matches!(store.find_active(ids[0]), Err(AppError::NotFound(_))));

        let (title, active, count): (String, bool, i64) = store
            .lock()
            .unwrap()
            .query_row(
                "SELECT title, active, (SELECT COUNT(*) FROM questions) FROM questions WHERE id = ?1",
                [ids[0]],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(title, "Q1");
        assert!(!active);
        assert_eq!(count, 2);
    }

    #[test]
    fn deactivating_twice_is_not_found() {
        let store = QuestionStore::open_in_memory().unwrap();
        let id = store.insert_batch(&[question("Q1")]).unwrap()[0];

        store.deactivate(id).unwrap();
        assert!(matches!(store.deactivate(id), Err(AppError::NotFound(i)) if i == id));
        assert!(matches!(store.deactivate(404), Err(AppError::NotFound(404))));
    }

    #[test]
    fn update_rewrites_active_row_only() {
        let store = QuestionStore::open_in_memory().unwrap();
        let id = store.insert_batch(&[question("Q1")]).unwrap()[0];

        let mut edited = store.find_active(id).unwrap();
        edited.title = "Q1'".to_string();
        edited.right = vec!["B".to_string()];
        store.update(&edited).unwrap();
        assert_eq!(store.find_active(id).unwrap(), edited);

        store.deactivate(id).unwrap();
        assert!(matches!(store.update(&edited), Err(AppError::NotFound(_))));
    }

    #[test]
    fn corrupt_json_fails_lookup_but_not_listing() {
        let store = QuestionStore::open_in_memory().unwrap();
        let id = store.insert_batch(&[question("Q1")]).unwrap()[0];
        store
            .lock()
            .unwrap()
            .execute("UPDATE questions SET answers = 'oops' WHERE id = ?1", [id])
            .unwrap();

        assert!(matches!(
            store.find_active(id),
            Err(AppError::CorruptRecord { field: "answers", .. })
        ));

        let listed = store.list_active().unwrap();
        assert!(listed[0].answers.is_empty());
        assert_eq!(listed[0].right, vec!["A"]);
    }

    #[test]
    fn stored_null_lists_decode_as_empty() {
        let store = QuestionStore::open_in_memory().unwrap();
        let id = store.insert_batch(&[question("用GO实现快速排序")]).unwrap()[0];
        store
            .lock()
            .unwrap()
            .execute(
                r#"UPDATE questions SET answers = 'null', "right" = 'null' WHERE id = ?1"#,
                [id],
            )
            .unwrap();

        let found = store.find_active(id).unwrap();
        assert!(found.answers.is_empty());
        assert!(found.right.is_empty());

        let mut edited = found;
        edited.title = "用GO实现归并排序".to_string();
        store.update(&edited).unwrap();
        assert_eq!(store.list_active().unwrap()[0].title, "用GO实现归并排序");
    }

    #[test]
    fn file_database_is_created_under_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("questions.db");

        let store = QuestionStore::open(&path).unwrap();
        store.insert_batch(&[question("Q1")]).unwrap();
        assert_eq!(store.db_path(), Some(path.as_path()));
        drop(store);

        let reopened = QuestionStore::open(&path).unwrap();
        assert_eq!(reopened.list_active().unwrap().len(), 1);
    }
}
