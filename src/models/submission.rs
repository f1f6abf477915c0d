//! 提交记录数据模型

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 学生答案映射：题目位置（字符串化的整数，从 0 开始）→ 提交的答案文本
///
/// 例如 `{"0": "Paris", "1": "4"}`。注意存的是选项文本，不是索引。
pub type AnswerMap = HashMap<String, String>;

/// 一次测验提交
///
/// 创建后不可变，展示时按最新提交在前排序
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: u64,
    /// 所属测验 ID
    pub quiz_id: u64,
    pub student_name: String,
    pub student_email: String,
    pub answers: AnswerMap,
    /// 答对题目数
    pub score: u32,
    pub submitted_at: DateTime<Utc>,
}
