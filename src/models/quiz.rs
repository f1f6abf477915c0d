//! 测验数据模型
//!
//! 测验（Quiz）拥有一组有序的题目（Question），通过 5 位大写字母/数字
//! 组成的访问码对学生公开。题目在写入时必须通过校验，
//! 评分阶段遇到的脏数据按"答错"降级处理，不在这里兜底。

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 访问码长度
pub const ACCESS_CODE_LEN: usize = 5;

/// 访问码字符集（大写字母 + 数字）
const ACCESS_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 单个选择题
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 题干
    pub text: String,
    /// 选项列表（答案以文本形式提交，不是索引）
    pub options: Vec<String>,
    /// 正确选项在 `options` 中的索引（从 0 开始）
    pub correct_index: usize,
}

impl Question {
    /// 写入时校验：选项列表非空，且 `correct_index` 在范围内
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.options.is_empty() {
            return Err(ValidationError::EmptyOptions {
                question: self.text.clone(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(ValidationError::CorrectIndexOutOfRange {
                question: self.text.clone(),
                index: self.correct_index,
                option_count: self.options.len(),
            });
        }
        Ok(())
    }

    /// 获取正确选项的文本
    ///
    /// 评分阶段使用：索引越界时返回 None，由调用方降级处理
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// 测验
#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
    pub id: u64,
    pub title: String,
    /// 班级名称（可选）
    pub class_name: Option<String>,
    /// 5 位大写字母/数字访问码，全局唯一
    pub access_code: String,
    pub created_at: DateTime<Utc>,
    /// 有序题目列表，随测验级联删除
    pub questions: Vec<Question>,
}

/// 创建测验的输入数据
///
/// 与 TOML 测验定义文件的结构一致，见 `models/loaders`
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuiz {
    pub title: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// 生成一个随机访问码（不做唯一性检查，由存储层循环查重）
pub fn random_access_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ACCESS_CODE_CHARSET.len());
            ACCESS_CODE_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: Vec<&str>, correct_index: usize) -> Question {
        Question {
            text: "法国的首都是哪里？".to_string(),
            options: options.into_iter().map(String::from).collect(),
            correct_index,
        }
    }

    #[test]
    fn test_validate_accepts_in_range_index() {
        assert!(question(vec!["Paris", "London"], 0).validate().is_ok());
        assert!(question(vec!["Paris", "London"], 1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let err = question(vec!["Paris", "London"], 2).validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::CorrectIndexOutOfRange { index: 2, option_count: 2, .. }
        ));
    }

    #[test]
    fn test_validate_rejects_empty_options() {
        let err = question(vec![], 0).validate().unwrap_err();
        assert!(matches!(err, ValidationError::EmptyOptions { .. }));
    }

    #[test]
    fn test_random_access_code_shape() {
        for _ in 0..100 {
            let code = random_access_code();
            assert_eq!(code.len(), ACCESS_CODE_LEN);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }
}
