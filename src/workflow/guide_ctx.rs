//! 学习指南处理上下文
//!
//! 封装"我正在为哪条提交生成指南"这一信息

use std::fmt::Display;

/// 学习指南处理上下文
///
/// 在延迟流水线内部传递，主要用于日志显示
#[derive(Debug, Clone)]
pub struct GuideCtx {
    /// 提交记录 ID
    pub submission_id: u64,

    /// 测验标题
    pub quiz_title: String,

    /// 学生姓名
    pub student_name: String,
}

impl GuideCtx {
    /// 创建新的处理上下文
    pub fn new(submission_id: u64, quiz_title: String, student_name: String) -> Self {
        Self {
            submission_id,
            quiz_title,
            student_name,
        }
    }
}

impl Display for GuideCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[提交 ID#{} 测验'{}' 学生 {}]",
            self.submission_id, self.quiz_title, self.student_name
        )
    }
}
