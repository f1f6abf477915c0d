//! 学习指南数据模型
//!
//! LLM 返回的自由文本经 `services::guide_parser` 提取后得到的结构化记录

use serde::Serialize;

/// 每份学习指南最多包含的练习题数量
pub const MAX_PRACTICE_QUESTIONS: usize = 5;

/// 一道练习题
///
/// 对应 LLM 响应中的一段固定文法：
///
/// ```text
/// Fundamental Topic: <概念>
/// Practice Question: <题干>
/// A) <选项>
/// B) <选项>
/// C) <选项>
/// D) <选项>
/// Correct Answer: <A|B|C|D>
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct PracticeQuestion {
    /// 考查的核心概念
    pub topic: String,
    /// 题干
    pub question: String,
    /// 四个字母选项（A-D 顺序）
    pub options: [String; 4],
    /// 正确答案字母，取值 'A'..='D'
    pub correct_letter: char,
}

/// 解析结果：零或多条记录 + 成功/失败标志
///
/// LLM 偏离格式属于软失败：`records` 为空、`matched` 为 false，
/// 流水线继续渲染一份练习题部分为空的指南，而不是中断。
#[derive(Debug, Clone, Default)]
pub struct ParsedGuide {
    pub records: Vec<PracticeQuestion>,
    /// 文法是否至少匹配到一条完整记录
    pub matched: bool,
}
