//! 学习指南解析器 - 业务能力层
//!
//! 从 LLM 的自由文本响应中提取结构化的练习题记录。
//!
//! 这是一个尽力而为的文法提取器：在全文范围内做模式搜索
//! （不是逐行严格解析），标签大小写不敏感；文法不匹配时产出
//! 零条记录并给出失败标志，绝不报错：格式偏离是软失败，
//! 由流水线继续渲染空的练习题部分。不做部分记录恢复。

use anyhow::Result;
use regex::Regex;
use tracing::{info, warn};

use crate::models::guide::{ParsedGuide, PracticeQuestion, MAX_PRACTICE_QUESTIONS};

/// 一条完整练习题记录的文法：
/// 主题行、题干行、A)-D) 四个选项行、正确答案行，各行必须连续
const RECORD_PATTERN: &str = r"(?mi)^[ \t]*Fundamental Topic:[ \t]*(.+?)[ \t]*\r?\n[ \t]*Practice Question:[ \t]*(.+?)[ \t]*\r?\n[ \t]*A\)[ \t]*(.+?)[ \t]*\r?\n[ \t]*B\)[ \t]*(.+?)[ \t]*\r?\n[ \t]*C\)[ \t]*(.+?)[ \t]*\r?\n[ \t]*D\)[ \t]*(.+?)[ \t]*\r?\n[ \t]*Correct Answer:[ \t]*([A-D])";

/// 学习指南解析器
pub struct GuideParser {
    record_re: Regex,
}

impl GuideParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            record_re: Regex::new(RECORD_PATTERN)?,
        })
    }

    /// 从响应全文中提取最多 5 条练习题记录
    pub fn parse(&self, text: &str) -> ParsedGuide {
        let mut records = Vec::new();

        for caps in self
            .record_re
            .captures_iter(text)
            .take(MAX_PRACTICE_QUESTIONS)
        {
            // 第 7 组由文法保证恰好一个字母
            let correct_letter = caps[7]
                .chars()
                .next()
                .unwrap_or('A')
                .to_ascii_uppercase();

            records.push(PracticeQuestion {
                topic: caps[1].to_string(),
                question: caps[2].to_string(),
                options: [
                    caps[3].to_string(),
                    caps[4].to_string(),
                    caps[5].to_string(),
                    caps[6].to_string(),
                ],
                correct_letter,
            });
        }

        let matched = !records.is_empty();
        if matched {
            info!("✓ 从 LLM 响应中提取到 {} 道练习题", records.len());
        } else {
            warn!("⚠️ LLM 响应不符合练习题文法，本次指南的练习题部分为空");
        }

        ParsedGuide { records, matched }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> String {
        format!(
            "Fundamental Topic: Topic {n}\n\
             Practice Question: Question {n}?\n\
             A) first\n\
             B) second\n\
             C) third\n\
             D) fourth\n\
             Correct Answer: B\n",
        )
    }

    #[test]
    fn test_parse_five_well_formed_records() {
        let parser = GuideParser::new().unwrap();
        let text = (1..=5).map(record).collect::<Vec<_>>().join("\n");

        let parsed = parser.parse(&text);
        assert!(parsed.matched);
        assert_eq!(parsed.records.len(), 5);
        for record in &parsed.records {
            assert_eq!(record.options.len(), 4);
            assert!(('A'..='D').contains(&record.correct_letter));
        }
        assert_eq!(parsed.records[0].topic, "Topic 1");
        assert_eq!(parsed.records[4].question, "Question 5?");
    }

    #[test]
    fn test_parse_caps_at_five_records() {
        let parser = GuideParser::new().unwrap();
        let text = (1..=7).map(record).collect::<Vec<_>>().join("\n");

        let parsed = parser.parse(&text);
        assert_eq!(parsed.records.len(), 5);
    }

    #[test]
    fn test_parse_malformed_input_yields_zero_records() {
        let parser = GuideParser::new().unwrap();
        let text = "Here is a study guide about capitals.\n\
                    Remember: Paris is the capital of France.\n\
                    1. What is the capital of Spain? (a) Madrid (b) Rome";

        let parsed = parser.parse(text);
        assert!(!parsed.matched);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_parse_labels_are_case_insensitive() {
        let parser = GuideParser::new().unwrap();
        let text = "fundamental topic: Geography\n\
                    practice question: Capital of Japan?\n\
                    a) Seoul\n\
                    b) Tokyo\n\
                    c) Beijing\n\
                    d) Bangkok\n\
                    correct answer: b\n";

        let parsed = parser.parse(text);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].correct_letter, 'B');
        assert_eq!(parsed.records[0].options[1], "Tokyo");
    }

    #[test]
    fn test_parse_record_embedded_in_surrounding_prose() {
        let parser = GuideParser::new().unwrap();
        let text = format!(
            "Let's review the key ideas first. Paris is in France.\n\n{}\nKeep practicing!",
            record(1)
        );

        let parsed = parser.parse(&text);
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        let parser = GuideParser::new().unwrap();
        let text = record(1).replace('\n', "\r\n");

        let parsed = parser.parse(&text);
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_parse_rejects_incomplete_record() {
        let parser = GuideParser::new().unwrap();
        // 缺少 D) 选项行，不做部分记录恢复
        let text = "Fundamental Topic: Geography\n\
                    Practice Question: Capital of Japan?\n\
                    A) Seoul\n\
                    B) Tokyo\n\
                    C) Beijing\n\
                    Correct Answer: B\n";

        let parsed = parser.parse(text);
        assert!(parsed.records.is_empty());
    }
}
