//! 评分服务 - 业务能力层
//!
//! 对提供的数据做纯函数评分，不触碰存储，不产生副作用。
//!
//! 规则：
//! - 按题目位置（"0"、"1"...）查找提交的答案文本，缺失视为未作答
//! - 答案与正确选项文本严格相等才计分（不做任何归一化）
//! - `correct_index` 越界属于脏数据：该题按答错处理，记一条
//!   数据完整性警告日志，绝不 panic

use tracing::warn;

use crate::models::quiz::Question;
use crate::models::submission::AnswerMap;

/// 评分结果：得分 + 答错的题目集合
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    /// 答对题目数
    pub score: u32,
    /// 答错（含未作答）的题目，保持原始顺序
    pub wrong_questions: Vec<WrongQuestion>,
}

/// 一道答错的题目
#[derive(Debug, Clone)]
pub struct WrongQuestion {
    /// 题目在测验中的位置（从 0 开始）
    pub position: usize,
    /// 题干快照，供学习指南提示词使用
    pub text: String,
}

/// 对一次提交评分
pub fn score_submission(answers: &AnswerMap, questions: &[Question]) -> ScoreOutcome {
    let mut score = 0;
    let mut wrong_questions = Vec::new();

    for (position, question) in questions.iter().enumerate() {
        let submitted = answers.get(&position.to_string()).map(String::as_str);

        match question.correct_option() {
            None => {
                // 脏数据：correct_index 已越界，降级为答错
                warn!(
                    "⚠️ 数据完整性警告: 题目 '{}' 的 correct_index {} 越界（共 {} 个选项），按答错处理",
                    question.text,
                    question.correct_index,
                    question.options.len()
                );
                wrong_questions.push(WrongQuestion {
                    position,
                    text: question.text.clone(),
                });
            }
            Some(correct) => {
                if submitted == Some(correct) {
                    score += 1;
                } else {
                    wrong_questions.push(WrongQuestion {
                        position,
                        text: question.text.clone(),
                    });
                }
            }
        }
    }

    ScoreOutcome {
        score,
        wrong_questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question {
                text: "What is the capital of France?".to_string(),
                options: vec!["Paris".into(), "London".into()],
                correct_index: 0,
            },
            Question {
                text: "What is 2 + 2?".to_string(),
                options: vec!["3".into(), "4".into()],
                correct_index: 1,
            },
        ]
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_correct_yields_full_score() {
        let outcome = score_submission(&answers(&[("0", "Paris"), ("1", "4")]), &questions());
        assert_eq!(outcome.score, 2);
        assert!(outcome.wrong_questions.is_empty());
    }

    #[test]
    fn test_wrong_and_unanswered_are_collected() {
        // 第 0 题答错，第 1 题未作答
        let outcome = score_submission(&answers(&[("0", "London")]), &questions());
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.wrong_questions.len(), 2);
        assert_eq!(outcome.wrong_questions[0].position, 0);
        assert_eq!(outcome.wrong_questions[1].position, 1);
    }

    #[test]
    fn test_exact_string_match_no_normalization() {
        // 大小写不同不计分
        let outcome = score_submission(&answers(&[("0", "paris"), ("1", "4")]), &questions());
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.wrong_questions.len(), 1);
    }

    #[test]
    fn test_out_of_range_correct_index_counts_as_wrong() {
        let mut qs = questions();
        qs[0].correct_index = 99;

        // 不应 panic，该题按答错处理
        let outcome = score_submission(&answers(&[("0", "Paris"), ("1", "4")]), &qs);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.wrong_questions.len(), 1);
        assert_eq!(outcome.wrong_questions[0].position, 0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let map = answers(&[("0", "Paris"), ("1", "3")]);
        let qs = questions();
        let first = score_submission(&map, &qs);
        let second = score_submission(&map, &qs);
        assert_eq!(first.score, second.score);
        assert_eq!(first.wrong_questions.len(), second.wrong_questions.len());
    }
}
