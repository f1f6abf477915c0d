//! 内存测验存储
//!
//! 数据层在本仓库范围之外（由 Web 端的存储设施持有），这里提供一个
//! 满足同样数据契约的内存实现：按访问码管理测验、级联删除、
//! 追加只读的提交记录，供服务层和延迟流水线使用。
//!
//! 并发模型：单把 `RwLock`。提交之间互不共享可变状态，
//! 唯一的共享写入是追加提交记录，锁竞争可以忽略。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::quiz::{random_access_code, NewQuiz, Quiz};
use crate::models::submission::{AnswerMap, Submission};

/// 测验存储
pub struct QuizStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    /// key 为大写访问码
    quizzes: HashMap<String, Quiz>,
    submissions: HashMap<u64, Submission>,
    next_quiz_id: u64,
    next_submission_id: u64,
}

/// 仪表盘中单个测验的汇总
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub title: String,
    pub access_code: String,
    pub class_name: Option<String>,
    pub question_count: usize,
    /// 按最新提交在前排序
    pub submissions: Vec<SubmissionRow>,
}

/// 仪表盘中单条提交记录
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRow {
    pub student_name: String,
    pub score: u32,
    pub submitted_at: DateTime<Utc>,
}

impl QuizStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// 创建测验
    ///
    /// 所有题目先通过写入校验，然后生成全局唯一的访问码。
    /// 返回创建后的完整测验（含访问码）。
    pub async fn create_quiz(&self, new_quiz: NewQuiz) -> AppResult<Quiz> {
        for question in &new_quiz.questions {
            question.validate().map_err(AppError::Validation)?;
        }

        let mut inner = self.inner.write().await;

        // 与已有访问码查重，撞码则重新生成
        let access_code = loop {
            let code = random_access_code();
            if !inner.quizzes.contains_key(&code) {
                break code;
            }
        };

        inner.next_quiz_id += 1;
        let quiz = Quiz {
            id: inner.next_quiz_id,
            title: new_quiz.title,
            class_name: new_quiz.class_name,
            access_code: access_code.clone(),
            created_at: Utc::now(),
            questions: new_quiz.questions,
        };
        inner.quizzes.insert(access_code.clone(), quiz.clone());

        info!("✓ 测验 '{}' 已创建，访问码: {}", quiz.title, access_code);
        Ok(quiz)
    }

    /// 按访问码查询测验（大小写不敏感）
    pub async fn fetch_quiz(&self, access_code: &str) -> AppResult<Quiz> {
        let key = access_code.to_uppercase();
        let inner = self.inner.read().await;
        inner
            .quizzes
            .get(&key)
            .cloned()
            .ok_or_else(|| AppError::quiz_not_found(access_code))
    }

    /// 按 ID 查询测验（延迟流水线重新读取快照时使用）
    pub async fn quiz_by_id(&self, quiz_id: u64) -> Option<Quiz> {
        let inner = self.inner.read().await;
        inner.quizzes.values().find(|q| q.id == quiz_id).cloned()
    }

    /// 按访问码删除测验，级联删除其题目与提交记录
    pub async fn delete_quiz(&self, access_code: &str) -> AppResult<()> {
        let key = access_code.to_uppercase();
        let mut inner = self.inner.write().await;
        let quiz = inner
            .quizzes
            .remove(&key)
            .ok_or_else(|| AppError::quiz_not_found(access_code))?;

        inner.submissions.retain(|_, s| s.quiz_id != quiz.id);
        info!("🗑 测验 '{}' ({}) 已删除", quiz.title, key);
        Ok(())
    }

    /// 追加一条提交记录（创建后不可变）
    pub async fn insert_submission(
        &self,
        quiz_id: u64,
        student_name: String,
        student_email: String,
        answers: AnswerMap,
        score: u32,
    ) -> Submission {
        let mut inner = self.inner.write().await;
        inner.next_submission_id += 1;
        let submission = Submission {
            id: inner.next_submission_id,
            quiz_id,
            student_name,
            student_email,
            answers,
            score,
            submitted_at: Utc::now(),
        };
        inner.submissions.insert(submission.id, submission.clone());
        submission
    }

    /// 按 ID 重新读取提交记录（worker 执行时的新鲜快照）
    pub async fn submission(&self, submission_id: u64) -> Option<Submission> {
        let inner = self.inner.read().await;
        inner.submissions.get(&submission_id).cloned()
    }

    /// 某个测验的全部提交记录，最新在前
    pub async fn submissions_for_quiz(&self, quiz_id: u64) -> Vec<Submission> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Submission> = inner
            .submissions
            .values()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows
    }

    /// 仪表盘汇总：每个测验的题目数与每条提交的得分
    pub async fn dashboard(&self) -> Vec<QuizSummary> {
        let inner = self.inner.read().await;
        let mut quizzes: Vec<&Quiz> = inner.quizzes.values().collect();
        quizzes.sort_by(|a, b| a.id.cmp(&b.id));

        quizzes
            .into_iter()
            .map(|quiz| {
                let mut submissions: Vec<&Submission> = inner
                    .submissions
                    .values()
                    .filter(|s| s.quiz_id == quiz.id)
                    .collect();
                submissions.sort_by(|a, b| b.id.cmp(&a.id));

                QuizSummary {
                    title: quiz.title.clone(),
                    access_code: quiz.access_code.clone(),
                    class_name: quiz.class_name.clone(),
                    question_count: quiz.questions.len(),
                    submissions: submissions
                        .into_iter()
                        .map(|s| SubmissionRow {
                            student_name: s.student_name.clone(),
                            score: s.score,
                            submitted_at: s.submitted_at,
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

impl Default for QuizStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LookupError, ValidationError};
    use crate::models::quiz::Question;

    fn sample_quiz() -> NewQuiz {
        NewQuiz {
            title: "World Capitals".to_string(),
            class_name: Some("Geography 101".to_string()),
            questions: vec![
                Question {
                    text: "What is the capital of France?".to_string(),
                    options: vec!["Paris".into(), "London".into()],
                    correct_index: 0,
                },
                Question {
                    text: "What is the capital of Japan?".to_string(),
                    options: vec!["Seoul".into(), "Tokyo".into()],
                    correct_index: 1,
                },
            ],
        }
    }

    #[test]
    fn test_create_and_fetch_round_trip() {
        tokio_test::block_on(async {
            let store = QuizStore::new();
            let quiz = store.create_quiz(sample_quiz()).await.unwrap();
            assert_eq!(quiz.access_code.len(), 5);

            let fetched = store.fetch_quiz(&quiz.access_code).await.unwrap();
            assert_eq!(fetched.questions.len(), 2);
            // 题目保持原始输入顺序
            assert_eq!(fetched.questions[0].text, "What is the capital of France?");
            assert_eq!(fetched.questions[1].text, "What is the capital of Japan?");
        });
    }

    #[test]
    fn test_fetch_is_case_insensitive() {
        tokio_test::block_on(async {
            let store = QuizStore::new();
            let quiz = store.create_quiz(sample_quiz()).await.unwrap();

            let lower = quiz.access_code.to_lowercase();
            let fetched = store.fetch_quiz(&lower).await.unwrap();
            assert_eq!(fetched.id, quiz.id);
        });
    }

    #[test]
    fn test_create_rejects_invalid_question() {
        tokio_test::block_on(async {
            let store = QuizStore::new();
            let mut bad = sample_quiz();
            bad.questions[0].correct_index = 9;

            let err = store.create_quiz(bad).await.unwrap_err();
            assert!(matches!(
                err,
                AppError::Validation(ValidationError::CorrectIndexOutOfRange { .. })
            ));
        });
    }

    #[test]
    fn test_delete_cascades_submissions() {
        tokio_test::block_on(async {
            let store = QuizStore::new();
            let quiz = store.create_quiz(sample_quiz()).await.unwrap();
            let submission = store
                .insert_submission(
                    quiz.id,
                    "Ada".to_string(),
                    "ada@example.com".to_string(),
                    AnswerMap::new(),
                    0,
                )
                .await;

            store.delete_quiz(&quiz.access_code).await.unwrap();

            assert!(store.submission(submission.id).await.is_none());
            let err = store.fetch_quiz(&quiz.access_code).await.unwrap_err();
            assert!(matches!(
                err,
                AppError::Lookup(LookupError::QuizNotFound { .. })
            ));
        });
    }

    #[test]
    fn test_dashboard_orders_submissions_newest_first() {
        tokio_test::block_on(async {
            let store = QuizStore::new();
            let quiz = store.create_quiz(sample_quiz()).await.unwrap();
            for (name, score) in [("Ada", 1), ("Grace", 2)] {
                store
                    .insert_submission(
                        quiz.id,
                        name.to_string(),
                        format!("{}@example.com", name.to_lowercase()),
                        AnswerMap::new(),
                        score,
                    )
                    .await;
            }

            let dashboard = store.dashboard().await;
            assert_eq!(dashboard.len(), 1);
            assert_eq!(dashboard[0].question_count, 2);
            assert_eq!(dashboard[0].submissions[0].student_name, "Grace");
            assert_eq!(dashboard[0].submissions[1].student_name, "Ada");
        });
    }
}
