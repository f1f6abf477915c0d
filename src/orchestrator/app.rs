//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，对外提供测验访问接口，对内负责装配。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：装配存储、LLM 客户端、邮件服务、指南流程与调度器
//! 2. **访问接口**：创建/查询/提交/删除测验，仪表盘汇总
//! 3. **提交路径**：同步评分 + 落库 + 入队，立刻返回确认消息
//! 4. **批量加载**：从 TOML 目录批量注册测验（命令行入口使用）
//!
//! ## 设计特点
//!
//! - **显式装配**：LLM 客户端与邮件传输都是显式对象，由这里创建
//!   后注入流水线，不存在模块级单例
//! - **请求路径零阻塞**：提交接口绝不等待 LLM / PDF / 邮件
//! - **向下委托**：评分委托 services，延迟工作委托 scheduler

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::loaders;
use crate::models::quiz::{NewQuiz, Quiz};
use crate::models::submission::AnswerMap;
use crate::services::{score_submission, GuideModel, GuideNotifier, LlmService, MailService};
use crate::store::{QuizStore, QuizSummary};
use crate::workflow::GuideFlow;

use super::scheduler::GuideScheduler;

/// 提交确认
///
/// 在延迟流水线开始之前就返回给学生，之后的失败不会再影响它
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAck {
    pub submission_id: u64,
    /// 答对题目数
    pub score: u32,
    /// 测验题目总数
    pub total_questions: usize,
    /// 是否有学习指南在路上
    pub guide_pending: bool,
    /// 面向学生的确认文案
    pub message: String,
}

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<QuizStore>,
    scheduler: GuideScheduler,
}

impl App {
    /// 初始化应用（生产装配）
    pub async fn initialize(config: Config) -> Result<Self> {
        let model: Arc<dyn GuideModel> = Arc::new(LlmService::new(&config));
        let notifier: Arc<dyn GuideNotifier> = Arc::new(MailService::new(&config)?);
        Self::with_pipeline(config, model, notifier)
    }

    /// 用指定的模型与通知实现装配应用
    ///
    /// 测试中注入固定响应的假模型与只记录调用的假通知
    pub fn with_pipeline(
        config: Config,
        model: Arc<dyn GuideModel>,
        notifier: Arc<dyn GuideNotifier>,
    ) -> Result<Self> {
        let store = Arc::new(QuizStore::new());
        let flow = Arc::new(GuideFlow::new(&config, model, notifier)?);
        let scheduler = GuideScheduler::start(
            Arc::clone(&store),
            flow,
            Duration::from_secs(config.guide_delay_secs),
        );

        Ok(Self {
            config,
            store,
            scheduler,
        })
    }

    // ========== 访问接口 ==========

    /// 创建测验，返回访问码
    ///
    /// 所有题目在写入时校验，违规数据被拒绝
    pub async fn create_quiz(&self, new_quiz: NewQuiz) -> AppResult<String> {
        let quiz = self.store.create_quiz(new_quiz).await?;
        Ok(quiz.access_code)
    }

    /// 按访问码查询测验（大小写不敏感），返回测验及其有序题目
    pub async fn fetch_quiz(&self, access_code: &str) -> AppResult<Quiz> {
        self.store.fetch_quiz(access_code).await
    }

    /// 处理一次学生提交
    ///
    /// 同步部分：评分、落库、（必要时）入队延迟指南任务，然后立刻
    /// 返回确认。延迟流水线的任何后续失败都不会改变这里的返回值。
    pub async fn submit_answers(
        &self,
        access_code: &str,
        student_name: &str,
        student_email: &str,
        answers: AnswerMap,
    ) -> AppResult<SubmissionAck> {
        let quiz = self.store.fetch_quiz(access_code).await?;

        let outcome = score_submission(&answers, &quiz.questions);
        let submission = self
            .store
            .insert_submission(
                quiz.id,
                student_name.to_string(),
                student_email.to_string(),
                answers,
                outcome.score,
            )
            .await;

        info!(
            "[提交 {}] 学生 {} 在测验 '{}' 得分 {}/{}",
            submission.id,
            submission.student_name,
            quiz.title,
            outcome.score,
            quiz.questions.len()
        );

        let guide_pending = !outcome.wrong_questions.is_empty();
        if guide_pending {
            self.scheduler.enqueue(submission.id);
            info!(
                "[提交 {}] 📤 已入队学习指南任务（{} 道错题）",
                submission.id,
                outcome.wrong_questions.len()
            );
        }

        let message = if guide_pending {
            format!(
                "Submission received! Your personalized study guide for '{}' is being \
                 prepared and will be emailed to you shortly.",
                quiz.title
            )
        } else {
            "Submission received! You answered every question correctly - no study guide needed."
                .to_string()
        };

        Ok(SubmissionAck {
            submission_id: submission.id,
            score: outcome.score,
            total_questions: quiz.questions.len(),
            guide_pending,
            message,
        })
    }

    /// 按访问码删除测验，级联删除题目与提交记录
    pub async fn delete_quiz(&self, access_code: &str) -> AppResult<()> {
        self.store.delete_quiz(access_code).await
    }

    /// 仪表盘汇总：每个测验的题目数与每条提交的得分
    pub async fn dashboard_summary(&self) -> Vec<QuizSummary> {
        self.store.dashboard().await
    }

    /// 尚未执行完的指南任务数
    pub fn pending_guides(&self) -> usize {
        self.scheduler.pending()
    }

    // ========== 命令行入口 ==========

    /// 运行应用主逻辑：从 TOML 目录批量注册测验，打印仪表盘
    pub async fn run(&self) -> Result<()> {
        log_startup(&self.config);

        let quizzes = loaders::load_all_toml_files(&self.config.toml_folder).await?;
        if quizzes.is_empty() {
            warn!("⚠️ 没有找到待注册的测验 TOML 文件，程序结束");
            return Ok(());
        }

        let total = quizzes.len();
        let mut created = 0;
        for new_quiz in quizzes {
            let title = new_quiz.title.clone();
            match self.create_quiz(new_quiz).await {
                Ok(access_code) => {
                    info!("📄 '{}' → 访问码 {}", title, access_code);
                    created += 1;
                }
                Err(e) => {
                    warn!("⚠️ 测验 '{}' 注册失败: {}", title, e);
                }
            }
        }

        print_dashboard(&self.dashboard_summary().await);
        info!("✅ 注册完成: 成功 {}/{}", created, total);
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测验注册模式");
    info!("📁 TOML 目录: {}", config.toml_folder);
    info!("{}", "=".repeat(60));
}

fn print_dashboard(summaries: &[QuizSummary]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 仪表盘汇总");
    info!("{}", "=".repeat(60));
    for summary in summaries {
        info!(
            "📋 {} [{}] - {} 道题, {} 条提交",
            summary.title,
            summary.access_code,
            summary.question_count,
            summary.submissions.len()
        );
        for row in &summary.submissions {
            info!("    {} - 得分 {}", row.student_name, row.score);
        }
    }
    info!("{}", "=".repeat(60));
}
