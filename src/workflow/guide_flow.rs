//! 学习指南处理流程 - 流程层
//!
//! 核心职责：定义"一条提交"的完整指南流水线
//!
//! 流程顺序：
//! 1. 按 ID 重新读取提交与测验的新鲜快照
//! 2. 评分 → 答错题目集合（为空则跳过）
//! 3. 构建提示词 → LLM 生成 → 文法提取（软失败继续）
//! 4. PDF 渲染 → 邮件发送
//!
//! 错误契约：LLM 调用、渲染、发送中的任何失败都会中止本条提交
//! 余下的步骤，错误向上抛给 worker 统一记录日志。学生侧的提交
//! 确认早已返回，这里的失败不重试、不回传。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::services::{
    build_guide_prompt, score_submission, GuideModel, GuideNotifier, GuideParser, PdfService,
};
use crate::store::QuizStore;
use crate::utils::logging::truncate_text;
use crate::workflow::guide_ctx::GuideCtx;

/// 流水线处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOutcome {
    /// 指南已发送
    Sent,
    /// 跳过（全部答对，或提交/测验已不存在以外的正常空转）
    Skipped,
}

/// 学习指南处理流程
///
/// - 编排完整的指南生成流程
/// - 不持有存储（每次执行时传入，读取新鲜快照）
/// - 只依赖业务能力（services），模型与邮件传输都是注入的接缝
pub struct GuideFlow {
    model: Arc<dyn GuideModel>,
    notifier: Arc<dyn GuideNotifier>,
    parser: GuideParser,
    pdf_service: PdfService,
    /// PDF 的临时输出目录
    output_dir: PathBuf,
    verbose_logging: bool,
}

impl GuideFlow {
    /// 创建新的指南处理流程
    pub fn new(
        config: &Config,
        model: Arc<dyn GuideModel>,
        notifier: Arc<dyn GuideNotifier>,
    ) -> Result<Self> {
        let output_dir = if config.guide_output_dir.is_empty() {
            std::env::temp_dir()
        } else {
            let dir = PathBuf::from(&config.guide_output_dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("无法创建输出目录: {}", dir.display()))?;
            dir
        };

        Ok(Self {
            model,
            notifier,
            parser: GuideParser::new()?,
            pdf_service: PdfService::new(),
            output_dir,
            verbose_logging: config.verbose_logging,
        })
    }

    /// 为一条提交执行完整的指南流水线
    pub async fn run(&self, store: &QuizStore, submission_id: u64) -> Result<GuideOutcome> {
        // ========== 步骤 1: 重新读取新鲜快照 ==========
        let submission = store
            .submission(submission_id)
            .await
            .with_context(|| format!("提交记录 #{} 不存在（可能已随测验删除）", submission_id))?;
        let quiz = store
            .quiz_by_id(submission.quiz_id)
            .await
            .with_context(|| format!("测验 #{} 不存在（可能已被删除）", submission.quiz_id))?;

        let ctx = GuideCtx::new(
            submission.id,
            quiz.title.clone(),
            submission.student_name.clone(),
        );

        // ========== 步骤 2: 基于快照重新评分，取答错集合 ==========
        let outcome = score_submission(&submission.answers, &quiz.questions);
        if outcome.wrong_questions.is_empty() {
            info!("{} 全部答对，无需学习指南", ctx);
            return Ok(GuideOutcome::Skipped);
        }

        info!(
            "[提交 {}] 📝 {} 道题答错，开始生成学习指南",
            ctx.submission_id,
            outcome.wrong_questions.len()
        );

        // ========== 步骤 3: LLM 生成 + 文法提取 ==========
        let prompt = build_guide_prompt(&quiz.title, &outcome.wrong_questions);
        if self.verbose_logging {
            debug!(
                "[提交 {}] 提示词预览: {}",
                ctx.submission_id,
                truncate_text(&prompt, 200)
            );
        }

        let response = self
            .model
            .generate(&prompt)
            .await
            .context("LLM 调用失败，中止本条提交的指南流水线")?;

        // 文法不匹配是软失败：records 为空，继续渲染空的练习题章节
        let parsed = self.parser.parse(&response);
        if self.verbose_logging && parsed.matched {
            for (i, record) in parsed.records.iter().enumerate() {
                debug!(
                    "[提交 {}]   {}. {}",
                    ctx.submission_id,
                    i + 1,
                    truncate_text(&record.topic, 60)
                );
            }
        }

        // ========== 步骤 4: 渲染 PDF 并发送 ==========
        let pdf_path = self
            .output_dir
            .join(format!("study_guide_{}.pdf", submission.id));
        self.pdf_service
            .render(
                &pdf_path,
                &quiz.title,
                &submission.student_name,
                &parsed.records,
            )
            .context("PDF 渲染失败")?;

        self.notifier
            .send_guide(
                &submission.student_email,
                &quiz.title,
                &submission.student_name,
                &pdf_path,
            )
            .await
            .context("邮件发送失败")?;

        info!(
            "[提交 {}] ✅ 学习指南已发送至 {}",
            ctx.submission_id, submission.student_email
        );
        Ok(GuideOutcome::Sent)
    }
}
