//! # Quiz Submit Guide
//!
//! 一个用于测验提交评分与个性化学习指南生成的 Rust 服务层
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 存储层（Store）
//! - `store/` - 内存测验存储，按访问码管理测验与提交记录
//! - 充当外部数据层契约的替身：写入校验、级联删除、新鲜快照读取
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条数据
//! - `scorer` - 纯函数评分能力（严格文本匹配 + 脏数据降级）
//! - `LlmService` - LLM 学习指南生成能力（GuideModel 接缝）
//! - `GuideParser` - 练习题文法提取能力（软失败，不抛错）
//! - `PdfService` - 指南 PDF 排版能力（WinAnsi 安全转写）
//! - `MailService` - 邮件发送能力（GuideNotifier 接缝）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条提交"的完整指南流水线
//! - `GuideCtx` - 上下文封装（submission_id + 测验/学生信息）
//! - `GuideFlow` - 流程编排（重读快照 → 评分 → LLM → 解析 → PDF → 邮件）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 访问接口与装配（创建/查询/提交/删除/仪表盘）
//! - `orchestrator/scheduler` - 延迟任务队列与 worker
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::quiz::{NewQuiz, Question, Quiz};
pub use models::submission::{AnswerMap, Submission};
pub use orchestrator::{App, GuideScheduler, SubmissionAck};
pub use services::{GuideModel, GuideNotifier, LlmService};
pub use store::QuizStore;
pub use workflow::{GuideCtx, GuideFlow, GuideOutcome};
