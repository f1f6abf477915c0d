//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责装配与调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用编排
//! - 装配存储、服务与调度器
//! - 对外提供测验访问接口（创建/查询/提交/删除/仪表盘）
//! - 提交路径：同步评分 + 落库 + 入队，立刻返回确认
//!
//! ### `scheduler` - 学习指南调度器
//! - 持有任务队列与 worker
//! - 在可见延迟之后执行指南流水线
//! - 捕获并记录 worker 内的一切失败
//!
//! ## 层次关系
//!
//! ```text
//! app (访问接口 / 装配)
//!     ↓
//! scheduler (延迟队列 + worker)
//!     ↓
//! workflow::GuideFlow (处理单条提交)
//!     ↓
//! services (能力层：score / llm / parse / pdf / mail)
//!     ↓
//! store (内存存储，数据契约的替身)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管接口与装配，scheduler 管延迟执行
//! 2. **请求路径零阻塞**：提交确认先返回，流水线后执行
//! 3. **向下依赖**：编排层 → workflow → services → store
//! 4. **失败不外泄**：延迟工作单元内的错误只记录，不传播

pub mod app;
pub mod scheduler;

// 重新导出主要类型
pub use app::{App, SubmissionAck};
pub use scheduler::{GuideScheduler, GuideTask};
