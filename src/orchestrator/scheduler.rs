//! 学习指南调度器 - 编排层
//!
//! ## 职责
//!
//! 把"为某条提交生成学习指南"这件事从 HTTP 请求路径上摘下来：
//! 提交接口只负责入队并立刻返回确认，真正的 LLM 调用/解析/渲染/
//! 发邮件由独立的 worker 任务在一段可见延迟之后执行。
//!
//! ## 契约
//!
//! - 尽力而为，至少触发一次；不向调用方暴露投递确认
//! - 入队后不可取消
//! - 不保证与同一测验其他任务之间的先后顺序
//! - 没有针对重复发送的幂等保护（与原有行为一致）
//! - worker 内的任何失败只记录日志，不重试，不传播

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::store::QuizStore;
use crate::workflow::{GuideFlow, GuideOutcome};

/// 一个排队等待执行的指南任务
///
/// 只携带提交记录 ID：worker 执行时按 ID 重新读取提交与测验的
/// 新鲜快照，不在队列里传数据
#[derive(Debug, Clone, Copy)]
pub struct GuideTask {
    pub submission_id: u64,
}

/// 学习指南调度器
pub struct GuideScheduler {
    tx: mpsc::UnboundedSender<GuideTask>,
    /// 已入队但尚未执行完的任务数
    pending: Arc<AtomicUsize>,
}

impl GuideScheduler {
    /// 启动调度器并派生 worker 任务
    ///
    /// worker 串行消费队列：每条提交是一个不可分割的延迟工作单元，
    /// 不与其他提交的流水线交错
    pub fn start(store: Arc<QuizStore>, flow: Arc<GuideFlow>, delay: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<GuideTask>();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = Arc::clone(&pending);

        tokio::spawn(async move {
            info!("🚀 学习指南 worker 已启动（可见延迟 {:?}）", delay);

            while let Some(task) = rx.recv().await {
                // 可见延迟：提交确认早已返回，这里晚几秒再执行
                tokio::time::sleep(delay).await;

                match flow.run(&store, task.submission_id).await {
                    Ok(GuideOutcome::Sent) => {
                        info!("[提交 {}] ✓ 指南任务完成", task.submission_id);
                    }
                    Ok(GuideOutcome::Skipped) => {
                        info!("[提交 {}] 指南任务无事可做，已跳过", task.submission_id);
                    }
                    Err(e) => {
                        // 尽力而为：记录后放弃本条任务，不重试
                        error!(
                            "[提交 {}] ❌ 指南流水线失败: {:#}",
                            task.submission_id, e
                        );
                    }
                }

                worker_pending.fetch_sub(1, Ordering::SeqCst);
            }
        });

        Self { tx, pending }
    }

    /// 把一条提交加入延迟队列
    pub fn enqueue(&self, submission_id: u64) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(GuideTask { submission_id }).is_err() {
            warn!(
                "[提交 {}] ⚠️ worker 已停止，指南任务被丢弃",
                submission_id
            );
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// 当前在队列中（含执行中）的任务数
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}
