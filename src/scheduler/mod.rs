// ==========================================
// 包装车间产能看板 - 定时任务
// ==========================================
// 职责: 周期性驱动独立任务（如订单目录监视导入）
// 约束: 与聚合管线解耦，任务失败只记录日志，循环继续
// ==========================================

pub mod order_watch;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub use order_watch::{newest_csv_in, OrderFolderWatcher, WatchOutcome};

/// 可周期执行的任务
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// 任务名（日志用）
    fn name(&self) -> &str;

    /// 执行一次
    async fn run_once(&self) -> anyhow::Result<()>;
}

/// 按固定周期执行任务，首次立即执行
///
/// 返回的句柄 abort 后循环停止
pub fn run_every(task: Arc<dyn ScheduledTask>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // 单次执行超过周期时不补跑
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(task = task.name(), period_secs = period.as_secs(), "定时任务启动");
        loop {
            ticker.tick().await;
            if let Err(e) = task.run_once().await {
                tracing::error!(task = task.name(), error = %e, "定时任务执行失败");
            }
        }
    })
}
