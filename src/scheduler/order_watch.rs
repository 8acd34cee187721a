// ==========================================
// 包装车间产能看板 - 订单目录监视任务
// ==========================================
// 每个周期: 取目录中修改时间最新的 .csv
// - 与上次导入的 (路径, 修改时间) 相同 → 跳过
// - 否则在阻塞线程池中执行导入
// ==========================================

use crate::api::ImportApi;
use crate::importer::ImportReport;
use crate::scheduler::ScheduledTask;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// 本地时间来源
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// 单次检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// 目录中没有 .csv
    NoFile,
    /// 最新文件已导入过
    AlreadyImported(PathBuf),
    Imported(ImportReport),
}

/// 目录中修改时间最新的 .csv（扩展名大小写不敏感）
pub fn newest_csv_in(folder: &Path) -> std::io::Result<Option<(PathBuf, SystemTime)>> {
    let mut newest: Option<(PathBuf, SystemTime)> = None;

    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv || !path.is_file() {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let is_newer = newest
            .as_ref()
            .map(|(_, current)| modified > *current)
            .unwrap_or(true);
        if is_newer {
            newest = Some((path, modified));
        }
    }

    Ok(newest)
}

// ==========================================
// OrderFolderWatcher - 订单目录监视
// ==========================================
pub struct OrderFolderWatcher {
    folder: PathBuf,
    import_api: Arc<ImportApi>,
    clock: Clock,
    last_imported: Mutex<Option<(PathBuf, SystemTime)>>,
}

impl OrderFolderWatcher {
    /// 使用本地系统时间
    pub fn new(folder: impl Into<PathBuf>, import_api: Arc<ImportApi>) -> Self {
        Self::with_clock(folder, import_api, Arc::new(|| Local::now().naive_local()))
    }

    pub fn with_clock(folder: impl Into<PathBuf>, import_api: Arc<ImportApi>, clock: Clock) -> Self {
        Self {
            folder: folder.into(),
            import_api,
            clock,
            last_imported: Mutex::new(None),
        }
    }

    fn already_imported(&self, candidate: &(PathBuf, SystemTime)) -> anyhow::Result<bool> {
        let last = self
            .last_imported
            .lock()
            .map_err(|e| anyhow::anyhow!("监视状态锁获取失败: {}", e))?;
        Ok(last.as_ref() == Some(candidate))
    }

    /// 检查一次目录并按需导入
    pub async fn check(&self) -> anyhow::Result<WatchOutcome> {
        let folder = self.folder.clone();
        let newest = tokio::task::spawn_blocking(move || newest_csv_in(&folder)).await??;

        let Some(candidate) = newest else {
            tracing::debug!(folder = %self.folder.display(), "目录中没有订单文件");
            return Ok(WatchOutcome::NoFile);
        };

        if self.already_imported(&candidate)? {
            tracing::debug!(file = %candidate.0.display(), "最新订单文件已导入，跳过");
            return Ok(WatchOutcome::AlreadyImported(candidate.0));
        }

        let now = (self.clock)();
        let api = self.import_api.clone();
        let path = candidate.0.clone();
        let report = tokio::task::spawn_blocking(move || api.import_file(&path, now)).await??;

        tracing::info!(
            file = %candidate.0.display(),
            imported_rows = report.imported_rows,
            "目录监视导入完成"
        );

        let mut last = self
            .last_imported
            .lock()
            .map_err(|e| anyhow::anyhow!("监视状态锁获取失败: {}", e))?;
        *last = Some(candidate);

        Ok(WatchOutcome::Imported(report))
    }
}

#[async_trait]
impl ScheduledTask for OrderFolderWatcher {
    fn name(&self) -> &str {
        "order-folder-watch"
    }

    async fn run_once(&self) -> anyhow::Result<()> {
        self.check().await.map(|_| ())
    }
}
