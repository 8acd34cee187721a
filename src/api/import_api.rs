// ==========================================
// 包装车间产能看板 - 订单导入 API
// ==========================================
// 职责: 封装订单文件导入与导入批次查询
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::order::ImportBatch;
use crate::importer::{ImportReport, OrderImporter};
use crate::repository::{ImportBatchRepository, OrderRepository};
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;

/// 导入API
pub struct ImportApi {
    importer: OrderImporter,
    batch_repo: Arc<ImportBatchRepository>,
}

impl ImportApi {
    pub fn new(order_repo: Arc<OrderRepository>, batch_repo: Arc<ImportBatchRepository>) -> Self {
        Self {
            importer: OrderImporter::new(order_repo, batch_repo.clone()),
            batch_repo,
        }
    }

    /// 导入订单文件
    ///
    /// # 参数
    /// - `file_path`: .csv / .xlsx / .xls 文件
    /// - `now`: 导入时刻（本地时间）
    pub fn import_file(&self, file_path: &Path, now: NaiveDateTime) -> ApiResult<ImportReport> {
        if file_path.as_os_str().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }
        Ok(self.importer.import_file(file_path, now)?)
    }

    /// 最近的导入批次
    pub fn list_recent_batches(&self, limit: usize) -> ApiResult<Vec<ImportBatch>> {
        Ok(self.batch_repo.list_recent(limit)?)
    }
}
