// ==========================================
// 包装车间产能看板 - 订单导入器
// ==========================================
// 流程: 解析 → 表头规范化 → 字段映射 → 文件内重复剔除
//      → 继承原始发货日期 → 整批替换落库 → 记录导入批次
// ==========================================
// 文件内同一指纹出现多次: 全部丢弃（不保留其中一条）
// 行级映射失败: 跳过该行并计数
// ==========================================

use crate::domain::order::{ImportBatch, OrderLine};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use crate::repository::{ImportBatchRepository, OrderRepository};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 单次导入结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub import_id: i64,
    pub file_name: Option<String>,
    pub total_rows: usize,     // 文件数据行数（不含空行）
    pub imported_rows: usize,  // 写入行数
    pub duplicate_rows: usize, // 文件内重复指纹丢弃行数
    pub invalid_rows: usize,   // 字段映射失败跳过行数
    pub replaced_rows: usize,  // 被替换/清理的旧行数
    pub elapsed_ms: i64,
}

// ==========================================
// OrderImporter - 订单导入器
// ==========================================
pub struct OrderImporter {
    order_repo: Arc<OrderRepository>,
    batch_repo: Arc<ImportBatchRepository>,
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl OrderImporter {
    /// 使用默认解析器（按扩展名选择 CSV / Excel）
    pub fn new(order_repo: Arc<OrderRepository>, batch_repo: Arc<ImportBatchRepository>) -> Self {
        Self::with_parser(order_repo, batch_repo, Box::new(UniversalFileParser))
    }

    pub fn with_parser(
        order_repo: Arc<OrderRepository>,
        batch_repo: Arc<ImportBatchRepository>,
        file_parser: Box<dyn FileParser>,
    ) -> Self {
        Self {
            order_repo,
            batch_repo,
            file_parser,
            field_mapper: FieldMapper,
        }
    }

    /// 导入订单文件
    ///
    /// # 参数
    /// - `file_path`: 订单导出文件（.csv / .xlsx / .xls）
    /// - `now`: 导入时刻（本地时间），写入 uploaded_at，并决定清理范围
    #[instrument(skip(self, file_path), fields(batch_id))]
    pub fn import_file(&self, file_path: &Path, now: NaiveDateTime) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        info!(file_path = %file_path.display(), "开始导入订单文件");

        // === 步骤 1: 解析文件 ===
        let raw_rows = self.file_parser.parse_to_raw_records(file_path)?;
        let total_rows = raw_rows.len();
        debug!(total_rows, "文件解析完成");

        if !raw_rows.is_empty() {
            let headers: BTreeSet<&String> = raw_rows.iter().flat_map(|r| r.keys()).collect();
            self.field_mapper.check_required_columns(headers)?;
        }

        // === 步骤 2: 表头规范化 + 字段映射 ===
        let mut lines = Vec::with_capacity(total_rows);
        let mut invalid_rows = 0usize;
        for (idx, raw) in raw_rows.into_iter().enumerate() {
            let row = self.field_mapper.normalize_record(raw);
            match self.field_mapper.map_to_order_line(&row, idx + 1) {
                Ok(line) => lines.push(line),
                Err(e) if e.is_row_level() => {
                    warn!(row_number = idx + 1, error = %e, "字段映射失败，跳过该行");
                    invalid_rows += 1;
                }
                Err(e) => return Err(e),
            }
        }

        // === 步骤 3: 文件内重复指纹剔除 ===
        let (mut lines, duplicate_rows) = drop_in_file_duplicates(lines);

        // === 步骤 4: 导入序号 + 原始发货日期继承（须在删除旧行之前查询）===
        let import_id = self.order_repo.latest_import_id()? + 1;
        let line_ids: Vec<String> = lines.iter().map(|l| l.line_id.clone()).collect();
        let previous_ship_dates = self.order_repo.find_ship_dates_by_line_ids(&line_ids)?;

        for line in &mut lines {
            line.import_id = Some(import_id);
            line.uploaded_at = Some(now);
            line.original_ship_date = previous_ship_dates
                .get(&line.line_id)
                .copied()
                .or(line.ship_date);
        }

        // === 步骤 5: 整批替换 ===
        let (imported_rows, replaced_rows) = if lines.is_empty() {
            warn!("剔除重复/无效行后无可导入数据，保留现有订单");
            (0, 0)
        } else {
            let outcome = self.order_repo.replace_import(&lines, now.date())?;
            (outcome.inserted, outcome.replaced_rows())
        };

        let elapsed_ms = start_time.elapsed().as_millis() as i64;

        // === 步骤 6: 记录导入批次 ===
        self.batch_repo.insert(&ImportBatch {
            batch_id: batch_id.clone(),
            import_id,
            file_name: file_name.clone(),
            file_path: Some(file_path.display().to_string()),
            total_rows: total_rows as i64,
            success_rows: imported_rows as i64,
            duplicate_rows: duplicate_rows as i64,
            replaced_rows: replaced_rows as i64,
            imported_at: now,
            elapsed_ms: Some(elapsed_ms),
        })?;

        info!(
            import_id,
            total_rows,
            imported_rows,
            duplicate_rows,
            invalid_rows,
            replaced_rows,
            elapsed_ms,
            "订单导入完成"
        );

        Ok(ImportReport {
            batch_id,
            import_id,
            file_name,
            total_rows,
            imported_rows,
            duplicate_rows,
            invalid_rows,
            replaced_rows,
            elapsed_ms,
        })
    }
}

/// 剔除文件内重复指纹的所有行，返回 (保留行, 丢弃行数)
pub fn drop_in_file_duplicates(lines: Vec<OrderLine>) -> (Vec<OrderLine>, usize) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for line in &lines {
        *counts.entry(line.line_id.clone()).or_insert(0) += 1;
    }

    let before = lines.len();
    let kept: Vec<OrderLine> = lines
        .into_iter()
        .filter(|line| {
            let duplicated = counts.get(&line.line_id).copied().unwrap_or(0) > 1;
            if duplicated {
                warn!(
                    line_id = %line.line_id,
                    sales_order_number = ?line.sales_order_number,
                    style_code = ?line.style_code,
                    "文件内指纹重复，该行不导入"
                );
            }
            !duplicated
        })
        .collect();

    let dropped = before - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_in_file_duplicates_removes_all_copies() {
        let lines = vec![
            OrderLine::new("A", Some("10-4G"), 1),
            OrderLine::new("B", Some("10-4G"), 1),
            OrderLine::new("A", Some("10-4G"), 1),
            OrderLine::new("C", Some("10-4G"), 1),
        ];
        let (kept, dropped) = drop_in_file_duplicates(lines);
        let ids: Vec<&str> = kept.iter().map(|l| l.line_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_drop_in_file_duplicates_no_duplicates() {
        let lines = vec![OrderLine::new("A", None, 1)];
        let (kept, dropped) = drop_in_file_duplicates(lines);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 0);
    }
}
