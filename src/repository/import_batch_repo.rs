// ==========================================
// 包装车间产能看板 - 导入批次仓储
// ==========================================

use crate::domain::order::ImportBatch;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::DATETIME_FORMAT;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ImportBatchRepository - 导入批次仓储
// ==========================================
pub struct ImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入导入批次记录
    pub fn insert(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, import_id, file_name, file_path,
                total_rows, success_rows, duplicate_rows, replaced_rows,
                imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                batch.batch_id,
                batch.import_id,
                batch.file_name,
                batch.file_path,
                batch.total_rows,
                batch.success_rows,
                batch.duplicate_rows,
                batch.replaced_rows,
                batch.imported_at.format(DATETIME_FORMAT).to_string(),
                batch.elapsed_ms,
            ],
        )?;
        Ok(())
    }

    /// 最近的导入批次（按导入时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, import_id, file_name, file_path,
                   total_rows, success_rows, duplicate_rows, replaced_rows,
                   imported_at, elapsed_ms
            FROM import_batch
            ORDER BY imported_at DESC, import_id DESC
            LIMIT ?1
            "#,
        )?;

        let batches = stmt
            .query_map(params![limit as i64], |row| {
                let imported_at: String = row.get(8)?;
                Ok(ImportBatch {
                    batch_id: row.get(0)?,
                    import_id: row.get(1)?,
                    file_name: row.get(2)?,
                    file_path: row.get(3)?,
                    total_rows: row.get(4)?,
                    success_rows: row.get(5)?,
                    duplicate_rows: row.get(6)?,
                    replaced_rows: row.get(7)?,
                    imported_at: NaiveDateTime::parse_from_str(&imported_at, DATETIME_FORMAT)
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
                        })?,
                    elapsed_ms: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(batches)
    }
}
