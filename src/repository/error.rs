// ==========================================
// 包装车间产能看板 - 仓储层错误类型
// ==========================================
// orders 主键即订单行指纹，主键冲突单独归类
// ==========================================

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    /// 同一订单行指纹重复写入
    #[error("订单行指纹冲突: {0}")]
    DuplicateLine(String),

    /// 库中文本无法还原（日期/时间列被外部改写等）
    #[error("存储值无法解析 (第 {column} 列): {message}")]
    CorruptValue { column: usize, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref msg)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                RepositoryError::DuplicateLine(msg.clone().unwrap_or_else(|| err.to_string()))
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
                RepositoryError::CorruptValue {
                    column,
                    message: source.to_string(),
                }
            }
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
