// ==========================================
// 包装车间产能看板 - 配置层错误类型
// ==========================================
// 配置错误在启动时即为致命错误，不在单次查询中吞掉
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::Category;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 产能参数错误 =====
    #[error("缺少产能上限配置: category={category}")]
    MissingCapacityLimit { category: Category },

    #[error("产能上限必须为正数: category={category}, value={value}")]
    InvalidCapacityLimit { category: Category, value: f64 },

    #[error("产能偏移必须为有限数值: category={category}, value={value}")]
    InvalidOffset { category: Category, value: f64 },

    #[error("班次起始小时超出范围 [0, 23]: {0}")]
    InvalidDayStartHour(u32),

    #[error("百分比小数位超出范围 [0, 6]: {0}")]
    InvalidPercentDecimals(u32),

    // ===== 存储值错误 =====
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error("配置读取失败: {0}")]
    Database(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Database(format!("配置快照序列化失败: {}", err))
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
