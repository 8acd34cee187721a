// ==========================================
// 包装车间产能看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::capacity_config::CapacityConfig;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::open_sqlite_connection;
use crate::domain::types::Category;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    use crate::domain::types::Category;

    pub const CAPACITY_LIMIT_PREFIX: &str = "capacity_limit/";
    pub const CAPACITY_OFFSET_PREFIX: &str = "capacity_offset/";
    pub const EXCLUDED_CUSTOMERS: &str = "excluded_customers";
    pub const DAY_START_HOUR: &str = "day_start_hour";
    pub const PROJECT_PARTIAL_DAY: &str = "project_partial_day";
    pub const PERCENT_DECIMALS: &str = "percent_decimals";

    pub fn capacity_limit(category: Category) -> String {
        format!("{}{}", CAPACITY_LIMIT_PREFIX, category)
    }

    pub fn capacity_offset(category: Category) -> String {
        format!("{}{}", CAPACITY_OFFSET_PREFIX, category)
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 删除 global scope 的配置值（恢复默认）
    pub fn remove(&self, key: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(())
    }

    /// 列出 global scope 的全部配置
    pub fn list(&self) -> ConfigResult<Vec<(String, String)>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config_map: BTreeMap<String, String> = self.list()?.into_iter().collect();
        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 产能配置 =====

    /// 设置某类别的人工偏移
    pub fn set_offset(&self, category: Category, value: f64) -> ConfigResult<()> {
        if !value.is_finite() {
            return Err(ConfigError::InvalidOffset { category, value });
        }
        self.set(&config_keys::capacity_offset(category), &value.to_string())
    }

    /// 设置某类别的日产能上限
    pub fn set_capacity_limit(&self, category: Category, value: f64) -> ConfigResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidCapacityLimit { category, value });
        }
        self.set(&config_keys::capacity_limit(category), &value.to_string())
    }

    /// 设置排除客户名单
    pub fn set_excluded_customers(&self, customers: &[String]) -> ConfigResult<()> {
        let value = serde_json::to_string(customers)?;
        self.set(config_keys::EXCLUDED_CUSTOMERS, &value)
    }

    /// 加载产能配置：默认值 + config_kv 覆写，并校验
    ///
    /// # 返回
    /// - Err(ConfigError): 存储值无法解析或校验失败（启动即失败）
    pub fn load_capacity_config(&self) -> ConfigResult<CapacityConfig> {
        let mut config = CapacityConfig::default();

        for category in Category::ALL {
            let key = config_keys::capacity_limit(category);
            if let Some(value) = self.get_parsed::<f64>(&key)? {
                config.capacity_limits.insert(category, value);
            }

            let key = config_keys::capacity_offset(category);
            if let Some(value) = self.get_parsed::<f64>(&key)? {
                config.offsets.insert(category, value);
            }
        }

        if let Some(raw) = self.get(config_keys::EXCLUDED_CUSTOMERS)? {
            config.excluded_customers =
                serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                    key: config_keys::EXCLUDED_CUSTOMERS.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                })?;
        }

        if let Some(hour) = self.get_parsed::<u32>(config_keys::DAY_START_HOUR)? {
            config.day_start_hour = hour;
        }

        if let Some(flag) = self.get_parsed::<bool>(config_keys::PROJECT_PARTIAL_DAY)? {
            config.project_partial_day = flag;
        }

        if let Some(decimals) = self.get_parsed::<u32>(config_keys::PERCENT_DECIMALS)? {
            config.percent_decimals = decimals;
        }

        config.validate()?;

        tracing::debug!(?config, "产能配置已加载");
        Ok(config)
    }

    /// 读取并解析配置值
    fn get_parsed<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key)? {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }),
        }
    }
}
