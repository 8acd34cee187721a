// ==========================================
// 包装车间产能看板 - 配置管理 API
// ==========================================
// 职责: 产能参数查询、调整、快照导出/恢复
// 约束: 任何写入后配置必须仍可通过校验，否则回滚
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{CapacityConfig, ConfigManager};
use crate::domain::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 已保存的配置项（global 作用域）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        Ok(self
            .config_manager
            .list()?
            .into_iter()
            .map(|(key, value)| ConfigItem { key, value })
            .collect())
    }

    /// 生效中的产能配置（默认值 + 覆写）
    pub fn effective_config(&self) -> ApiResult<CapacityConfig> {
        Ok(self.config_manager.load_capacity_config()?)
    }

    /// 设置类别偏移（百分点）
    pub fn set_offset(&self, category: &str, value: f64) -> ApiResult<CapacityConfig> {
        let category = parse_category(category)?;
        self.config_manager.set_offset(category, value)?;
        self.effective_config()
    }

    /// 设置类别日产能上限
    pub fn set_capacity_limit(&self, category: &str, value: f64) -> ApiResult<CapacityConfig> {
        let category = parse_category(category)?;
        self.config_manager.set_capacity_limit(category, value)?;
        self.effective_config()
    }

    /// 设置排除客户名单
    pub fn set_excluded_customers(&self, customers: &[String]) -> ApiResult<CapacityConfig> {
        self.config_manager.set_excluded_customers(customers)?;
        self.effective_config()
    }

    /// 配置快照（JSON 对象: key → value）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        Ok(self.config_manager.get_config_snapshot()?)
    }

    /// 从快照恢复，恢复后配置校验失败则回滚
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数
    pub fn restore_from_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        let snapshot: BTreeMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| ApiError::InvalidInput(format!("快照格式错误: {}", e)))?;

        let previous = self.config_manager.list()?;

        for (key, value) in &snapshot {
            self.config_manager.set(key, value)?;
        }

        if let Err(e) = self.config_manager.load_capacity_config() {
            tracing::warn!(error = %e, "快照恢复后配置无效，回滚");
            for key in snapshot.keys() {
                self.config_manager.remove(key)?;
            }
            for (key, value) in &previous {
                self.config_manager.set(key, value)?;
            }
            return Err(e.into());
        }

        tracing::info!(count = snapshot.len(), "配置快照已恢复");
        Ok(snapshot.len())
    }
}

fn parse_category(raw: &str) -> ApiResult<Category> {
    raw.parse::<Category>().map_err(ApiError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn setup() -> ConfigApi {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let manager = ConfigManager::from_connection(Arc::new(Mutex::new(conn)));
        ConfigApi::new(Arc::new(manager))
    }

    #[test]
    fn test_set_offset_and_limit() {
        let api = setup();
        let config = api.set_offset("giro", 2.5).unwrap();
        assert_eq!(config.offset(Category::Giro), 2.5);

        let config = api.set_capacity_limit("Vexar", 80_000.0).unwrap();
        assert_eq!(config.capacity_limit(Category::Vex), 80_000.0);

        assert_eq!(api.list_configs().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let api = setup();
        assert!(matches!(
            api.set_offset("carton", 1.0),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let api = setup();
        assert!(matches!(
            api.set_capacity_limit("bulk", 0.0),
            Err(ApiError::ConfigError(_))
        ));
    }

    #[test]
    fn test_snapshot_round_trip_and_rollback() {
        let api = setup();
        api.set_offset("fox", 1.5).unwrap();
        let snapshot = api.get_config_snapshot().unwrap();

        let restored = setup();
        assert_eq!(restored.restore_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(restored.effective_config().unwrap().offset(Category::Fox), 1.5);

        let bad = r#"{"day_start_hour": "30"}"#;
        assert!(restored.restore_from_snapshot(bad).is_err());
        // 回滚后仍为有效配置
        assert_eq!(restored.effective_config().unwrap().day_start_hour, 4);
    }
}
