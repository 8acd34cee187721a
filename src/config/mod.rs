// ==========================================
// 包装车间产能看板 - 配置层
// ==========================================
// 职责: 产能上限/偏移/排除名单等配置的默认值、覆写与校验
// 存储: config_kv 表
// ==========================================

pub mod capacity_config;
pub mod config_manager;
pub mod error;

// 重导出核心配置类型
pub use capacity_config::{CapacityConfig, DEFAULT_EXCLUDED_CUSTOMER};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
