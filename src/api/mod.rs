// ==========================================
// 包装车间产能看板 - API 层
// ==========================================
// 职责: 提供看板/导入/配置接口，供命令行与定时任务调用
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use config_api::{ConfigApi, ConfigItem};
pub use dashboard_api::CapacityDashboardApi;
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
