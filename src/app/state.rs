// ==========================================
// 包装车间产能看板 - 应用状态
// ==========================================
// 职责: 打开数据库、建表、校验配置，组装仓储与 API 实例
// 配置无效在启动时即失败
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{CapacityDashboardApi, ConfigApi, ImportApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{ImportBatchRepository, OrderRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SHED_CAPACITY_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub order_repo: Arc<OrderRepository>,
    pub config_manager: Arc<ConfigManager>,

    /// 看板API
    pub dashboard_api: Arc<CapacityDashboardApi>,

    /// 订单导入API
    pub import_api: Arc<ImportApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 返回
    /// - Err(String): 数据库无法打开、建表失败或产能配置无效
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        Self::from_connection(db_path, conn)
    }

    /// 从已打开的连接创建（测试使用内存库）
    pub fn from_connection(db_path: String, conn: Connection) -> Result<Self, String> {
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let config = config_manager
            .load_capacity_config()
            .map_err(|e| format!("产能配置无效: {}", e))?;
        tracing::info!(
            excluded_customers = config.excluded_customers.len(),
            day_start_hour = config.day_start_hour,
            "产能配置校验通过"
        );

        let order_repo = Arc::new(OrderRepository::from_connection(conn.clone()));
        let batch_repo = Arc::new(ImportBatchRepository::from_connection(conn));

        let dashboard_api = Arc::new(CapacityDashboardApi::new(
            order_repo.clone(),
            config_manager.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(order_repo.clone(), batch_repo));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        Ok(Self {
            db_path,
            order_repo,
            config_manager,
            dashboard_api,
            import_api,
            config_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 SHED_CAPACITY_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./shed_capacity.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("shed-capacity");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("shed_capacity.db");
        }
    }

    path.to_string_lossy().to_string()
}
