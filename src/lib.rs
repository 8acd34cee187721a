// ==========================================
// 包装车间产能看板 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 订单 → 包装线分类 → 产能聚合 → 看板数据
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 产能聚合规则
pub mod engine;

// 导入层 - 订单文件
pub mod importer;

// 配置层 - 产能上限/偏移/排除名单
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 看板接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// 定时任务 - 订单目录轮询
pub mod scheduler;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{CapacitySnapshot, Category, OrderLine};
pub use engine::{CapacityAggregator, StyleClassifier};
pub use config::CapacityConfig;
pub use api::{CapacityDashboardApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "包装车间产能看板";
