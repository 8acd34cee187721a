// ==========================================
// 包装车间产能看板 - 应用层
// ==========================================
// 职责: 组装共享状态，供命令行与定时任务使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
