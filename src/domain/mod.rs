// ==========================================
// 包装车间产能看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、值对象
// 约束: 不含数据访问逻辑,不含聚合逻辑
// ==========================================

pub mod capacity;
pub mod order;
pub mod report;
pub mod types;

// 重导出核心类型
pub use capacity::CapacitySnapshot;
pub use order::{ImportBatch, OrderLine, DAY_OF_ORDER_FLAG};
pub use report::{CommodityTotal, DailyTotal, OrdersSummary, SizeBucket, TopSeller, WeeklyStats};
pub use types::Category;
