// ==========================================
// 包装车间产能看板 - 引擎层
// ==========================================
// 职责: 纯计算管线（分类 → 解析 → 折算 → 聚合）
// 约束: 不访问数据库、不读系统时钟，时间由调用方注入
// ==========================================

pub mod breakdown;
pub mod bulk_discount;
pub mod calendar;
pub mod capacity_aggregator;
pub mod classifier;
pub mod extractor;
pub mod orders_summary;
pub mod weekly_stats;

// 重导出核心引擎
pub use breakdown::{size_histogram, top_sellers, TOP_SELLER_LIMIT};
pub use bulk_discount::{computed_capacity, discount_factor};
pub use calendar::{
    elapsed_day_modifier, monday_week, previous_monday_week, sunday_week, DateWindow,
};
pub use capacity_aggregator::{safe_percent, CapacityAggregator, CapacityReport};
pub use classifier::{classify_style, StyleClassifier};
pub use extractor::{extract_count_size, remaining_quantity, total_bags, CountSize};
pub use orders_summary::orders_summary;
pub use weekly_stats::weekly_stats;
