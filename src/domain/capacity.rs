// ==========================================
// 包装车间产能看板 - 产能快照领域模型
// ==========================================
// 生命周期: 每次查询现算，不落库，直接序列化给调用方
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CapacitySnapshot - 单类别产能快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySnapshot {
    pub current_value: f64,  // 当前占用（袋数 / 折算箱数）
    pub capacity_limit: f64, // 日产能上限
    pub percentage: f64,     // 占用百分比（已扣除人工偏移并取整）
}
