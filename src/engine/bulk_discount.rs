// ==========================================
// 包装车间产能看板 - Bulk 产能折算
// ==========================================
// 折算系数（多条命中取最小值，不连乘）:
// - 等级 CHOICE         → 0.7
// - 包装方式含 rpc       → 0.85
// - 规格 5#/10# CARTON   → 0.2
// - 均未命中             → 1.0
// ==========================================

use crate::domain::order::OrderLine;

pub const CHOICE_GRADE_FACTOR: f64 = 0.7;
pub const RPC_METHOD_FACTOR: f64 = 0.85;
pub const SMALL_CARTON_FACTOR: f64 = 0.2;

/// 小纸箱规格
pub const SMALL_CARTON_STYLES: [&str; 2] = ["5# CARTON", "10# CARTON"];

/// 单行折算系数
pub fn discount_factor(row: &OrderLine) -> f64 {
    let mut factor: f64 = 1.0;

    if row
        .grade
        .as_deref()
        .map(|g| g.trim().eq_ignore_ascii_case("CHOICE"))
        .unwrap_or(false)
    {
        factor = factor.min(CHOICE_GRADE_FACTOR);
    }

    if row
        .method
        .as_deref()
        .map(|m| m.to_lowercase().contains("rpc"))
        .unwrap_or(false)
    {
        factor = factor.min(RPC_METHOD_FACTOR);
    }

    if row
        .style_code
        .as_deref()
        .map(|s| SMALL_CARTON_STYLES.contains(&s.trim().to_uppercase().as_str()))
        .unwrap_or(false)
    {
        factor = factor.min(SMALL_CARTON_FACTOR);
    }

    factor
}

/// 折算后的 Bulk 产能占用 = 系数 × 未发数量
pub fn computed_capacity(row: &OrderLine, remaining_quantity: f64) -> f64 {
    discount_factor(row) * remaining_quantity
}
