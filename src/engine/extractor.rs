// ==========================================
// 包装车间产能看板 - 规格码袋数/尺码解析
// ==========================================
// 规格码形如 "<袋数>-<尺码>" 或 "<袋数>/<尺码>"，如 "10-4#"、"150/4 G"
// 解析失败返回 None，不中断聚合
// TWB（三层瓦楞散装箱）: 订单数量已是箱数，总袋数需除以 18
// ==========================================

use crate::domain::order::OrderLine;
use regex::Regex;
use std::sync::OnceLock;

/// 每个 TWB 箱折算的标准袋数
pub const TRI_WALL_BAG_EQUIVALENT: f64 = 18.0;

/// 袋数 + 尺码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSize {
    pub count: u32, // 每件袋数
    pub size: u32,  // 单袋尺码（磅）
}

fn count_size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)[/-](\d+)").expect("count/size pattern is valid"))
}

/// 解析规格码中的袋数与尺码
///
/// 在字符串任意位置查找第一个 "数字[-/]数字"，不锚定首尾
pub fn extract_count_size(style_code: Option<&str>) -> Option<CountSize> {
    let captures = count_size_pattern().captures(style_code?)?;
    let count = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let size = captures.get(2)?.as_str().parse::<u32>().ok()?;
    Some(CountSize { count, size })
}

/// 规格码是否为 TWB 散装箱（大小写不敏感）
pub fn is_tri_wall(style_code: Option<&str>) -> bool {
    style_code
        .map(|s| s.to_uppercase().contains("TWB"))
        .unwrap_or(false)
}

/// 总袋数 = 袋数 × 未发数量（TWB 再除以 18）
///
/// 无法解析袋数时贡献 0
pub fn total_bags(style_code: Option<&str>, quantity: f64) -> f64 {
    let Some(count_size) = extract_count_size(style_code) else {
        return 0.0;
    };

    let bags = f64::from(count_size.count) * quantity;
    if is_tri_wall(style_code) {
        bags / TRI_WALL_BAG_EQUIVALENT
    } else {
        bags
    }
}

/// 聚合基数：未发数量，超发（负数）截断为 0 并告警
pub fn remaining_quantity(row: &OrderLine) -> f64 {
    let remaining = row.raw_remaining_quantity();
    if remaining < 0 {
        tracing::warn!(
            line_id = %row.line_id,
            order_quantity = row.order_quantity,
            filled_quantity = ?row.filled_quantity,
            "已发数量大于订单数量，未发数量按 0 计"
        );
        return 0.0;
    }
    remaining as f64
}
