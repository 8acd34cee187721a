// ==========================================
// 包装车间产能看板 - 看板明细值对象
// ==========================================
// Top5 / 尺码分布 / 周统计 / 订单概览
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 本周热销品（客户 + 品类 + 规格 分组）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSeller {
    pub product_name: String,
    pub style: Option<String>,
    pub total_order_quantity: i64,
}

/// 尺码分布桶（网袋线按尺码，Bulk 按规格码）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBucket {
    pub size: String,
    pub total_quantity: f64,
}

/// 单类别周统计
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub total_today: i64,
    pub percent_today: f64,
    pub total_this_week: i64,
    pub percent_this_week: f64,
    pub total_last_week: i64,
    pub percent_last_week: f64,
}

/// 品类合计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityTotal {
    pub commodity: String,
    pub total_quantity: f64,
}

/// 按日合计（原始发货日期）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_quantity: f64,
}

/// 订单概览
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSummary {
    pub total_shipping_today: f64,
    pub total_shipping_season: f64,
    pub total_day_of: f64,
    pub total_bag: f64,
    pub total_bulk: f64,
    pub avg_order_qty: f64,
    pub avg_line_qty: f64,
    pub largest_single_day: f64,
    pub commodity_totals: Vec<CommodityTotal>,
    pub daily_totals: Vec<DailyTotal>,
}
