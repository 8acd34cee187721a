// ==========================================
// 包装车间产能看板 - 订单概览引擎
// ==========================================
// 口径:
// - 仅统计 order_quantity > 0 且未被排除的订单
// - TWB / tri-wall 数量 × 18 折算为袋当量
// - "今天" 按 original_ship_date（缺失时回退 ship_date）
// - 最大单日按 ship_date 分组
// ==========================================

use crate::config::CapacityConfig;
use crate::domain::order::OrderLine;
use crate::domain::report::{CommodityTotal, DailyTotal, OrdersSummary};
use crate::engine::classifier::classify_style;
use crate::engine::extractor::TRI_WALL_BAG_EQUIVALENT;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::instrument;

/// 是否为三层瓦楞箱（TWB 或 tri-wall 字样）
fn is_tri_wall_container(style_code: Option<&str>) -> bool {
    style_code
        .map(|s| {
            let lower = s.to_lowercase();
            lower.contains("twb") || lower.contains("tri-wall")
        })
        .unwrap_or(false)
}

/// 袋当量数量
fn bag_equivalent_quantity(row: &OrderLine) -> f64 {
    let quantity = row.order_quantity as f64;
    if is_tri_wall_container(row.style_code.as_deref()) {
        quantity * TRI_WALL_BAG_EQUIVALENT
    } else {
        quantity
    }
}

fn summary_date(row: &OrderLine) -> Option<NaiveDate> {
    row.original_ship_date.or(row.ship_date)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// 订单概览
#[instrument(skip(rows, config), fields(today = %today, rows = rows.len()))]
pub fn orders_summary(
    rows: &[OrderLine],
    today: NaiveDate,
    config: &CapacityConfig,
) -> OrdersSummary {
    let season: Vec<(&OrderLine, f64)> = rows
        .iter()
        .filter(|r| r.order_quantity > 0)
        .filter(|r| !config.is_excluded_customer(r.customer.as_deref()))
        .map(|r| (r, bag_equivalent_quantity(r)))
        .collect();

    if season.is_empty() {
        return OrdersSummary::default();
    }

    let todays: Vec<(&OrderLine, f64)> = season
        .iter()
        .filter(|(r, _)| summary_date(r) == Some(today))
        .copied()
        .collect();

    let total_shipping_season: f64 = season.iter().map(|(_, q)| q).sum();
    let total_shipping_today: f64 = todays.iter().map(|(_, q)| q).sum();
    let total_day_of: f64 = todays
        .iter()
        .filter(|(r, _)| r.is_day_of_order())
        .map(|(_, q)| q)
        .sum();
    let total_bag: f64 = todays
        .iter()
        .filter(|(r, _)| {
            let style = r.style_code.as_deref();
            classify_style(style).is_bagged() || is_tri_wall_container(style)
        })
        .map(|(_, q)| q)
        .sum();

    // 今日品类合计
    let mut by_commodity: BTreeMap<&str, f64> = BTreeMap::new();
    for (row, quantity) in &todays {
        if let Some(commodity) = row.commodity.as_deref() {
            *by_commodity.entry(commodity).or_insert(0.0) += quantity;
        }
    }

    // 按原始发货日期的日序列
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    // 按当前发货日期分组（最大单日）
    let mut by_ship_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    // 销售订单 → 各行数量
    let mut by_order: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for (row, quantity) in &season {
        if let Some(date) = summary_date(row) {
            *by_day.entry(date).or_insert(0.0) += quantity;
        }
        if let Some(date) = row.ship_date {
            *by_ship_date.entry(date).or_insert(0.0) += quantity;
        }
        if let Some(number) = row.sales_order_number.as_deref() {
            by_order.entry(number).or_default().push(*quantity);
        }
    }

    let order_means: Vec<f64> = by_order.values().filter_map(|v| mean(v)).collect();
    let avg_order_qty = mean(&order_means).unwrap_or(0.0).round();

    let today_quantities: Vec<f64> = todays.iter().map(|(_, q)| *q).collect();
    let avg_line_qty = mean(&today_quantities).unwrap_or(0.0).round();

    let largest_single_day = by_ship_date.values().copied().fold(0.0, f64::max);

    tracing::info!(
        season_rows = season.len(),
        today_rows = todays.len(),
        total_shipping_today,
        "订单概览计算完成"
    );

    OrdersSummary {
        total_shipping_today,
        total_shipping_season,
        total_day_of,
        total_bag,
        total_bulk: total_shipping_today - total_bag,
        avg_order_qty,
        avg_line_qty,
        largest_single_day,
        commodity_totals: by_commodity
            .into_iter()
            .map(|(commodity, total_quantity)| CommodityTotal {
                commodity: commodity.to_string(),
                total_quantity,
            })
            .collect(),
        daily_totals: by_day
            .into_iter()
            .map(|(date, total_quantity)| DailyTotal {
                date,
                total_quantity,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXCLUDED_CUSTOMER;
    use crate::domain::order::DAY_OF_ORDER_FLAG;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn row(so: &str, commodity: &str, style: &str, qty: i64, ship: u32) -> OrderLine {
        let mut line = OrderLine::new(format!("{}-{}-{}", so, style, qty), Some(style), qty);
        line.sales_order_number = Some(so.to_string());
        line.commodity = Some(commodity.to_string());
        line.ship_date = Some(day(ship));
        line
    }

    #[test]
    fn test_empty_rows() {
        let summary = orders_summary(&[], day(14), &CapacityConfig::default());
        assert_eq!(summary, OrdersSummary::default());
    }

    #[test]
    fn test_tri_wall_expanded_and_bag_split() {
        let rows = vec![
            row("S1", "ORANGE", "10-4G", 100, 14),
            row("S1", "ORANGE", "TWB 18-2G", 2, 14),
            row("S2", "LEMON", "BULK-A", 40, 14),
            row("S3", "LEMON", "Tri-Wall Bin", 1, 13),
        ];
        let summary = orders_summary(&rows, day(14), &CapacityConfig::default());

        assert_eq!(summary.total_shipping_today, 176.0);
        assert_eq!(summary.total_shipping_season, 194.0);
        assert_eq!(summary.total_bag, 136.0);
        assert_eq!(summary.total_bulk, 40.0);
        assert_eq!(
            summary.commodity_totals,
            vec![
                CommodityTotal {
                    commodity: "LEMON".to_string(),
                    total_quantity: 40.0
                },
                CommodityTotal {
                    commodity: "ORANGE".to_string(),
                    total_quantity: 136.0
                },
            ]
        );
        assert_eq!(summary.largest_single_day, 176.0);
    }

    #[test]
    fn test_original_ship_date_defines_today() {
        let mut moved = row("S1", "ORANGE", "10-4G", 100, 16);
        moved.original_ship_date = Some(day(14));
        let rows = vec![moved, row("S2", "ORANGE", "10-4G", 10, 14)];
        let summary = orders_summary(&rows, day(14), &CapacityConfig::default());

        assert_eq!(summary.total_shipping_today, 110.0);
        assert_eq!(summary.daily_totals.len(), 1);
        // 最大单日按当前发货日期
        assert_eq!(summary.largest_single_day, 100.0);
    }

    #[test]
    fn test_day_of_and_averages() {
        let mut day_of = row("S1", "ORANGE", "10-4G", 10, 14);
        day_of.flag = Some(DAY_OF_ORDER_FLAG.to_string());
        let rows = vec![
            day_of,
            row("S1", "ORANGE", "8-5G", 20, 14),
            row("S2", "ORANGE", "BULK-A", 45, 14),
        ];
        let summary = orders_summary(&rows, day(14), &CapacityConfig::default());

        assert_eq!(summary.total_day_of, 10.0);
        // 行均 75/3 = 25
        assert_eq!(summary.avg_line_qty, 25.0);
        // 订单均值 (15 + 45) / 2 = 30
        assert_eq!(summary.avg_order_qty, 30.0);
    }

    #[test]
    fn test_non_positive_and_excluded_skipped() {
        let mut excluded = row("S1", "ORANGE", "10-4G", 100, 14);
        excluded.customer = Some(DEFAULT_EXCLUDED_CUSTOMER.to_string());
        let rows = vec![
            excluded,
            row("S2", "ORANGE", "10-4G", 0, 14),
            row("S3", "ORANGE", "10-4G", -5, 14),
        ];
        let summary = orders_summary(&rows, day(14), &CapacityConfig::default());
        assert_eq!(summary, OrdersSummary::default());
    }
}
