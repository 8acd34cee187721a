// ==========================================
// 包装车间产能看板 - 周统计引擎
// ==========================================
// 窗口: 今天 / 本周（周一~周日）/ 上周
// 数量口径: 原始 order_quantity
// 占比: 类别合计 / 同窗口全部（未排除）订单合计
// ==========================================

use crate::config::CapacityConfig;
use crate::domain::order::OrderLine;
use crate::domain::report::WeeklyStats;
use crate::domain::types::Category;
use crate::engine::calendar::{monday_week, previous_monday_week, DateWindow};
use crate::engine::capacity_aggregator::safe_percent;
use crate::engine::classifier::classify_style;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::instrument;

/// 单窗口内: 各类别合计 + 全部合计
fn window_totals(
    rows: &[OrderLine],
    window: DateWindow,
    config: &CapacityConfig,
) -> (BTreeMap<Category, i64>, i64) {
    let mut by_category: BTreeMap<Category, i64> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut all = 0i64;

    for row in rows
        .iter()
        .filter(|r| window.contains_opt(r.ship_date))
        .filter(|r| !config.is_excluded_customer(r.customer.as_deref()))
    {
        let total = by_category
            .entry(classify_style(row.style_code.as_deref()))
            .or_insert(0);
        *total = total.saturating_add(row.order_quantity);
        all = all.saturating_add(row.order_quantity);
    }

    (by_category, all)
}

/// 各类别周统计
#[instrument(skip(rows, config), fields(today = %today, rows = rows.len()))]
pub fn weekly_stats(
    rows: &[OrderLine],
    today: NaiveDate,
    config: &CapacityConfig,
) -> BTreeMap<Category, WeeklyStats> {
    let (today_totals, today_all) = window_totals(rows, DateWindow::single_day(today), config);
    let (this_week, this_week_all) = window_totals(rows, monday_week(today), config);
    let (last_week, last_week_all) = window_totals(rows, previous_monday_week(today), config);

    let percent = |part: i64, whole: i64| -> f64 {
        if whole <= 0 {
            return 0.0;
        }
        config.round_percent(safe_percent(part as f64, whole as f64))
    };

    Category::ALL
        .iter()
        .map(|category| {
            let total_today = today_totals.get(category).copied().unwrap_or(0);
            let total_this_week = this_week.get(category).copied().unwrap_or(0);
            let total_last_week = last_week.get(category).copied().unwrap_or(0);

            (
                *category,
                WeeklyStats {
                    total_today,
                    percent_today: percent(total_today, today_all),
                    total_this_week,
                    percent_this_week: percent(total_this_week, this_week_all),
                    total_last_week,
                    percent_last_week: percent(total_last_week, last_week_all),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn row(id: &str, style: &str, qty: i64, ship: u32) -> OrderLine {
        let mut line = OrderLine::new(id, Some(style), qty);
        line.ship_date = Some(day(ship));
        line
    }

    #[test]
    fn test_today_week_and_last_week() {
        // 2026-10-14 周三; 本周 10-12..10-18, 上周 10-05..10-11
        let rows = vec![
            row("L1", "10-4G", 30, 14),
            row("L2", "BULK-A", 10, 14),
            row("L3", "10-4G", 60, 12),
            row("L4", "FOX 8-5", 40, 7),
            row("L5", "BULK-A", 10, 11),
        ];
        let stats = weekly_stats(&rows, day(14), &CapacityConfig::default());

        let giro = stats[&Category::Giro];
        assert_eq!(giro.total_today, 30);
        assert_eq!(giro.percent_today, 75.0);
        assert_eq!(giro.total_this_week, 90);
        assert_eq!(giro.percent_this_week, 90.0);
        assert_eq!(giro.total_last_week, 0);
        assert_eq!(giro.percent_last_week, 0.0);

        let fox = stats[&Category::Fox];
        assert_eq!(fox.total_last_week, 40);
        assert_eq!(fox.percent_last_week, 80.0);
    }

    #[test]
    fn test_empty_windows_report_zero_percent() {
        let stats = weekly_stats(&[], day(14), &CapacityConfig::default());
        assert_eq!(stats.len(), 4);
        for value in stats.values() {
            assert_eq!(*value, WeeklyStats::default());
        }
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let rows = vec![
            row("L1", "10-4G", 9_000_000_000_000_000_000, 14),
            row("L2", "10-4G", 9_000_000_000_000_000_000, 14),
        ];
        let stats = weekly_stats(&rows, day(14), &CapacityConfig::default());

        let giro = stats[&Category::Giro];
        assert_eq!(giro.total_today, i64::MAX);
        assert_eq!(giro.percent_today, 100.0);
    }

    #[test]
    fn test_raw_quantity_ignores_filled() {
        let mut line = row("L1", "10-4G", 30, 14);
        line.filled_quantity = Some(30);
        let stats = weekly_stats(&[line], day(14), &CapacityConfig::default());
        assert_eq!(stats[&Category::Giro].total_today, 30);
    }

    #[test]
    fn test_percent_rounded() {
        let rows = vec![
            row("L1", "10-4G", 1, 14),
            row("L2", "BULK-A", 2, 14),
        ];
        let stats = weekly_stats(&rows, day(14), &CapacityConfig::default());
        assert_eq!(stats[&Category::Giro].percent_today, 33.33);
        assert_eq!(stats[&Category::Bulk].percent_today, 66.67);
    }
}
