// ==========================================
// 包装车间产能看板 - 看板明细引擎
// ==========================================
// 1) 本周热销 Top5: 客户 + 品类 + 规格 分组，按原始订单数量降序
// 2) 尺码分布: 网袋线按尺码汇总总袋数，Bulk 按规格码汇总未发数量
// 窗口由调用方给出，引擎不读系统时钟
// ==========================================

use crate::config::CapacityConfig;
use crate::domain::order::OrderLine;
use crate::domain::report::{SizeBucket, TopSeller};
use crate::domain::types::Category;
use crate::engine::calendar::DateWindow;
use crate::engine::classifier::classify_style;
use crate::engine::extractor::{extract_count_size, remaining_quantity, total_bags};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

/// 每个类别保留的热销条目数
pub const TOP_SELLER_LIMIT: usize = 5;

/// 结果表: 四个类别全部在列（无数据时为空列表）
fn empty_by_category<T>() -> BTreeMap<Category, Vec<T>> {
    Category::ALL.iter().map(|c| (*c, Vec::new())).collect()
}

/// 窗口内、未被排除的订单行
fn rows_in_window<'a>(
    rows: &'a [OrderLine],
    window: DateWindow,
    config: &'a CapacityConfig,
) -> impl Iterator<Item = &'a OrderLine> + 'a {
    rows.iter()
        .filter(move |r| window.contains_opt(r.ship_date))
        .filter(move |r| !config.is_excluded_customer(r.customer.as_deref()))
}

/// 产品名 = 客户 品类 规格（缺失部分跳过）
fn product_name(row: &OrderLine) -> String {
    [
        row.customer.as_deref(),
        row.commodity.as_deref(),
        row.style_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

// ==========================================
// 本周热销 Top5
// ==========================================

/// 各类别热销前 5
///
/// 数量口径为原始 order_quantity（不扣已发、不折算）
#[instrument(skip(rows, config), fields(start = %window.start, end = %window.end, rows = rows.len()))]
pub fn top_sellers(
    rows: &[OrderLine],
    window: DateWindow,
    config: &CapacityConfig,
) -> BTreeMap<Category, Vec<TopSeller>> {
    // (customer, commodity, style) → 合计
    let mut groups: HashMap<(Option<&str>, Option<&str>, Option<&str>), (String, i64)> =
        HashMap::new();

    for row in rows_in_window(rows, window, config) {
        let key = (
            row.customer.as_deref(),
            row.commodity.as_deref(),
            row.style_code.as_deref(),
        );
        let entry = groups
            .entry(key)
            .or_insert_with(|| (product_name(row), 0));
        entry.1 = entry.1.saturating_add(row.order_quantity);
    }

    let mut result = empty_by_category();
    for ((_, _, style), (name, total)) in groups {
        let category = classify_style(style);
        result.entry(category).or_default().push(TopSeller {
            product_name: name,
            style: style.map(|s| s.to_string()),
            total_order_quantity: total,
        });
    }

    for sellers in result.values_mut() {
        sellers.sort_by(|a, b| {
            b.total_order_quantity
                .cmp(&a.total_order_quantity)
                .then_with(|| a.product_name.cmp(&b.product_name))
                .then_with(|| a.style.cmp(&b.style))
        });
        sellers.truncate(TOP_SELLER_LIMIT);
    }

    result
}

// ==========================================
// 尺码分布
// ==========================================

/// 各类别尺码分布
///
/// - Giro/Fox/Vex: 按尺码 "<n>lb" 汇总总袋数，无法解析的规格跳过，尺码升序
/// - Bulk: 按规格码汇总未发数量，空规格跳过，规格码升序
#[instrument(skip(rows, config), fields(start = %window.start, end = %window.end, rows = rows.len()))]
pub fn size_histogram(
    rows: &[OrderLine],
    window: DateWindow,
    config: &CapacityConfig,
) -> BTreeMap<Category, Vec<SizeBucket>> {
    let mut bagged: BTreeMap<Category, BTreeMap<u32, f64>> = BTreeMap::new();
    let mut bulk: BTreeMap<String, f64> = BTreeMap::new();

    for row in rows_in_window(rows, window, config) {
        let style = row.style_code.as_deref();
        let category = classify_style(style);
        let quantity = remaining_quantity(row);

        if category.is_bagged() {
            let Some(count_size) = extract_count_size(style) else {
                continue;
            };
            *bagged
                .entry(category)
                .or_default()
                .entry(count_size.size)
                .or_insert(0.0) += total_bags(style, quantity);
        } else {
            let Some(code) = style.map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            *bulk.entry(code.to_string()).or_insert(0.0) += quantity;
        }
    }

    let mut result = empty_by_category();
    for (category, sizes) in bagged {
        result.insert(
            category,
            sizes
                .into_iter()
                .map(|(size, total_quantity)| SizeBucket {
                    size: format!("{}lb", size),
                    total_quantity,
                })
                .collect(),
        );
    }
    result.insert(
        Category::Bulk,
        bulk.into_iter()
            .map(|(size, total_quantity)| SizeBucket {
                size,
                total_quantity,
            })
            .collect(),
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXCLUDED_CUSTOMER;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn row(id: &str, customer: &str, style: &str, qty: i64, ship: u32) -> OrderLine {
        let mut line = OrderLine::new(id, Some(style), qty);
        line.customer = Some(customer.to_string());
        line.commodity = Some("ORANGE".to_string());
        line.ship_date = Some(day(ship));
        line
    }

    fn week() -> DateWindow {
        DateWindow::new(day(11), day(17))
    }

    #[test]
    fn test_top_sellers_groups_and_sorts() {
        let rows = vec![
            row("L1", "ACME", "10-4G", 100, 12),
            row("L2", "ACME", "10-4G", 50, 13),
            row("L3", "BETA", "10-4G", 120, 12),
            row("L4", "ACME", "BULK-A", 10, 12),
        ];
        let result = top_sellers(&rows, week(), &CapacityConfig::default());

        let giro = &result[&Category::Giro];
        assert_eq!(giro.len(), 2);
        assert_eq!(giro[0].product_name, "ACME ORANGE 10-4G");
        assert_eq!(giro[0].total_order_quantity, 150);
        assert_eq!(giro[1].total_order_quantity, 120);

        assert_eq!(result[&Category::Bulk].len(), 1);
        assert!(result[&Category::Fox].is_empty());
        assert!(result[&Category::Vex].is_empty());
    }

    #[test]
    fn test_top_sellers_total_saturates() {
        let rows = vec![
            row("L1", "ACME", "10-4G", i64::MAX, 12),
            row("L2", "ACME", "10-4G", 10, 13),
        ];
        let result = top_sellers(&rows, week(), &CapacityConfig::default());
        assert_eq!(result[&Category::Giro][0].total_order_quantity, i64::MAX);
    }

    #[test]
    fn test_top_sellers_limit_and_tie_break() {
        let rows: Vec<OrderLine> = ["F", "E", "D", "C", "B", "A"]
            .iter()
            .enumerate()
            .map(|(i, c)| row(&format!("L{}", i), c, "FOX 8-5", 10, 12))
            .collect();
        let result = top_sellers(&rows, week(), &CapacityConfig::default());

        let fox = &result[&Category::Fox];
        assert_eq!(fox.len(), TOP_SELLER_LIMIT);
        assert!(fox[0].product_name.starts_with("A "));
        assert!(fox[4].product_name.starts_with("E "));
    }

    #[test]
    fn test_top_sellers_window_and_exclusion() {
        let rows = vec![
            row("L1", "ACME", "10-4G", 100, 10),
            row("L2", DEFAULT_EXCLUDED_CUSTOMER, "10-4G", 500, 12),
        ];
        let result = top_sellers(&rows, week(), &CapacityConfig::default());
        assert!(result[&Category::Giro].is_empty());
    }

    #[test]
    fn test_product_name_skips_missing_parts() {
        let mut line = OrderLine::new("L1", Some("BULK-A"), 5);
        line.customer = Some("ACME".to_string());
        assert_eq!(product_name(&line), "ACME BULK-A");
    }

    #[test]
    fn test_size_histogram_bagged_by_size() {
        let mut partially = row("L3", "ACME", "8-5G", 10, 13);
        partially.filled_quantity = Some(4);
        let rows = vec![
            row("L1", "ACME", "10-4G", 100, 12),
            row("L2", "BETA", "15-4G", 10, 12),
            partially,
            row("L4", "ACME", "GIRO MIX", 10, 12),
        ];
        let result = size_histogram(&rows, week(), &CapacityConfig::default());

        let giro = &result[&Category::Giro];
        assert_eq!(
            giro,
            &vec![
                SizeBucket {
                    size: "4lb".to_string(),
                    total_quantity: 1150.0
                },
                SizeBucket {
                    size: "5lb".to_string(),
                    total_quantity: 48.0
                },
            ]
        );
    }

    #[test]
    fn test_size_histogram_bulk_by_style() {
        let mut blank = row("L3", "ACME", "", 10, 12);
        blank.style_code = None;
        let rows = vec![
            row("L1", "ACME", "BULK-A", 100, 12),
            row("L2", "ACME", "BULK-A", 20, 14),
            row("L4", "ACME", "5# CARTON", 7, 12),
            blank,
        ];
        let result = size_histogram(&rows, week(), &CapacityConfig::default());

        let bulk = &result[&Category::Bulk];
        assert_eq!(bulk.len(), 2);
        assert_eq!(bulk[0].size, "5# CARTON");
        assert_eq!(bulk[0].total_quantity, 7.0);
        assert_eq!(bulk[1].size, "BULK-A");
        assert_eq!(bulk[1].total_quantity, 120.0);
    }
}
