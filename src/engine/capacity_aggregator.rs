// ==========================================
// 包装车间产能看板 - 日产能聚合引擎
// ==========================================
// 输入: 订单行 + 目标日期 + 当前本地时间 + 产能配置
// 输出: 各类别 {current_value, capacity_limit, percentage}
// ==========================================
// 口径:
// - 排除名单内客户不计入
// - 仅统计 ship_date == day 的行
// - Giro/Fox/Vex: Σ 总袋数 ×（当天时）已过时间修正系数
// - Bulk: Σ 折算产能（系数 × 未发数量）
// - percentage = current / limit × 100 - offset
// 无状态、幂等: 同一行集 + 同一时刻 → 同一结果
// ==========================================

use crate::config::CapacityConfig;
use crate::domain::capacity::CapacitySnapshot;
use crate::domain::order::OrderLine;
use crate::domain::types::Category;
use crate::engine::bulk_discount::computed_capacity;
use crate::engine::calendar::elapsed_day_modifier;
use crate::engine::classifier::classify_style;
use crate::engine::extractor::{remaining_quantity, total_bags};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// 单日产能聚合结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityReport {
    pub day: NaiveDate,
    pub elapsed_modifier: f64,
    pub row_count: usize,
    pub capacities: BTreeMap<Category, CapacitySnapshot>,
}

impl CapacityReport {
    pub fn snapshot(&self, category: Category) -> Option<&CapacitySnapshot> {
        self.capacities.get(&category)
    }

    pub fn current_value(&self, category: Category) -> f64 {
        self.snapshot(category).map(|s| s.current_value).unwrap_or(0.0)
    }
}

/// 百分比，分母为 0 时返回 0（不产生 NaN/Infinity）
pub fn safe_percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 || !whole.is_finite() {
        return 0.0;
    }
    part / whole * 100.0
}

// ==========================================
// CapacityAggregator - 日产能聚合引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityAggregator {
    // 无状态引擎，不需要注入依赖
}

impl CapacityAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合单日产能（使用配置中的偏移）
    pub fn aggregate(
        &self,
        rows: &[OrderLine],
        day: NaiveDate,
        now: NaiveDateTime,
        config: &CapacityConfig,
    ) -> CapacityReport {
        self.aggregate_with_offsets(rows, day, now, config, &config.offsets)
    }

    /// 聚合单日产能（调用方指定偏移，缺省类别按 0）
    ///
    /// # 参数
    /// - `rows`: 订单行（可包含其他日期，内部按 day 过滤）
    /// - `day`: 目标发货日期
    /// - `now`: 当前本地时间（仅在 day 为今天时用于推算）
    /// - `offsets`: 各类别人工偏移（百分点）
    #[instrument(skip(self, rows, config, offsets), fields(day = %day, rows = rows.len()))]
    pub fn aggregate_with_offsets(
        &self,
        rows: &[OrderLine],
        day: NaiveDate,
        now: NaiveDateTime,
        config: &CapacityConfig,
        offsets: &BTreeMap<Category, f64>,
    ) -> CapacityReport {
        let elapsed_modifier = if config.project_partial_day && day == now.date() {
            elapsed_day_modifier(now, config.day_start_hour)
        } else {
            1.0
        };

        let mut totals: BTreeMap<Category, f64> =
            Category::ALL.iter().map(|c| (*c, 0.0)).collect();
        let mut row_count = 0usize;

        for row in rows
            .iter()
            .filter(|r| r.ship_date == Some(day))
            .filter(|r| !config.is_excluded_customer(r.customer.as_deref()))
        {
            row_count += 1;
            let category = classify_style(row.style_code.as_deref());
            let quantity = remaining_quantity(row);

            let value = if category.is_bagged() {
                total_bags(row.style_code.as_deref(), quantity)
            } else {
                computed_capacity(row, quantity)
            };

            *totals.entry(category).or_insert(0.0) += value;
        }

        let capacities = totals
            .into_iter()
            .map(|(category, total)| {
                let current_value = if category.is_bagged() {
                    total * elapsed_modifier
                } else {
                    total
                };
                let capacity_limit = config.capacity_limit(category);
                let offset = offsets.get(&category).copied().unwrap_or(0.0);
                let percentage =
                    config.round_percent(safe_percent(current_value, capacity_limit) - offset);

                tracing::debug!(%category, current_value, capacity_limit, percentage, "类别产能");

                (
                    category,
                    CapacitySnapshot {
                        current_value,
                        capacity_limit,
                        percentage,
                    },
                )
            })
            .collect();

        tracing::info!(row_count, elapsed_modifier, "单日产能聚合完成");

        CapacityReport {
            day,
            elapsed_modifier,
            row_count,
            capacities,
        }
    }
}
