// ==========================================
// 包装车间产能看板 - 看板 API
// ==========================================
// 职责: 按时间窗口从仓储取订单行，调用纯引擎计算
// 约束: 当前时间由调用方注入，本层不读系统时钟
// 配置: 每次调用从 ConfigManager 读取，配置改动即时生效
// ==========================================

use crate::api::error::ApiResult;
use crate::config::{CapacityConfig, ConfigManager};
use crate::domain::report::{OrdersSummary, SizeBucket, TopSeller, WeeklyStats};
use crate::domain::types::Category;
use crate::engine::{
    monday_week, orders_summary, previous_monday_week, size_histogram, sunday_week, top_sellers,
    weekly_stats, CapacityAggregator, CapacityReport,
};
use crate::repository::OrderRepository;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::sync::Arc;

// ==========================================
// CapacityDashboardApi - 看板 API
// ==========================================
pub struct CapacityDashboardApi {
    order_repo: Arc<OrderRepository>,
    config_manager: Arc<ConfigManager>,
    aggregator: CapacityAggregator,
}

impl CapacityDashboardApi {
    pub fn new(order_repo: Arc<OrderRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            order_repo,
            config_manager,
            aggregator: CapacityAggregator::new(),
        }
    }

    fn load_config(&self) -> ApiResult<CapacityConfig> {
        Ok(self.config_manager.load_capacity_config()?)
    }

    /// 今日产能仪表（使用已保存的偏移）
    ///
    /// # 返回
    /// - `capacities`: giro/fox/vex/bulk 各自 {currentValue, capacityLimit, percentage}
    /// - 当天无订单时全部为 0（不视为错误）
    pub fn capacity_gauge(&self, now: NaiveDateTime) -> ApiResult<CapacityReport> {
        let config = self.load_config()?;
        let rows = self.order_repo.find_by_ship_date(now.date())?;
        Ok(self.aggregator.aggregate(&rows, now.date(), now, &config))
    }

    /// 今日产能仪表（调用方指定偏移，未指定的类别按 0）
    pub fn capacity_gauge_with_offsets(
        &self,
        now: NaiveDateTime,
        offsets: &BTreeMap<Category, f64>,
    ) -> ApiResult<CapacityReport> {
        let config = self.load_config()?;
        let rows = self.order_repo.find_by_ship_date(now.date())?;
        Ok(self
            .aggregator
            .aggregate_with_offsets(&rows, now.date(), now, &config, offsets))
    }

    /// 本周（周日~周六）热销 Top5
    pub fn top_five_this_week(
        &self,
        now: NaiveDateTime,
    ) -> ApiResult<BTreeMap<Category, Vec<TopSeller>>> {
        let config = self.load_config()?;
        let window = sunday_week(now.date());
        let rows = self
            .order_repo
            .find_by_ship_date_range(window.start, window.end)?;
        Ok(top_sellers(&rows, window, &config))
    }

    /// 今天 / 本周 / 上周统计（周一~周日）
    pub fn weekly_stats(&self, now: NaiveDateTime) -> ApiResult<BTreeMap<Category, WeeklyStats>> {
        let config = self.load_config()?;
        let today = now.date();
        let rows = self.order_repo.find_by_ship_date_range(
            previous_monday_week(today).start,
            monday_week(today).end,
        )?;
        Ok(weekly_stats(&rows, today, &config))
    }

    /// 本周（周一~周日）尺码分布
    pub fn chart_data(&self, now: NaiveDateTime) -> ApiResult<BTreeMap<Category, Vec<SizeBucket>>> {
        let config = self.load_config()?;
        let window = monday_week(now.date());
        let rows = self
            .order_repo
            .find_by_ship_date_range(window.start, window.end)?;
        Ok(size_histogram(&rows, window, &config))
    }

    /// 订单概览（整季数据）
    pub fn orders_summary(&self, now: NaiveDateTime) -> ApiResult<OrdersSummary> {
        let config = self.load_config()?;
        let rows = self.order_repo.list_all()?;
        Ok(orders_summary(&rows, now.date(), &config))
    }
}
