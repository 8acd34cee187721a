// ==========================================
// 包装车间产能看板 - 班次时间与周窗口
// ==========================================
// 当前时间一律由调用方注入（本地时间），引擎内部不读系统时钟
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// 一天的分钟数
pub const MINUTES_PER_DAY: i64 = 1440;

/// 距班次起点已过去的分钟数，取值 [0, 1440)
///
/// 起点之前（如凌晨 3 点、起点 4 点）视为上一班次的尾部
pub fn minutes_since_day_start(now: NaiveDateTime, day_start_hour: u32) -> i64 {
    let start_time = NaiveTime::from_hms_opt(day_start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let day_start = now.date().and_time(start_time);
    (now - day_start).num_minutes().rem_euclid(MINUTES_PER_DAY)
}

/// 已过时间修正系数 = 1 + 已过分钟 / 1440
///
/// 用于把当天尚未订满的袋数推算到全天口径；这是预测值，
/// 当天的 current_value 可能高于收班后的实际值
pub fn elapsed_day_modifier(now: NaiveDateTime, day_start_hour: u32) -> f64 {
    1.0 + minutes_since_day_start(now, day_start_hour) as f64 / MINUTES_PER_DAY as f64
}

// ==========================================
// DateWindow - 闭区间日期窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// 可选日期是否落在窗口内（空日期不在任何窗口内）
    pub fn contains_opt(&self, date: Option<NaiveDate>) -> bool {
        date.map(|d| self.contains(d)).unwrap_or(false)
    }
}

/// 周一到周日的本周
pub fn monday_week(today: NaiveDate) -> DateWindow {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    DateWindow::new(start, start + Duration::days(6))
}

/// 周一到周日的上周
pub fn previous_monday_week(today: NaiveDate) -> DateWindow {
    let this_week = monday_week(today);
    DateWindow::new(
        this_week.start - Duration::days(7),
        this_week.start - Duration::days(1),
    )
}

/// 周日到周六的本周（热销榜口径）
pub fn sunday_week(today: NaiveDate) -> DateWindow {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    DateWindow::new(start, start + Duration::days(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_modifier_at_day_start_is_one() {
        assert_eq!(elapsed_day_modifier(at(4, 0), 4), 1.0);
    }

    #[test]
    fn test_modifier_at_noon() {
        // 8 小时 = 480 分钟
        assert_eq!(minutes_since_day_start(at(12, 0), 4), 480);
        assert!((elapsed_day_modifier(at(12, 0), 4) - (1.0 + 480.0 / 1440.0)).abs() < 1e-12);
    }

    #[test]
    fn test_before_day_start_wraps() {
        // 03:00 距 04:00 起点为 -60 分钟 → 1380
        assert_eq!(minutes_since_day_start(at(3, 0), 4), 1380);
        let modifier = elapsed_day_modifier(at(3, 0), 4);
        assert!(modifier > 1.9 && modifier < 2.0);
    }

    #[test]
    fn test_monday_week() {
        // 2026-10-14 是周三
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let week = monday_week(today);
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(week.end, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        let last = previous_monday_week(today);
        assert_eq!(last.start, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
        assert_eq!(last.end, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
    }

    #[test]
    fn test_sunday_week() {
        let wednesday = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let week = sunday_week(wednesday);
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        assert_eq!(week.end, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());

        // 周日当天即为周起点
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 11).unwrap();
        assert_eq!(sunday_week(sunday).start, sunday);
    }

    #[test]
    fn test_window_contains_opt() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let window = DateWindow::single_day(day);
        assert!(window.contains_opt(Some(day)));
        assert!(!window.contains_opt(None));
    }
}
