// ==========================================
// 包装车间产能看板 - 产能配置
// ==========================================
// 内容: 各包装线日产能上限 / 人工偏移 / 排除客户 / 班次起点 / 取整位数
// 默认值对齐线上看板接口
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认排除客户（食物银行捐赠账户，不占商业产能）
pub const DEFAULT_EXCLUDED_CUSTOMER: &str = "CALIFORNIA ASSOC OF FOOD BANKS";

/// 默认班次起始小时（04:00 本地时间）
pub const DEFAULT_DAY_START_HOUR: u32 = 4;

/// 默认百分比小数位
pub const DEFAULT_PERCENT_DECIMALS: u32 = 2;

/// 默认日产能上限
pub fn default_capacity_limit(category: Category) -> f64 {
    match category {
        Category::Giro => 336_000.0,
        Category::Fox => 100_000.0,
        Category::Vex => 76_000.0,
        Category::Bulk => 20_000.0,
    }
}

// ==========================================
// CapacityConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    pub capacity_limits: BTreeMap<Category, f64>,
    pub offsets: BTreeMap<Category, f64>,
    pub excluded_customers: Vec<String>,
    pub day_start_hour: u32,
    /// 当日网袋线是否按已过时间推算全天占用
    pub project_partial_day: bool,
    pub percent_decimals: u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            capacity_limits: Category::ALL
                .iter()
                .map(|c| (*c, default_capacity_limit(*c)))
                .collect(),
            offsets: BTreeMap::new(),
            excluded_customers: vec![DEFAULT_EXCLUDED_CUSTOMER.to_string()],
            day_start_hour: DEFAULT_DAY_START_HOUR,
            project_partial_day: true,
            percent_decimals: DEFAULT_PERCENT_DECIMALS,
        }
    }
}

impl CapacityConfig {
    /// 校验配置（启动时调用，失败即退出）
    pub fn validate(&self) -> ConfigResult<()> {
        for category in Category::ALL {
            let value = *self
                .capacity_limits
                .get(&category)
                .ok_or(ConfigError::MissingCapacityLimit { category })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidCapacityLimit { category, value });
            }
        }

        for (category, value) in &self.offsets {
            if !value.is_finite() {
                return Err(ConfigError::InvalidOffset {
                    category: *category,
                    value: *value,
                });
            }
        }

        if self.day_start_hour > 23 {
            return Err(ConfigError::InvalidDayStartHour(self.day_start_hour));
        }

        if self.percent_decimals > 6 {
            return Err(ConfigError::InvalidPercentDecimals(self.percent_decimals));
        }

        Ok(())
    }

    /// 日产能上限（未配置时回落到默认值）
    pub fn capacity_limit(&self, category: Category) -> f64 {
        self.capacity_limits
            .get(&category)
            .copied()
            .unwrap_or_else(|| default_capacity_limit(category))
    }

    /// 人工偏移（默认 0）
    pub fn offset(&self, category: Category) -> f64 {
        self.offsets.get(&category).copied().unwrap_or(0.0)
    }

    /// 客户是否在排除名单中（大小写不敏感的包含匹配）
    pub fn is_excluded_customer(&self, customer: Option<&str>) -> bool {
        let Some(customer) = customer else {
            return false;
        };
        let customer = customer.to_uppercase();
        self.excluded_customers
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .any(|name| customer.contains(&name.to_uppercase()))
    }

    /// 按配置的小数位取整
    pub fn round_percent(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.percent_decimals as i32);
        (value * factor).round() / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CapacityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity_limit(Category::Giro), 336_000.0);
        assert_eq!(config.offset(Category::Fox), 0.0);
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = CapacityConfig::default();
        config.capacity_limits.insert(Category::Bulk, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCapacityLimit {
                category: Category::Bulk,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_limit() {
        let mut config = CapacityConfig::default();
        config.capacity_limits.remove(&Category::Vex);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCapacityLimit {
                category: Category::Vex
            })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_offset_and_bad_hour() {
        let mut config = CapacityConfig::default();
        config.offsets.insert(Category::Giro, f64::NAN);
        assert!(config.validate().is_err());

        let config = CapacityConfig {
            day_start_hour: 24,
            ..CapacityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDayStartHour(24))
        ));
    }

    #[test]
    fn test_excluded_customer_case_insensitive() {
        let config = CapacityConfig::default();
        assert!(config.is_excluded_customer(Some("California Assoc of Food Banks")));
        assert!(config.is_excluded_customer(Some("CALIFORNIA ASSOC OF FOOD BANKS - FRESNO")));
        assert!(!config.is_excluded_customer(Some("SAFEWAY")));
        assert!(!config.is_excluded_customer(None));
    }

    #[test]
    fn test_round_percent() {
        let config = CapacityConfig::default();
        assert_eq!(config.round_percent(12.3456), 12.35);

        let config = CapacityConfig {
            percent_decimals: 1,
            ..CapacityConfig::default()
        };
        assert_eq!(config.round_percent(12.34), 12.3);
    }
}
