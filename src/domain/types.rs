// ==========================================
// 包装车间产能看板 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 包装类别 (Category)
// ==========================================
// 每条订单行在一次聚合中恰好归属一个类别
// Bulk 为兜底类别（未命中任何网袋线规则）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Giro, // Giro 网袋线
    Fox,  // Fox 网袋线
    Vex,  // Vexar 网袋线
    Bulk, // 纸箱/散装箱
}

impl Category {
    /// 固定顺序的全部类别
    pub const ALL: [Category; 4] = [Category::Giro, Category::Fox, Category::Vex, Category::Bulk];

    /// 网袋线类别（按袋数计产能）
    pub const BAGGED: [Category; 3] = [Category::Giro, Category::Fox, Category::Vex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Giro => "giro",
            Category::Fox => "fox",
            Category::Vex => "vex",
            Category::Bulk => "bulk",
        }
    }

    /// 是否为网袋线类别
    pub fn is_bagged(&self) -> bool {
        !matches!(self, Category::Bulk)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// 解析类别名（大小写不敏感，vexar 视为 vex）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "giro" => Ok(Category::Giro),
            "fox" => Ok(Category::Fox),
            "vex" | "vexar" => Ok(Category::Vex),
            "bulk" => Ok(Category::Bulk),
            other => Err(format!("未知包装类别: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("GIRO".parse::<Category>().unwrap(), Category::Giro);
        assert_eq!("vexar".parse::<Category>().unwrap(), Category::Vex);
        assert_eq!(" bulk ".parse::<Category>().unwrap(), Category::Bulk);
        assert!("carton".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Fox).unwrap();
        assert_eq!(json, "\"fox\"");
    }
}
