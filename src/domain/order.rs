// ==========================================
// 包装车间产能看板 - 订单行领域模型
// ==========================================
// 来源: 销售订单导出 CSV（每行一个订单明细）
// 主键: line_id = 订单号/品类/规格/数量/尺码/等级 的指纹
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// OrderLine - 订单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    // ===== 主键 =====
    pub line_id: String, // 订单行指纹（上游去重用）

    // ===== 导入元信息 =====
    pub import_id: Option<i64>,              // 导入批次序号
    pub uploaded_at: Option<NaiveDateTime>,  // 导入时间

    // ===== 订单信息 =====
    pub sales_order_number: Option<String>,
    pub sales_order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub original_ship_date: Option<NaiveDate>, // 首次导入时的发货日期
    pub customer: Option<String>,
    pub salesperson: Option<String>,

    // ===== 产品维度 =====
    pub commodity: Option<String>,
    pub style_code: Option<String>, // 规格码，如 "10-4G"、"150/4"、"5# CARTON"
    pub size_code: Option<String>,
    pub grade: Option<String>,
    pub method: Option<String>,

    // ===== 数量 =====
    pub order_quantity: i64,
    pub filled_quantity: Option<i64>,

    // ===== 状态 =====
    pub shipped_status: Option<String>,
    pub flag: Option<String>, // day_of_order: 下单当天发货
}

impl OrderLine {
    /// 构造只含关键字段的订单行，其余字段为空
    pub fn new(line_id: impl Into<String>, style_code: Option<&str>, order_quantity: i64) -> Self {
        Self {
            line_id: line_id.into(),
            import_id: None,
            uploaded_at: None,
            sales_order_number: None,
            sales_order_date: None,
            ship_date: None,
            original_ship_date: None,
            customer: None,
            salesperson: None,
            commodity: None,
            style_code: style_code.map(|s| s.to_string()),
            size_code: None,
            grade: None,
            method: None,
            order_quantity,
            filled_quantity: None,
            shipped_status: None,
            flag: None,
        }
    }

    /// 未发数量（原始差值，可能为负）
    ///
    /// filled_quantity 存在时以 order - filled 为聚合基数，否则为 order_quantity
    /// 差值溢出时饱和
    pub fn raw_remaining_quantity(&self) -> i64 {
        match self.filled_quantity {
            Some(filled) => self.order_quantity.saturating_sub(filled),
            None => self.order_quantity,
        }
    }

    /// 是否下单当天发货
    pub fn is_day_of_order(&self) -> bool {
        self.flag.as_deref() == Some(DAY_OF_ORDER_FLAG)
    }
}

/// 下单当天发货标记
pub const DAY_OF_ORDER_FLAG: &str = "day_of_order";

// ==========================================
// ImportBatch - 导入批次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,          // 批次 ID（UUID）
    pub import_id: i64,            // 递增导入序号（写入 orders.import_id）
    pub file_name: Option<String>, // 源文件名
    pub file_path: Option<String>, // 源文件路径
    pub total_rows: i64,           // 文件数据行数
    pub success_rows: i64,         // 写入行数
    pub duplicate_rows: i64,       // 文件内重复指纹被丢弃的行数
    pub replaced_rows: i64,        // 被替换/清理的旧行数
    pub imported_at: NaiveDateTime,
    pub elapsed_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_quantity_without_filled() {
        let line = OrderLine::new("L1", Some("10-4G"), 100);
        assert_eq!(line.raw_remaining_quantity(), 100);
    }

    #[test]
    fn test_remaining_quantity_saturates() {
        let mut line = OrderLine::new("L1", Some("10-4G"), i64::MAX);
        line.filled_quantity = Some(i64::MIN);
        assert_eq!(line.raw_remaining_quantity(), i64::MAX);
    }

    #[test]
    fn test_remaining_quantity_overfilled_is_negative() {
        let mut line = OrderLine::new("L1", Some("10-4G"), 10);
        line.filled_quantity = Some(12);
        assert_eq!(line.raw_remaining_quantity(), -2);
    }
}
