// ==========================================
// 包装车间产能看板 - 字段映射器
// ==========================================
// 职责: 表头规范化 + 源字段 → OrderLine + 类型转换 + 行指纹
// 表头: 小写、空格 → 下划线；*_id 别名映射到标准名
// ==========================================

use crate::domain::order::{OrderLine, DAY_OF_ORDER_FLAG};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// 标准列名
pub mod columns {
    pub const SALES_ORDER_NUMBER: &str = "sales_order_number";
    pub const SALES_ORDER_DATE: &str = "sales_order_date";
    pub const SHIP_DATE: &str = "ship_date";
    pub const CUSTOMER: &str = "customer";
    pub const SALESPERSON: &str = "salesperson";
    pub const COMMODITY: &str = "commodity";
    pub const STYLE: &str = "style";
    pub const SIZE: &str = "size";
    pub const GRADE: &str = "grade";
    pub const METHOD: &str = "method";
    pub const ORDER_QUANTITY: &str = "order_quantity";
    pub const FILLED_QUANTITY: &str = "filled_quantity";
    pub const SHIPPED_STATUS: &str = "shipped_status";

    /// 缺失即整批失败的列
    pub const REQUIRED: [&str; 3] = [STYLE, ORDER_QUANTITY, SHIP_DATE];
}

/// 表头规范化: 小写、空格 → 下划线、别名合并
pub fn normalize_header(header: &str) -> String {
    let normalized = header.trim().to_lowercase().replace(' ', "_");
    match normalized.as_str() {
        "commodity_id" => columns::COMMODITY.to_string(),
        "style_id" | "style_code" => columns::STYLE.to_string(),
        "size_id" | "size_code" => columns::SIZE.to_string(),
        "grade_id" => columns::GRADE.to_string(),
        "method_id" => columns::METHOD.to_string(),
        _ => normalized,
    }
}

/// 尺码码规范化: 去掉 ".0" 尾巴，左侧补零到 3 位
pub fn normalize_size_code(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_fraction = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    format!("{:0>3}", without_fraction)
}

/// 订单行指纹: SHA-256(订单号_品类_规格_数量_尺码_等级)
pub fn line_fingerprint(
    sales_order_number: Option<&str>,
    commodity: Option<&str>,
    style: Option<&str>,
    order_quantity: i64,
    size: Option<&str>,
    grade: Option<&str>,
) -> String {
    let key = format!(
        "{}_{}_{}_{}_{}_{}",
        sales_order_number.unwrap_or(""),
        commodity.unwrap_or(""),
        style.unwrap_or(""),
        order_quantity,
        size.unwrap_or(""),
        grade.unwrap_or(""),
    );
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

/// 日期解析: YYYY-MM-DD / MM/DD/YYYY / YYYYMMDD（允许带时间尾巴）
pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(value);
    ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// 整数形式的浮点数量上限（2^53，超出后 f64 不再精确表示整数）
const MAX_EXACT_FLOAT_QUANTITY: f64 = 9_007_199_254_740_992.0;

/// 数量解析: "12" / "12.0" / "1,200"
///
/// 负数、小数部分非零、超出精确整数范围均视为错误
pub fn parse_quantity_value(value: &str) -> Option<i64> {
    let cleaned = value.trim().replace(',', "");
    if let Ok(n) = cleaned.parse::<i64>() {
        return (n >= 0).then_some(n);
    }
    let f = cleaned.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && (0.0..=MAX_EXACT_FLOAT_QUANTITY).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldMapper;

impl FieldMapper {
    /// 表头规范化后的行
    pub fn normalize_record(&self, row: RawRecord) -> HashMap<String, String> {
        row.into_iter()
            .map(|(k, v)| (normalize_header(&k), v))
            .collect()
    }

    /// 检查必需列（基于规范化后的表头）
    pub fn check_required_columns<'a>(
        &self,
        headers: impl IntoIterator<Item = &'a String>,
    ) -> ImportResult<()> {
        let present: Vec<String> = headers.into_iter().map(|h| normalize_header(h)).collect();
        for required in columns::REQUIRED {
            if !present.iter().any(|h| h == required) {
                return Err(ImportError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }

    /// 规范化后的行 → OrderLine
    ///
    /// import_id / uploaded_at / original_ship_date 由导入器补齐
    pub fn map_to_order_line(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<OrderLine> {
        let sales_order_number = self.get_string(row, columns::SALES_ORDER_NUMBER);
        let commodity = self.get_string(row, columns::COMMODITY);
        let style_code = self.get_string(row, columns::STYLE);
        let size_code = self
            .get_string(row, columns::SIZE)
            .map(|s| normalize_size_code(&s));
        let grade = self.get_string(row, columns::GRADE);

        let order_quantity = self
            .parse_quantity(row, columns::ORDER_QUANTITY, row_number)?
            .unwrap_or(0);
        let filled_quantity = self.parse_quantity(row, columns::FILLED_QUANTITY, row_number)?;

        let sales_order_date = self.parse_date(row, columns::SALES_ORDER_DATE, row_number)?;
        let ship_date = self.parse_date(row, columns::SHIP_DATE, row_number)?;

        let line_id = line_fingerprint(
            sales_order_number.as_deref(),
            commodity.as_deref(),
            style_code.as_deref(),
            order_quantity,
            size_code.as_deref(),
            grade.as_deref(),
        );

        let flag = match (sales_order_date, ship_date) {
            (Some(ordered), Some(ship)) if ordered == ship => Some(DAY_OF_ORDER_FLAG.to_string()),
            _ => None,
        };

        Ok(OrderLine {
            line_id,
            import_id: None,
            uploaded_at: None,
            sales_order_number,
            sales_order_date,
            ship_date,
            original_ship_date: None,
            customer: self.get_string(row, columns::CUSTOMER),
            salesperson: self.get_string(row, columns::SALESPERSON),
            commodity,
            style_code,
            size_code,
            grade,
            method: self.get_string(row, columns::METHOD),
            order_quantity,
            filled_quantity,
            shipped_status: self.get_string(row, columns::SHIPPED_STATUS),
            flag,
        })
    }

    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        row.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    fn parse_quantity(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<i64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => parse_quantity_value(&value).map(Some).ok_or_else(|| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为整数数量: {}", value),
                }
            }),
        }
    }

    fn parse_date(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => parse_date_value(&value).map(Some).ok_or_else(|| {
                ImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value,
                }
            }),
        }
    }
}
