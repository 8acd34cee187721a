// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、应用状态、订单 CSV 生成
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use shed_capacity::app::AppState;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 订单导出 CSV 表头（与上游导出一致，含空格与大小写）
pub const CSV_HEADER: &str = "Sales Order Number,Sales Order Date,Ship Date,Customer,Commodity,Style,Size,Grade,Method,Order Quantity,Filled Quantity";

/// 创建临时测试数据库并装配 AppState
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - AppState: 已建表、配置为默认值
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::new(db_path)?;
    Ok((temp_file, state))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

// ==========================================
// OrderRow - CSV 行构造器
// ==========================================
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub sales_order_number: String,
    pub sales_order_date: String,
    pub ship_date: String,
    pub customer: String,
    pub commodity: String,
    pub style: String,
    pub size: String,
    pub grade: String,
    pub method: String,
    pub order_quantity: String,
    pub filled_quantity: String,
}

impl OrderRow {
    pub fn new(order_no: &str, style: &str, quantity: i64, ship_date: NaiveDate) -> Self {
        Self {
            sales_order_number: order_no.to_string(),
            sales_order_date: String::new(),
            ship_date: ship_date.format("%Y-%m-%d").to_string(),
            customer: "FRESH MARKET".to_string(),
            commodity: "ONIONS".to_string(),
            style: style.to_string(),
            size: String::new(),
            grade: String::new(),
            method: String::new(),
            order_quantity: quantity.to_string(),
            filled_quantity: String::new(),
        }
    }

    pub fn customer(mut self, customer: &str) -> Self {
        self.customer = customer.to_string();
        self
    }

    pub fn commodity(mut self, commodity: &str) -> Self {
        self.commodity = commodity.to_string();
        self
    }

    pub fn grade(mut self, grade: &str) -> Self {
        self.grade = grade.to_string();
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = size.to_string();
        self
    }

    pub fn filled(mut self, filled: i64) -> Self {
        self.filled_quantity = filled.to_string();
        self
    }

    pub fn ordered_on(mut self, day: NaiveDate) -> Self {
        self.sales_order_date = day.format("%m/%d/%Y").to_string();
        self
    }

    pub fn raw_quantity(mut self, quantity: &str) -> Self {
        self.order_quantity = quantity.to_string();
        self
    }

    fn to_csv_line(&self) -> String {
        [
            &self.sales_order_number,
            &self.sales_order_date,
            &self.ship_date,
            &self.customer,
            &self.commodity,
            &self.style,
            &self.size,
            &self.grade,
            &self.method,
            &self.order_quantity,
            &self.filled_quantity,
        ]
        .iter()
        .map(|field| csv_quote(field))
        .collect::<Vec<_>>()
        .join(",")
    }
}

fn csv_quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// 在目录中写出订单 CSV
pub fn write_orders_csv(dir: &Path, file_name: &str, rows: &[OrderRow]) -> PathBuf {
    let mut content = String::from(CSV_HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(&row.to_csv_line());
        content.push('\n');
    }

    let path = dir.join(file_name);
    std::fs::write(&path, content).unwrap();
    path
}
