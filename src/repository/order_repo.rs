// ==========================================
// 包装车间产能看板 - 订单行仓储
// ==========================================
// 红线: Repository 不含业务逻辑（分类、折算均在引擎层）
// 日期以 TEXT 存储: 日期 %Y-%m-%d，时间 %Y-%m-%d %H:%M:%S
// ==========================================

use crate::domain::order::OrderLine;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite 单条语句参数上限以内的分批大小
const LINE_ID_CHUNK: usize = 500;

const SELECT_COLUMNS: &str = r#"
    line_id, import_id, uploaded_at,
    sales_order_number, sales_order_date, ship_date, original_ship_date,
    customer, salesperson,
    commodity, style_code, size_code, grade, method,
    order_quantity, filled_quantity,
    shipped_status, flag
"#;

/// 替换导入的执行结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub deleted_by_line_id: usize,    // 按 line_id 替换掉的旧行
    pub deleted_by_upload_day: usize, // 清理的当天（及之后）旧导入行
    pub inserted: usize,
}

impl ReplaceOutcome {
    pub fn replaced_rows(&self) -> usize {
        self.deleted_by_line_id + self.deleted_by_upload_day
    }
}

/// 存储文本 → 日期；文本被外部改写成非法格式时报 CorruptValue，不静默丢弃
fn parse_date(column: usize, value: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
                tracing::warn!(column, value = %s, "订单日期列无法解析");
                rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

fn parse_datetime(column: usize, value: Option<String>) -> rusqlite::Result<Option<NaiveDateTime>> {
    value
        .map(|s| {
            NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(|e| {
                tracing::warn!(column, value = %s, "订单时间列无法解析");
                rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

fn format_date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format(DATE_FORMAT).to_string())
}

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<OrderLine> {
    Ok(OrderLine {
        line_id: row.get(0)?,
        import_id: row.get(1)?,
        uploaded_at: parse_datetime(2, row.get(2)?)?,
        sales_order_number: row.get(3)?,
        sales_order_date: parse_date(4, row.get(4)?)?,
        ship_date: parse_date(5, row.get(5)?)?,
        original_ship_date: parse_date(6, row.get(6)?)?,
        customer: row.get(7)?,
        salesperson: row.get(8)?,
        commodity: row.get(9)?,
        style_code: row.get(10)?,
        size_code: row.get(11)?,
        grade: row.get(12)?,
        method: row.get(13)?,
        order_quantity: row.get(14)?,
        filled_quantity: row.get(15)?,
        shipped_status: row.get(16)?,
        flag: row.get(17)?,
    })
}

fn insert_order(tx: &Transaction<'_>, order: &OrderLine) -> rusqlite::Result<usize> {
    tx.execute(
        r#"
        INSERT INTO orders (
            line_id, import_id, uploaded_at,
            sales_order_number, sales_order_date, ship_date, original_ship_date,
            customer, salesperson,
            commodity, style_code, size_code, grade, method,
            order_quantity, filled_quantity,
            shipped_status, flag
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        "#,
        params![
            order.line_id,
            order.import_id,
            order
                .uploaded_at
                .map(|t| t.format(DATETIME_FORMAT).to_string()),
            order.sales_order_number,
            format_date(order.sales_order_date),
            format_date(order.ship_date),
            format_date(order.original_ship_date),
            order.customer,
            order.salesperson,
            order.commodity,
            order.style_code,
            order.size_code,
            order.grade,
            order.method,
            order.order_quantity,
            order.filled_quantity,
            order.shipped_status,
            order.flag,
        ],
    )
}

// ==========================================
// OrderRepository - 订单行仓储
// ==========================================
/// 订单行仓储
/// 职责: 管理 orders 表的查询与整批替换
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    /// 创建新的 OrderRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_orders<P: rusqlite::Params>(
        &self,
        where_clause: &str,
        params: P,
    ) -> RepositoryResult<Vec<OrderLine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM orders {} ORDER BY ship_date, line_id",
            SELECT_COLUMNS, where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, map_order_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 按发货日期查询
    pub fn find_by_ship_date(&self, ship_date: NaiveDate) -> RepositoryResult<Vec<OrderLine>> {
        self.query_orders(
            "WHERE ship_date = ?1",
            params![ship_date.format(DATE_FORMAT).to_string()],
        )
    }

    /// 按发货日期区间查询（闭区间）
    pub fn find_by_ship_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<OrderLine>> {
        self.query_orders(
            "WHERE ship_date >= ?1 AND ship_date <= ?2",
            params![
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
        )
    }

    /// 全部订单行
    pub fn list_all(&self) -> RepositoryResult<Vec<OrderLine>> {
        self.query_orders("", [])
    }

    /// 订单行总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 最近一次导入序号（无数据时为 0）
    pub fn latest_import_id(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let id = conn.query_row(
            "SELECT COALESCE(MAX(import_id), 0) FROM orders",
            [],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// 查询已存在行的发货日期（line_id → ship_date）
    ///
    /// 用于新导入行继承 original_ship_date
    pub fn find_ship_dates_by_line_ids(
        &self,
        line_ids: &[String],
    ) -> RepositoryResult<HashMap<String, NaiveDate>> {
        let conn = self.get_conn()?;
        let mut result = HashMap::new();

        for chunk in line_ids.chunks(LINE_ID_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT line_id, ship_date FROM orders WHERE line_id IN ({})",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?;
            for row in rows {
                let (line_id, ship_date) = row?;
                if let Some(date) = parse_date(1, ship_date)? {
                    result.insert(line_id, date);
                }
            }
        }

        Ok(result)
    }

    /// 整批替换导入（单事务）
    ///
    /// 1) 删除 line_id 与新批次相同的旧行
    /// 2) 删除导入日（含）之后上传的旧行，同一天重复导入以最后一次为准
    /// 3) 插入新批次
    ///
    /// 任一步失败整体回滚
    pub fn replace_import(
        &self,
        orders: &[OrderLine],
        import_day: NaiveDate,
    ) -> RepositoryResult<ReplaceOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut outcome = ReplaceOutcome::default();

        let line_ids: Vec<&str> = orders.iter().map(|o| o.line_id.as_str()).collect();
        for chunk in line_ids.chunks(LINE_ID_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("DELETE FROM orders WHERE line_id IN ({})", placeholders);
            outcome.deleted_by_line_id += tx.execute(&sql, params_from_iter(chunk.iter()))?;
        }

        outcome.deleted_by_upload_day = tx.execute(
            "DELETE FROM orders WHERE uploaded_at IS NOT NULL AND date(uploaded_at) >= ?1",
            params![import_day.format(DATE_FORMAT).to_string()],
        )?;

        for order in orders {
            outcome.inserted += insert_order(&tx, order)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(outcome)
    }
}
