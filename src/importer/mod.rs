// ==========================================
// 包装车间产能看板 - 导入层
// ==========================================
// 职责: 销售订单导出文件 → orders 表
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod order_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{line_fingerprint, normalize_header, normalize_size_code, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
pub use order_importer::{drop_in_file_duplicates, ImportReport, OrderImporter};
