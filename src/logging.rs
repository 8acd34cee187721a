// ==========================================
// 包装车间产能看板 - 日志初始化
// ==========================================
// stdout 留给子命令的 JSON 输出，日志一律写 stderr
// RUST_LOG 控制过滤，SHED_CAPACITY_LOG_FORMAT=json 切换为结构化行
// 例: RUST_LOG=shed_capacity::importer=debug,info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";
const FORMAT_ENV: &str = "SHED_CAPACITY_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 未设置或无法识别时退回文本格式
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(std::env::var(FORMAT_ENV).ok().as_deref())
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// CLI 启动时调用一次
pub fn init() {
    let builder = fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_writer(std::io::stderr);

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_line_number(true).init(),
    }
}
