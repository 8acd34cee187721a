// ==========================================
// 包装车间产能看板 - 命令行入口
// ==========================================
// 子命令输出 JSON 到 stdout，日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shed_capacity::app::{get_default_db_path, AppState};
use shed_capacity::scheduler::{run_every, OrderFolderWatcher};

#[derive(Parser)]
#[command(name = "shed-capacity")]
#[command(version, about = "包装车间产能看板")]
struct Cli {
    /// 数据库路径（默认: SHED_CAPACITY_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 导入订单文件（CSV / Excel）
    Import { file: PathBuf },
    /// 当前各包装线产能
    Capacity {
        /// 计算时刻，格式 "YYYY-MM-DD HH:MM"
        #[arg(long)]
        at: Option<String>,
    },
    /// 看板报表
    Report {
        #[command(subcommand)]
        kind: ReportKind,
        /// 计算时刻，格式 "YYYY-MM-DD HH:MM"
        #[arg(long, global = true)]
        at: Option<String>,
    },
    /// 产能配置
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// 最近导入批次
    Batches {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// 监视目录，定期导入最新的 CSV
    Watch {
        dir: PathBuf,
        #[arg(long, default_value = "3600")]
        interval_secs: u64,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// 本周（周日起）各类别前五
    Top5,
    /// 今日/本周/上周完成率
    Weekly,
    /// 规格分布图数据
    Chart,
    /// 订单汇总
    Summary,
}

#[derive(Subcommand)]
enum ConfigCommands {
    Show,
    SetOffset { category: String, value: f64 },
    SetLimit { category: String, value: f64 },
    /// 覆盖排除客户名单
    SetExcluded { customers: Vec<String> },
}

fn parse_at(at: Option<&str>) -> Result<NaiveDateTime> {
    match at {
        None => Ok(Local::now().naive_local()),
        Some(text) => NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M")
            .with_context(|| format!("无法解析时间 '{}'，应为 YYYY-MM-DD HH:MM", text)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    shed_capacity::logging::init();
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("{} v{}，数据库: {}", shed_capacity::APP_NAME, shed_capacity::VERSION, db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Import { file } => {
            let report = state.import_api.import_file(&file, Local::now().naive_local())?;
            print_json(&report)?;
        }
        Commands::Capacity { at } => {
            let now = parse_at(at.as_deref())?;
            print_json(&state.dashboard_api.capacity_gauge(now)?)?;
        }
        Commands::Report { kind, at } => {
            let now = parse_at(at.as_deref())?;
            let api = &state.dashboard_api;
            match kind {
                ReportKind::Top5 => print_json(&api.top_five_this_week(now)?)?,
                ReportKind::Weekly => print_json(&api.weekly_stats(now)?)?,
                ReportKind::Chart => print_json(&api.chart_data(now)?)?,
                ReportKind::Summary => print_json(&api.orders_summary(now)?)?,
            }
        }
        Commands::Config { command } => {
            let api = &state.config_api;
            match command {
                ConfigCommands::Show => print_json(&api.effective_config()?)?,
                ConfigCommands::SetOffset { category, value } => {
                    print_json(&api.set_offset(&category, value)?)?
                }
                ConfigCommands::SetLimit { category, value } => {
                    print_json(&api.set_capacity_limit(&category, value)?)?
                }
                ConfigCommands::SetExcluded { customers } => {
                    print_json(&api.set_excluded_customers(&customers)?)?
                }
            }
        }
        Commands::Batches { limit } => {
            print_json(&state.import_api.list_recent_batches(limit)?)?;
        }
        Commands::Watch { dir, interval_secs } => {
            anyhow::ensure!(interval_secs > 0, "--interval-secs 必须大于 0");
            let watcher = Arc::new(OrderFolderWatcher::new(dir, state.import_api.clone()));
            let handle = run_every(watcher, Duration::from_secs(interval_secs));

            tokio::signal::ctrl_c().await?;
            tracing::info!("收到中断信号，停止目录监视");
            handle.abort();
        }
    }

    Ok(())
}
