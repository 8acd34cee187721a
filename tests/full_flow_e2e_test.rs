// ==========================================
// 端到端流程测试
// ==========================================
// 导入 → 仪表 → 调整配置 → 重新打开数据库
// ==========================================

use shed_capacity::app::AppState;
use shed_capacity::Category;
use tempfile::TempDir;

mod test_helpers;
use test_helpers::{at, create_test_state, date, write_orders_csv, OrderRow};

#[test]
fn test_import_gauge_configure_reopen() {
    let (db, state) = create_test_state().unwrap();
    let dir = TempDir::new().unwrap();
    let today = date(2026, 10, 14);

    let file = write_orders_csv(
        dir.path(),
        "orders.csv",
        &[
            OrderRow::new("SO-1", "10-4G", 100, today),
            OrderRow::new("SO-2", "BULK-A", 50, today)
                .customer("BIG BOX")
                .grade("CHOICE")
                .method("manual"),
            OrderRow::new("SO-3", "5# CARTON", 100, today).filled(50),
        ],
    );
    let report = state
        .import_api
        .import_file(&file, at(2026, 10, 14, 4, 0))
        .unwrap();
    assert_eq!(report.imported_rows, 3);

    let gauge = state
        .dashboard_api
        .capacity_gauge(at(2026, 10, 14, 4, 0))
        .unwrap();
    assert_eq!(gauge.current_value(Category::Giro), 1000.0);
    // CHOICE 0.7 × 50 + 小纸箱 0.2 × (100 - 50)
    assert_eq!(gauge.current_value(Category::Bulk), 45.0);

    // 上限调到 2000 → 50%
    state.config_api.set_capacity_limit("giro", 2000.0).unwrap();
    // 排除 BIG BOX → 只剩小纸箱
    state
        .config_api
        .set_excluded_customers(&["BIG BOX".to_string()])
        .unwrap();

    let gauge = state
        .dashboard_api
        .capacity_gauge(at(2026, 10, 14, 4, 0))
        .unwrap();
    assert_eq!(gauge.snapshot(Category::Giro).unwrap().percentage, 50.0);
    assert_eq!(gauge.current_value(Category::Bulk), 10.0);

    // 重新打开: 订单与配置均已持久化
    let db_path = state.db_path.clone();
    drop(state);
    let reopened = AppState::new(db_path).unwrap();
    assert_eq!(reopened.order_repo.count().unwrap(), 3);

    let config = reopened.config_api.effective_config().unwrap();
    assert_eq!(config.capacity_limit(Category::Giro), 2000.0);
    assert!(config.is_excluded_customer(Some("BIG BOX")));

    drop(db);
}

#[test]
fn test_config_snapshot_restore() {
    let (_db, state) = create_test_state().unwrap();

    state.config_api.set_offset("fox", 3.0).unwrap();
    let snapshot = state.config_api.get_config_snapshot().unwrap();

    state.config_api.set_offset("fox", 9.0).unwrap();
    let restored = state.config_api.restore_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, 1);
    assert_eq!(
        state.config_api.effective_config().unwrap().offset(Category::Fox),
        3.0
    );

    // 无效快照回滚
    let bad = r#"{"capacity_limit/giro": "-5"}"#;
    assert!(state.config_api.restore_from_snapshot(bad).is_err());
    assert_eq!(
        state
            .config_api
            .effective_config()
            .unwrap()
            .capacity_limit(Category::Giro),
        336_000.0
    );
}
