//! 測試用的共用資料
//!
//! | 物料 | 供應商 | 庫存 | 速度 | 結果 |
//! |------|--------|------|------|------|
//! | P-001 BEAN | S-001 | 15 | 2.5 | 訂 60，高風險 |
//! | P-002 SYRUP | - | 0 | - | 無供應商，高風險 |
//! | P-003 CUPS | S-002 | 100 | 4 | 不需訂，低風險 |
//! | P-004 LIDS | S-002 | 4 | 2 | 訂 10，高風險 |
//! | P-005 SLEEVE | S-001 | 0 | 1 | 訂 50（MOQ），高風險 |
//! | P-006 STRAW | S-002 | 20 | 2 | 中風險 |
//! | P-007 NAPKIN | - | 0 | - | 停用 |

use chrono::{NaiveDate, NaiveDateTime};
use replenish_calc::{InventorySnapshot, ReplenishmentEngine, VelocityTable};
use replenish_core::{
    Catalog, EngineConfig, InventoryMovement, MovementKind, OpenPurchaseOrderLine, PoStatus,
    Product, Supplier, VelocityWindow,
};
use rust_decimal::Decimal;

pub(crate) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
}

pub(crate) fn created_at() -> NaiveDateTime {
    as_of().and_hms_opt(6, 0, 0).unwrap()
}

fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub(crate) fn catalog() -> Catalog {
    Catalog::from_parts(
        vec![
            Product::new("P-001".to_string(), "BEAN".to_string())
                .with_supplier("S-001".to_string())
                .with_safety_stock_days(5)
                .with_pack_size(Decimal::from(12))
                .with_unit_cost(Decimal::new(350, 2)),
            Product::new("P-002".to_string(), "SYRUP".to_string())
                .with_reorder_point(Decimal::from(10)),
            Product::new("P-003".to_string(), "CUPS".to_string())
                .with_supplier("S-002".to_string()),
            Product::new("P-004".to_string(), "LIDS".to_string())
                .with_supplier("S-002".to_string()),
            Product::new("P-005".to_string(), "SLEEVE".to_string())
                .with_supplier("S-001".to_string())
                .with_unit_cost(Decimal::new(25, 2)),
            Product::new("P-006".to_string(), "STRAW".to_string())
                .with_supplier("S-002".to_string()),
            Product::new("P-007".to_string(), "NAPKIN".to_string()).with_active(false),
        ],
        vec![
            Supplier::new("S-001".to_string(), 10).with_moq(Decimal::from(50)),
            Supplier::new("S-002".to_string(), 4).with_currency("EUR".to_string()),
        ],
    )
    .unwrap()
}

pub(crate) fn engine_with(config: EngineConfig) -> ReplenishmentEngine {
    ReplenishmentEngine::new(catalog(), config).unwrap()
}

pub(crate) fn engine() -> ReplenishmentEngine {
    engine_with(EngineConfig::default())
}

fn receipt(product_id: &str, quantity: i64, day: u32) -> InventoryMovement {
    let kind = if quantity < 0 {
        MovementKind::Out
    } else {
        MovementKind::In
    };
    InventoryMovement::new(
        product_id.to_string(),
        "WH-A".to_string(),
        Decimal::from(quantity),
        kind,
        at(day),
    )
}

pub(crate) fn snapshot() -> InventorySnapshot {
    InventorySnapshot::new(
        vec![
            receipt("P-001", 20, 1),
            receipt("P-001", -5, 2),
            receipt("P-003", 100, 3),
            receipt("P-004", 4, 3),
            receipt("P-006", 20, 4),
        ],
        vec![OpenPurchaseOrderLine::new(
            "P-001".to_string(),
            Decimal::from(100),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            PoStatus::Ordered,
        )],
    )
}

fn flat(value: i64) -> VelocityWindow {
    VelocityWindow::new(Decimal::from(value), Decimal::from(value), Decimal::from(value))
}

pub(crate) fn velocities() -> VelocityTable {
    VelocityTable::new()
        .with(
            "P-001",
            VelocityWindow::new(Decimal::new(25, 1), Decimal::from(3), Decimal::from(2)),
        )
        .with(
            "P-003",
            VelocityWindow::new(Decimal::ZERO, Decimal::from(4), Decimal::from(4)),
        )
        .with("P-004", flat(2))
        .with("P-005", flat(1))
        .with("P-006", flat(2))
}
