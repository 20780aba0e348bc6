//! 每日補貨流程示例
//!
//! 執行：`RUST_LOG=debug cargo run --example daily_run`

use chrono::NaiveDate;
use replenish::calc::{InventorySnapshot, VelocityTable};
use replenish::model::{
    Catalog, EngineConfig, InventoryMovement, MovementKind, OpenPurchaseOrderLine, PoStatus,
    Product, Supplier, VelocityStrategy, VelocityWindow,
};
use replenish::orders::LogSender;
use replenish::store::{DraftOrderStore, InMemoryClaimStore, InMemoryDraftStore};
use replenish::{
    DigestGenerator, DraftPoBatcher, DraftPoRequest, ReplenishmentEngine, SuggestRequest,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "default_safety_stock_days": 3,
    "min_horizon_days": 7,
    "digest_top_n": 5
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== 每日補貨流程示例 ===\n");

    let as_of = NaiveDate::from_ymd_opt(2025, 11, 1).ok_or_else(|| anyhow::anyhow!("無效日期"))?;
    let received_at = as_of
        .pred_opt()
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("無效時間"))?;

    // 目錄：兩家供應商、三個物料
    let catalog = Catalog::from_parts(
        vec![
            Product::new("P-001".to_string(), "BEAN-1KG".to_string())
                .with_name("咖啡豆 1kg".to_string())
                .with_supplier("S-001".to_string())
                .with_safety_stock_days(5)
                .with_pack_size(Decimal::from(12))
                .with_unit_cost(Decimal::new(1250, 2)),
            Product::new("P-002".to_string(), "MILK-1L".to_string())
                .with_name("鮮奶 1L".to_string())
                .with_supplier("S-002".to_string())
                .with_reorder_point(Decimal::from(30))
                .with_max_stock_days(10)
                .with_unit_cost(Decimal::new(180, 2)),
            Product::new("P-003".to_string(), "SYRUP-VAN".to_string())
                .with_name("香草糖漿".to_string())
                .with_reorder_point(Decimal::from(6)),
        ],
        vec![
            Supplier::new("S-001".to_string(), 10)
                .with_name("山頂烘焙".to_string())
                .with_moq(Decimal::from(50)),
            Supplier::new("S-002".to_string(), 2).with_name("北區乳品".to_string()),
        ],
    )?;

    let config = EngineConfig::from_json(CONFIG)?;
    let engine = ReplenishmentEngine::new(catalog, config)?;

    let inventory = InventorySnapshot::new(
        vec![
            InventoryMovement::new(
                "P-001".to_string(),
                "STORE-1".to_string(),
                Decimal::from(15),
                MovementKind::In,
                received_at,
            ),
            InventoryMovement::new(
                "P-002".to_string(),
                "STORE-1".to_string(),
                Decimal::from(24),
                MovementKind::In,
                received_at,
            ),
            InventoryMovement::new(
                "P-003".to_string(),
                "STORE-1".to_string(),
                Decimal::from(2),
                MovementKind::Adjust,
                received_at,
            ),
        ],
        vec![OpenPurchaseOrderLine::new(
            "P-002".to_string(),
            Decimal::from(12),
            as_of,
            PoStatus::Ordered,
        )],
    );

    let velocities = VelocityTable::new()
        .with(
            "P-001",
            VelocityWindow::new(Decimal::new(25, 1), Decimal::from(3), Decimal::from(2)),
        )
        .with(
            "P-002",
            VelocityWindow::new(Decimal::from(8), Decimal::from(6), Decimal::from(6)),
        );

    // 1. 補貨建議
    let request = SuggestRequest::new(VelocityStrategy::Latest, as_of);
    let suggestions = engine.suggest_all(&inventory, &velocities, &request)?;
    println!("補貨建議:");
    println!("{}", serde_json::to_string_pretty(&suggestions)?);

    // 2. 說明追蹤
    let trace = engine.explain("P-001", &inventory, &velocities, &request)?;
    println!("\nP-001 計算過程:");
    println!("{}", serde_json::to_string_pretty(&trace)?);

    // 3. 草稿採購單
    let store = InMemoryDraftStore::new();
    let batcher = DraftPoBatcher::new(&engine, &store);
    let draft_request = DraftPoRequest::new(
        "ORG-DEMO".to_string(),
        suggestions
            .iter()
            .filter(|s| s.needs_order())
            .map(|s| s.product_id.clone())
            .collect(),
        request.clone(),
        received_at,
    );
    let result = batcher.create_drafts(&draft_request, &inventory, &velocities)?;
    println!("\n草稿採購單:");
    for order in &result.orders {
        println!(
            "  - {} 供應商 {}，明細 {} 筆，金額 {} {}",
            order.po_number,
            order.supplier_id,
            order.lines.len(),
            order.total_amount(),
            order.currency
        );
    }
    for skipped in &result.skipped {
        println!("  - 略過 {}: {:?}", skipped.product_id, skipped.reason);
    }
    for pending in &result.pending {
        println!(
            "  - 待重試 供應商 {}（{:?}）: {:?}",
            pending.supplier_id,
            pending.failure,
            pending.product_ids()
        );
    }
    println!("  已保存 {} 張", store.drafts_for("ORG-DEMO")?.len());

    // 4. 每日摘要（第二次呼叫不會重送）
    let claims = InMemoryClaimStore::new();
    let generator = DigestGenerator::new(&engine, &claims, &LogSender);
    let digest = generator.run("ORG-DEMO", &inventory, &velocities, &request)?;
    let again = generator.run("ORG-DEMO", &inventory, &velocities, &request)?;
    println!("\n每日摘要:");
    println!("{}", serde_json::to_string_pretty(&digest)?);
    println!("重複執行 already_ran = {}", again.already_ran);

    Ok(())
}
