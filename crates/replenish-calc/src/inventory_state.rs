//! 庫存狀態讀取

use chrono::{Days, NaiveDate};
use replenish_core::{
    InventoryMovement, OpenPurchaseOrderLine, ReplenishError, VelocityWindow,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 庫存資料來源
///
/// 現有庫存必須由異動流水加總，不可讀取快取欄位。
pub trait InventoryReader: Send + Sync {
    /// 現有庫存（可限定儲位）
    fn on_hand(&self, product_id: &str, location_id: Option<&str>) -> replenish_core::Result<Decimal>;

    /// 指定日期（含）前預計到貨的在途數量
    fn incoming_until(&self, product_id: &str, until: NaiveDate) -> replenish_core::Result<Decimal>;
}

/// 銷售速度資料來源
pub trait VelocityFeed: Send + Sync {
    /// 取得物料的速度視窗，沒有資料時回傳 None
    fn window(&self, product_id: &str) -> replenish_core::Result<Option<VelocityWindow>>;
}

/// 庫存狀態計算器
pub struct InventoryStateReader;

impl InventoryStateReader {
    /// 由異動流水計算現有庫存
    pub fn on_hand(
        movements: &[InventoryMovement],
        product_id: &str,
        location_id: Option<&str>,
    ) -> Decimal {
        movements
            .iter()
            .filter(|m| m.matches(product_id, location_id))
            .map(|m| m.quantity)
            .sum()
    }

    /// 計算時界內的在途數量（只計 pending/ordered）
    pub fn incoming_within(
        lines: &[OpenPurchaseOrderLine],
        product_id: &str,
        as_of: NaiveDate,
        horizon_days: u32,
    ) -> replenish_core::Result<Decimal> {
        let until = Self::horizon_end(as_of, horizon_days)?;
        Ok(Self::incoming_until(lines, product_id, until))
    }

    /// 計算指定日期（含）前的在途數量
    pub fn incoming_until(
        lines: &[OpenPurchaseOrderLine],
        product_id: &str,
        until: NaiveDate,
    ) -> Decimal {
        lines
            .iter()
            .filter(|line| line.arrives_by(product_id, until))
            .map(|line| line.quantity)
            .sum()
    }

    /// 計劃時界的最後一天
    pub fn horizon_end(as_of: NaiveDate, horizon_days: u32) -> replenish_core::Result<NaiveDate> {
        as_of
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .ok_or_else(|| {
                ReplenishError::invalid(format!("計劃時界溢出: {as_of} + {horizon_days} 天"))
            })
    }
}

/// 記憶體中的庫存快照（異動流水 + 在途採購明細）
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    movements: Vec<InventoryMovement>,
    open_lines: Vec<OpenPurchaseOrderLine>,
}

impl InventorySnapshot {
    /// 創建快照
    pub fn new(movements: Vec<InventoryMovement>, open_lines: Vec<OpenPurchaseOrderLine>) -> Self {
        Self {
            movements,
            open_lines,
        }
    }

    /// 追加異動
    pub fn record(&mut self, movement: InventoryMovement) {
        self.movements.push(movement);
    }

    /// 追加在途明細
    pub fn add_open_line(&mut self, line: OpenPurchaseOrderLine) {
        self.open_lines.push(line);
    }
}

impl InventoryReader for InventorySnapshot {
    fn on_hand(&self, product_id: &str, location_id: Option<&str>) -> replenish_core::Result<Decimal> {
        Ok(InventoryStateReader::on_hand(&self.movements, product_id, location_id))
    }

    fn incoming_until(&self, product_id: &str, until: NaiveDate) -> replenish_core::Result<Decimal> {
        Ok(InventoryStateReader::incoming_until(&self.open_lines, product_id, until))
    }
}

/// 記憶體中的速度表
#[derive(Debug, Clone, Default)]
pub struct VelocityTable {
    windows: HashMap<String, VelocityWindow>,
}

impl VelocityTable {
    /// 創建空速度表
    pub fn new() -> Self {
        Self::default()
    }

    /// 設置物料的速度視窗
    pub fn insert(&mut self, product_id: String, window: VelocityWindow) {
        self.windows.insert(product_id, window);
    }

    /// 建構器模式：設置物料的速度視窗
    pub fn with(mut self, product_id: &str, window: VelocityWindow) -> Self {
        self.insert(product_id.to_string(), window);
        self
    }
}

impl VelocityFeed for VelocityTable {
    fn window(&self, product_id: &str) -> replenish_core::Result<Option<VelocityWindow>> {
        Ok(self.windows.get(product_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use replenish_core::{MovementKind, PoStatus};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, day)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn movement(product: &str, location: &str, qty: i64, kind: MovementKind) -> InventoryMovement {
        InventoryMovement::new(
            product.to_string(),
            location.to_string(),
            Decimal::from(qty),
            kind,
            at(1),
        )
    }

    #[test]
    fn test_on_hand_is_signed_sum() {
        let movements = vec![
            movement("P-001", "WH-A", 100, MovementKind::In),
            movement("P-001", "WH-A", -30, MovementKind::Out),
            movement("P-001", "WH-B", 20, MovementKind::Transfer),
            movement("P-001", "WH-A", -5, MovementKind::Adjust),
            movement("P-002", "WH-A", 999, MovementKind::In),
        ];

        assert_eq!(
            InventoryStateReader::on_hand(&movements, "P-001", None),
            Decimal::from(85)
        );
        assert_eq!(
            InventoryStateReader::on_hand(&movements, "P-001", Some("WH-A")),
            Decimal::from(65)
        );
        assert_eq!(
            InventoryStateReader::on_hand(&movements, "P-404", None),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_incoming_within_horizon() {
        let as_of = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let lines = vec![
            // 時界內
            OpenPurchaseOrderLine::new(
                "P-001".to_string(),
                Decimal::from(40),
                NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
                PoStatus::Ordered,
            ),
            // 剛好在最後一天
            OpenPurchaseOrderLine::new(
                "P-001".to_string(),
                Decimal::from(10),
                NaiveDate::from_ymd_opt(2025, 11, 8).unwrap(),
                PoStatus::Pending,
            ),
            // 超出時界
            OpenPurchaseOrderLine::new(
                "P-001".to_string(),
                Decimal::from(500),
                NaiveDate::from_ymd_opt(2025, 11, 9).unwrap(),
                PoStatus::Ordered,
            ),
            // 已收貨不重複計入
            OpenPurchaseOrderLine::new(
                "P-001".to_string(),
                Decimal::from(70),
                NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
                PoStatus::Received,
            ),
            // 草稿不計入
            OpenPurchaseOrderLine::new(
                "P-001".to_string(),
                Decimal::from(80),
                NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
                PoStatus::Draft,
            ),
        ];

        let incoming = InventoryStateReader::incoming_within(&lines, "P-001", as_of, 7).unwrap();
        assert_eq!(incoming, Decimal::from(50));
    }

    #[test]
    fn test_overdue_lines_still_count() {
        let as_of = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let lines = vec![OpenPurchaseOrderLine::new(
            "P-001".to_string(),
            Decimal::from(12),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            PoStatus::Ordered,
        )];

        let incoming = InventoryStateReader::incoming_within(&lines, "P-001", as_of, 7).unwrap();
        assert_eq!(incoming, Decimal::from(12));
    }

    #[test]
    fn test_horizon_overflow_is_rejected() {
        let result = InventoryStateReader::horizon_end(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(ReplenishError::InvalidArgument(_))));
    }

    #[test]
    fn test_snapshot_reader() {
        let mut snapshot = InventorySnapshot::default();
        snapshot.record(movement("P-001", "WH-A", 15, MovementKind::In));
        snapshot.add_open_line(OpenPurchaseOrderLine::new(
            "P-001".to_string(),
            Decimal::from(6),
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            PoStatus::Ordered,
        ));

        assert_eq!(snapshot.on_hand("P-001", None).unwrap(), Decimal::from(15));
        assert_eq!(
            snapshot
                .incoming_until("P-001", NaiveDate::from_ymd_opt(2025, 11, 3).unwrap())
                .unwrap(),
            Decimal::from(6)
        );
    }

    #[test]
    fn test_velocity_table_missing_product() {
        let table = VelocityTable::new().with(
            "P-001",
            VelocityWindow::new(Decimal::ONE, Decimal::ZERO, Decimal::ZERO),
        );

        assert!(table.window("P-001").unwrap().is_some());
        assert!(table.window("P-002").unwrap().is_none());
    }
}
