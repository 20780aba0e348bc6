//! 庫存異動模型

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 異動類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// 入庫
    In,
    /// 出庫
    Out,
    /// 盤點調整
    Adjust,
    /// 調撥
    Transfer,
}

/// 庫存異動（只增不改的流水帳）
///
/// 數量帶正負號，現有庫存一律由異動加總而得。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    /// 異動ID
    pub id: Uuid,

    /// 物料ID
    pub product_id: String,

    /// 儲位
    pub location_id: String,

    /// 帶正負號的數量
    pub quantity: Decimal,

    /// 異動類型
    pub kind: MovementKind,

    /// 發生時間
    pub occurred_at: NaiveDateTime,
}

impl InventoryMovement {
    /// 創建新的異動
    pub fn new(
        product_id: String,
        location_id: String,
        quantity: Decimal,
        kind: MovementKind,
        occurred_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            location_id,
            quantity,
            kind,
            occurred_at,
        }
    }

    /// 檢查是否屬於指定物料（及儲位）
    pub fn matches(&self, product_id: &str, location_id: Option<&str>) -> bool {
        self.product_id == product_id
            && location_id.map_or(true, |loc| self.location_id == loc)
    }
}
