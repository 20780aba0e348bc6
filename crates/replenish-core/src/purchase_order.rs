//! 採購單模型（在途採購與草稿採購單）

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 採購單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoStatus {
    /// 草稿
    Draft,
    /// 待確認
    Pending,
    /// 已下單
    Ordered,
    /// 已收貨（已反映在庫存異動中）
    Received,
}

impl PoStatus {
    /// 是否計入在途數量
    pub fn counts_as_incoming(self) -> bool {
        matches!(self, PoStatus::Pending | PoStatus::Ordered)
    }
}

/// 在途採購單明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPurchaseOrderLine {
    /// 物料ID
    pub product_id: String,

    /// 訂購數量
    pub quantity: Decimal,

    /// 預計到貨日
    pub expected_arrival: NaiveDate,

    /// 所屬採購單狀態
    pub status: PoStatus,
}

impl OpenPurchaseOrderLine {
    /// 創建新的在途明細
    pub fn new(
        product_id: String,
        quantity: Decimal,
        expected_arrival: NaiveDate,
        status: PoStatus,
    ) -> Self {
        Self {
            product_id,
            quantity,
            expected_arrival,
            status,
        }
    }

    /// 檢查是否在指定日期（含）前到貨並計入在途
    pub fn arrives_by(&self, product_id: &str, until: NaiveDate) -> bool {
        self.product_id == product_id
            && self.status.counts_as_incoming()
            && self.expected_arrival <= until
    }
}

/// 草稿採購單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
}

/// 草稿採購單（表頭 + 明細）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPurchaseOrder {
    /// 採購單ID
    pub id: Uuid,

    /// 組織
    pub org_id: String,

    /// 供應商
    pub supplier_id: String,

    /// 組織內的流水號
    pub sequence: u64,

    /// 採購單號（由流水號格式化）
    pub po_number: String,

    /// 幣別
    pub currency: String,

    /// 建立時間
    pub created_at: NaiveDateTime,

    /// 狀態
    pub status: DraftStatus,

    /// 明細
    pub lines: Vec<DraftLine>,
}

impl DraftPurchaseOrder {
    /// 流水號格式化為採購單號
    pub fn format_po_number(sequence: u64) -> String {
        format!("PO-{sequence:06}")
    }

    /// 合計金額
    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(DraftLine::amount).sum()
    }

    /// 合計數量
    pub fn total_quantity(&self) -> Decimal {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// 草稿採購單明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    /// 明細ID
    pub id: Uuid,

    /// 物料ID
    pub product_id: String,

    /// 數量
    pub quantity: Decimal,

    /// 單位成本
    pub unit_cost: Decimal,
}

impl DraftLine {
    /// 創建新的明細
    pub fn new(product_id: String, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            unit_cost,
        }
    }

    /// 明細金額
    pub fn amount(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}
