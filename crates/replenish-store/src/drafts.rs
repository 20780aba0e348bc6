//! 草稿採購單寫入與配號

use chrono::NaiveDateTime;
use replenish_core::{DraftLine, DraftPurchaseOrder, DraftStatus, ReplenishError};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// 待寫入的草稿採購單
#[derive(Debug, Clone)]
pub struct NewDraftOrder {
    pub org_id: String,
    pub supplier_id: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub lines: Vec<DraftLine>,
}

/// 草稿採購單儲存
///
/// 配號與表頭、明細寫入必須在同一個交易內完成，同一組織的配號必須序列化，
/// 不可產生重複單號或孤兒表頭。配號競爭失敗時回傳 `ConcurrencyConflict`。
pub trait DraftOrderStore: Send + Sync {
    /// 配號並寫入一張草稿採購單
    fn create_draft(&self, order: NewDraftOrder) -> replenish_core::Result<DraftPurchaseOrder>;

    /// 組織的所有草稿採購單（依流水號排序）
    fn drafts_for(&self, org_id: &str) -> replenish_core::Result<Vec<DraftPurchaseOrder>>;
}

/// 單一組織的採購單帳
#[derive(Debug, Default)]
struct OrgLedger {
    last_sequence: u64,
    orders: BTreeMap<u64, DraftPurchaseOrder>,
}

/// 記憶體中的草稿採購單儲存
///
/// 整個配號加寫入過程持有同一把鎖，等同資料庫交易邊界；
/// 流水號以 BTreeMap 鍵值作為唯一性約束。
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    ledgers: Mutex<HashMap<String, OrgLedger>>,
}

impl InMemoryDraftStore {
    /// 創建空儲存
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設定組織目前已使用的最後流水號
    ///
    /// 建構時獨占儲存，即使鎖已損毀也照樣寫入。
    pub fn with_last_sequence(mut self, org_id: &str, last_sequence: u64) -> Self {
        let ledgers = self
            .ledgers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        ledgers.entry(org_id.to_string()).or_default().last_sequence = last_sequence;
        self
    }

    fn validate(order: &NewDraftOrder) -> replenish_core::Result<()> {
        if order.lines.is_empty() {
            return Err(ReplenishError::invalid(format!(
                "供應商 {} 的草稿採購單沒有明細",
                order.supplier_id
            )));
        }
        if let Some(line) = order.lines.iter().find(|l| l.quantity <= Decimal::ZERO) {
            return Err(ReplenishError::invalid(format!(
                "物料 {} 的訂購數量必須大於 0: {}",
                line.product_id, line.quantity
            )));
        }
        Ok(())
    }
}

impl DraftOrderStore for InMemoryDraftStore {
    fn create_draft(&self, order: NewDraftOrder) -> replenish_core::Result<DraftPurchaseOrder> {
        Self::validate(&order)?;

        let mut ledgers = self.ledgers.lock().map_err(|_| {
            ReplenishError::upstream(format!("org {}", order.org_id), "採購單帳鎖已損毀")
        })?;
        let ledger = ledgers.entry(order.org_id.clone()).or_default();

        let sequence = ledger.last_sequence + 1;
        if ledger.orders.contains_key(&sequence) {
            return Err(ReplenishError::conflict(
                order.org_id,
                format!("採購單流水號 {sequence} 已被使用"),
            ));
        }

        let draft = DraftPurchaseOrder {
            id: Uuid::new_v4(),
            org_id: order.org_id,
            supplier_id: order.supplier_id,
            sequence,
            po_number: DraftPurchaseOrder::format_po_number(sequence),
            currency: order.currency,
            created_at: order.created_at,
            status: DraftStatus::Draft,
            lines: order.lines,
        };

        ledger.orders.insert(sequence, draft.clone());
        ledger.last_sequence = sequence;

        tracing::debug!(
            "組織 {} 建立草稿採購單 {}（供應商 {}，明細 {} 筆）",
            draft.org_id,
            draft.po_number,
            draft.supplier_id,
            draft.lines.len()
        );
        Ok(draft)
    }

    fn drafts_for(&self, org_id: &str) -> replenish_core::Result<Vec<DraftPurchaseOrder>> {
        let ledgers = self
            .ledgers
            .lock()
            .map_err(|_| ReplenishError::upstream(format!("org {org_id}"), "採購單帳鎖已損毀"))?;
        Ok(ledgers
            .get(org_id)
            .map(|ledger| ledger.orders.values().cloned().collect())
            .unwrap_or_default())
    }
}
