//! 草稿採購單批次建立
//!
//! 依呼叫端指定的物料清單，在建立當下重新計算建議量，
//! 依首選供應商分組，每個供應商一張草稿採購單。

use chrono::NaiveDateTime;
use replenish_calc::{InventoryReader, ReplenishmentEngine, SuggestRequest, VelocityFeed};
use replenish_core::{DraftLine, DraftPurchaseOrder, ReplenishError};
use replenish_store::{DraftOrderStore, NewDraftOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 草稿採購單請求
#[derive(Debug, Clone)]
pub struct DraftPoRequest {
    /// 組織
    pub org_id: String,

    /// 要下單的物料（依呼叫端順序，重複者忽略）
    pub product_ids: Vec<String>,

    /// 重新計算數量用的請求（策略、基準日）
    pub suggest: SuggestRequest,

    /// 建立時間
    pub created_at: NaiveDateTime,
}

impl DraftPoRequest {
    /// 創建新的請求
    pub fn new(
        org_id: String,
        product_ids: Vec<String>,
        suggest: SuggestRequest,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            org_id,
            product_ids,
            suggest,
            created_at,
        }
    }
}

/// 略過原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    NoSupplier,
    NothingToOrder,
}

/// 被略過的物料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedProduct {
    pub product_id: String,
    pub reason: SkipReason,
}

/// 寫入失敗種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteFailure {
    /// 配號競爭失敗，可直接重試
    ConcurrencyConflict,
    /// 儲存層其他錯誤
    StoreError,
}

impl From<&ReplenishError> for WriteFailure {
    fn from(err: &ReplenishError) -> Self {
        if err.is_conflict() {
            Self::ConcurrencyConflict
        } else {
            Self::StoreError
        }
    }
}

/// 尚未寫入的供應商分組
///
/// 明細數量已在建立當下算好，重試時原樣寫入，不再重新計算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDraft {
    pub supplier_id: String,
    pub currency: String,
    pub lines: Vec<DraftLine>,
    pub failure: WriteFailure,
    pub message: String,
}

impl PendingDraft {
    /// 分組內的物料
    pub fn product_ids(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.product_id.as_str()).collect()
    }
}

/// 批次建立結果
///
/// `pending` 不為空時，`orders` 仍是已成功寫入的採購單；
/// 呼叫端應以 [`DraftPoBatcher::retry_pending`] 只重試這些分組，
/// 重送整批請求會替已成功的供應商再建立一張採購單。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPoResult {
    pub orders: Vec<DraftPurchaseOrder>,
    pub skipped: Vec<SkippedProduct>,
    #[serde(default)]
    pub pending: Vec<PendingDraft>,
}

impl DraftPoResult {
    /// 所有採購單明細數
    pub fn line_count(&self) -> usize {
        self.orders.iter().map(|o| o.lines.len()).sum()
    }

    /// 所有分組都已寫入
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// 同一供應商的待寫入明細
struct SupplierGroup {
    supplier_id: String,
    currency: String,
    lines: Vec<DraftLine>,
}

impl From<PendingDraft> for SupplierGroup {
    fn from(pending: PendingDraft) -> Self {
        Self {
            supplier_id: pending.supplier_id,
            currency: pending.currency,
            lines: pending.lines,
        }
    }
}

/// 草稿採購單批次建立器
pub struct DraftPoBatcher<'a> {
    engine: &'a ReplenishmentEngine,
    store: &'a dyn DraftOrderStore,
}

impl<'a> DraftPoBatcher<'a> {
    /// 創建新的批次建立器
    pub fn new(engine: &'a ReplenishmentEngine, store: &'a dyn DraftOrderStore) -> Self {
        Self { engine, store }
    }

    /// 建立草稿採購單
    ///
    /// 任一物料不存在或上游資料讀取失敗時整批失敗，不寫入任何採購單。
    /// 寫入階段每個供應商各自一個交易：某一組寫入失敗不影響其他組，
    /// 失敗的分組放在結果的 `pending`。
    pub fn create_drafts(
        &self,
        request: &DraftPoRequest,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
    ) -> replenish_core::Result<DraftPoResult> {
        if request.org_id.trim().is_empty() {
            return Err(ReplenishError::invalid("組織ID不可為空"));
        }
        if request.product_ids.is_empty() {
            return Err(ReplenishError::invalid("至少需指定一個物料"));
        }

        tracing::info!(
            "開始建立草稿採購單：組織 {}，物料 {} 筆",
            request.org_id,
            request.product_ids.len()
        );
        let start_time = std::time::Instant::now();

        let (groups, skipped) = self.group_by_supplier(request, inventory, velocities)?;
        let (orders, pending) = self.write_groups(&request.org_id, request.created_at, groups);

        tracing::info!(
            "草稿採購單建立完成：{} 張，略過 {} 筆，待重試 {} 組，耗時 {:?}",
            orders.len(),
            skipped.len(),
            pending.len(),
            start_time.elapsed()
        );
        Ok(DraftPoResult {
            orders,
            skipped,
            pending,
        })
    }

    /// 只重試先前寫入失敗的分組
    pub fn retry_pending(
        &self,
        org_id: &str,
        created_at: NaiveDateTime,
        pending: Vec<PendingDraft>,
    ) -> replenish_core::Result<DraftPoResult> {
        if org_id.trim().is_empty() {
            return Err(ReplenishError::invalid("組織ID不可為空"));
        }

        tracing::info!("重試草稿採購單：組織 {}，{} 組", org_id, pending.len());
        let groups = pending.into_iter().map(SupplierGroup::from).collect();
        let (orders, pending) = self.write_groups(org_id, created_at, groups);

        Ok(DraftPoResult {
            orders,
            skipped: Vec::new(),
            pending,
        })
    }

    /// 逐組配號寫入，失敗的分組收集起來
    fn write_groups(
        &self,
        org_id: &str,
        created_at: NaiveDateTime,
        groups: Vec<SupplierGroup>,
    ) -> (Vec<DraftPurchaseOrder>, Vec<PendingDraft>) {
        let mut orders = Vec::with_capacity(groups.len());
        let mut pending = Vec::new();

        for group in groups {
            let order = NewDraftOrder {
                org_id: org_id.to_string(),
                supplier_id: group.supplier_id,
                currency: group.currency,
                created_at,
                lines: group.lines,
            };
            // 失敗時要保留明細，所以傳入副本
            match self.store.create_draft(order.clone()) {
                Ok(draft) => orders.push(draft),
                Err(err) => {
                    tracing::warn!(
                        "供應商 {} 的草稿採購單寫入失敗，留待重試: {}",
                        order.supplier_id,
                        err
                    );
                    pending.push(PendingDraft {
                        supplier_id: order.supplier_id,
                        currency: order.currency,
                        lines: order.lines,
                        failure: WriteFailure::from(&err),
                        message: err.to_string(),
                    });
                }
            }
        }

        (orders, pending)
    }

    /// 重新計算並依供應商分組（保留第一次出現的順序）
    fn group_by_supplier(
        &self,
        request: &DraftPoRequest,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
    ) -> replenish_core::Result<(Vec<SupplierGroup>, Vec<SkippedProduct>)> {
        let catalog = self.engine.catalog();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut groups: Vec<SupplierGroup> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut skipped = Vec::new();

        for product_id in &request.product_ids {
            if !seen.insert(product_id.as_str()) {
                continue;
            }

            let product = catalog.product(product_id)?;
            let supplier = match catalog.require_supplier(product) {
                Ok(supplier) => supplier,
                Err(ReplenishError::MissingSupplier { product_id }) => {
                    tracing::warn!("物料 {} 未設定供應商，略過", product_id);
                    skipped.push(SkippedProduct {
                        product_id,
                        reason: SkipReason::NoSupplier,
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            let suggestion =
                self.engine
                    .suggest(product_id, inventory, velocities, &request.suggest)?;
            if !suggestion.needs_order() {
                tracing::warn!("物料 {} 重新計算後無需訂購，略過", product_id);
                skipped.push(SkippedProduct {
                    product_id: product_id.clone(),
                    reason: SkipReason::NothingToOrder,
                });
                continue;
            }

            let line = DraftLine::new(
                product.id.clone(),
                suggestion.recommended_quantity,
                product.unit_cost.unwrap_or(Decimal::ZERO),
            );
            let index = *group_index.entry(supplier.id.clone()).or_insert_with(|| {
                groups.push(SupplierGroup {
                    supplier_id: supplier.id.clone(),
                    currency: supplier.currency.clone(),
                    lines: Vec::new(),
                });
                groups.len() - 1
            });
            groups[index].lines.push(line);

            tracing::debug!(
                "物料 {} 加入供應商 {}：數量 {}",
                product_id,
                supplier.id,
                suggestion.recommended_quantity
            );
        }

        Ok((groups, skipped))
    }
}
