//! # Replenish Core
//!
//! 補貨引擎的核心資料模型與類型定義

pub mod catalog;
pub mod config;
pub mod digest;
pub mod inventory;
pub mod product;
pub mod purchase_order;
pub mod risk;
pub mod suggestion;
pub mod velocity;

// Re-export 主要類型
pub use catalog::Catalog;
pub use config::{EngineConfig, RiskThresholds};
pub use digest::{DailyDigest, DigestEntry};
pub use inventory::{InventoryMovement, MovementKind};
pub use product::{Product, Supplier};
pub use purchase_order::{
    DraftLine, DraftPurchaseOrder, DraftStatus, OpenPurchaseOrderLine, PoStatus,
};
pub use risk::{RiskTier, StockoutRisk};
pub use suggestion::{ExplainTrace, ReasonCode, ReorderSuggestion};
pub use velocity::{ChosenVelocity, VelocitySource, VelocityStrategy, VelocityWindow};

/// 補貨引擎錯誤類型
///
/// 所有錯誤都帶有足夠的上下文（物料或組織ID），呼叫端可據此組出精確訊息。
#[derive(Debug, thiserror::Error)]
pub enum ReplenishError {
    #[error("無效的參數: {0}")]
    InvalidArgument(String),

    #[error("物料 {product_id} 未設定首選供應商")]
    MissingSupplier { product_id: String },

    #[error("並發衝突（組織 {org_id}）: {message}")]
    ConcurrencyConflict { org_id: String, message: String },

    #[error("上游資料無法讀取（{subject}）: {message}")]
    UpstreamDataUnavailable { subject: String, message: String },

    #[error("找不到物料: {0}")]
    ProductNotFound(String),
}

impl ReplenishError {
    /// 建立參數錯誤
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// 建立並發衝突錯誤
    pub fn conflict(org_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConcurrencyConflict {
            org_id: org_id.into(),
            message: message.into(),
        }
    }

    /// 建立上游資料錯誤
    pub fn upstream(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamDataUnavailable {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// 是否為可重試的並發衝突（只需重試配號步驟）
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReplenishError>;
