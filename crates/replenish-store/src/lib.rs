//! # Replenish Store
//!
//! 需要跨請求協調的共享狀態：採購單配號與每日摘要冪等標記

pub mod claims;
pub mod drafts;

// Re-export 主要類型
pub use claims::{ClaimKey, ClaimOutcome, DigestClaimStore, InMemoryClaimStore};
pub use drafts::{DraftOrderStore, InMemoryDraftStore, NewDraftOrder};
