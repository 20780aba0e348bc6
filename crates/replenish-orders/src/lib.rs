//! # Replenish Orders
//!
//! 引擎輸出的下游流程：草稿採購單批次建立、每日缺貨摘要

pub mod batcher;
pub mod digest;
pub mod notify;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export 主要類型
pub use batcher::{
    DraftPoBatcher, DraftPoRequest, DraftPoResult, PendingDraft, SkipReason, SkippedProduct,
    WriteFailure,
};
pub use digest::DigestGenerator;
pub use notify::{LogSender, NotificationSender};
