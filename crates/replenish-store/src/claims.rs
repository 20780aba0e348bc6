//! 每日摘要冪等標記

use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use replenish_core::{DailyDigest, ReplenishError};

/// 冪等鍵：(組織, 日期)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimKey {
    pub org_id: String,
    pub date: NaiveDate,
}

impl ClaimKey {
    pub fn new(org_id: &str, date: NaiveDate) -> Self {
        Self {
            org_id: org_id.to_string(),
            date,
        }
    }
}

/// 搶占結果
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// 取得執行權
    Claimed,
    /// 已完成，附上當時的摘要
    AlreadyCompleted(DailyDigest),
    /// 另一個執行中的請求持有此鍵
    InProgress,
}

/// 每日摘要冪等標記儲存
///
/// `try_claim` 必須是原子的條件寫入（鍵已存在即失敗），
/// 先讀後寫而沒有唯一性保證是不夠的。
pub trait DigestClaimStore: Send + Sync {
    /// 嘗試搶占 (組織, 日期)
    fn try_claim(&self, key: &ClaimKey) -> replenish_core::Result<ClaimOutcome>;

    /// 通知送出後標記完成
    fn complete(&self, key: &ClaimKey, digest: &DailyDigest) -> replenish_core::Result<()>;

    /// 釋放尚未完成的搶占（送出失敗時，讓下次重試可以執行）
    fn release(&self, key: &ClaimKey) -> replenish_core::Result<()>;
}

#[derive(Debug, Clone)]
enum ClaimState {
    InProgress,
    Completed(DailyDigest),
}

/// 記憶體中的冪等標記，以 DashMap entry 作條件寫入
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    claims: DashMap<ClaimKey, ClaimState>,
}

impl InMemoryClaimStore {
    /// 創建空儲存
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否已完成
    pub fn is_completed(&self, key: &ClaimKey) -> bool {
        self.claims
            .get(key)
            .is_some_and(|state| matches!(*state, ClaimState::Completed(_)))
    }
}

impl DigestClaimStore for InMemoryClaimStore {
    fn try_claim(&self, key: &ClaimKey) -> replenish_core::Result<ClaimOutcome> {
        match self.claims.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(match entry.get() {
                ClaimState::Completed(digest) => ClaimOutcome::AlreadyCompleted(digest.clone()),
                ClaimState::InProgress => ClaimOutcome::InProgress,
            }),
            Entry::Vacant(entry) => {
                entry.insert(ClaimState::InProgress);
                Ok(ClaimOutcome::Claimed)
            }
        }
    }

    fn complete(&self, key: &ClaimKey, digest: &DailyDigest) -> replenish_core::Result<()> {
        match self.claims.get_mut(key) {
            Some(mut state) if matches!(*state, ClaimState::InProgress) => {
                *state = ClaimState::Completed(digest.clone());
                Ok(())
            }
            Some(_) => Err(ReplenishError::conflict(
                key.org_id.clone(),
                format!("{} 的摘要已標記完成", key.date),
            )),
            None => Err(ReplenishError::conflict(
                key.org_id.clone(),
                format!("{} 的摘要未先搶占", key.date),
            )),
        }
    }

    fn release(&self, key: &ClaimKey) -> replenish_core::Result<()> {
        self.claims
            .remove_if(key, |_, state| matches!(state, ClaimState::InProgress));
        Ok(())
    }
}
