//! 每日缺貨摘要
//!
//! 每個 (組織, 日期) 最多發送一次，重複呼叫回傳當時的摘要。

use replenish_calc::{InventoryReader, ReplenishmentEngine, SuggestRequest, VelocityFeed};
use replenish_core::{DailyDigest, DigestEntry, ReplenishError, RiskTier, StockoutRisk};
use replenish_store::{ClaimKey, ClaimOutcome, DigestClaimStore};
use rust_decimal::Decimal;

use crate::notify::NotificationSender;

/// 每日摘要產生器
pub struct DigestGenerator<'a> {
    engine: &'a ReplenishmentEngine,
    claims: &'a dyn DigestClaimStore,
    sender: &'a dyn NotificationSender,
}

impl<'a> DigestGenerator<'a> {
    /// 創建新的摘要產生器
    pub fn new(
        engine: &'a ReplenishmentEngine,
        claims: &'a dyn DigestClaimStore,
        sender: &'a dyn NotificationSender,
    ) -> Self {
        Self {
            engine,
            claims,
            sender,
        }
    }

    /// 執行組織當日的摘要（日期取自 `request.as_of`）
    pub fn run(
        &self,
        org_id: &str,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<DailyDigest> {
        if org_id.trim().is_empty() {
            return Err(ReplenishError::invalid("組織ID不可為空"));
        }

        let key = ClaimKey::new(org_id, request.as_of);
        match self.claims.try_claim(&key)? {
            ClaimOutcome::AlreadyCompleted(digest) => {
                tracing::info!("組織 {} {} 的摘要已發送過", org_id, request.as_of);
                return Ok(digest.as_already_ran());
            }
            ClaimOutcome::InProgress => {
                tracing::warn!("組織 {} {} 的摘要正由其他請求執行", org_id, request.as_of);
                return Err(ReplenishError::conflict(
                    org_id,
                    format!("{} 的摘要執行中", request.as_of),
                ));
            }
            ClaimOutcome::Claimed => {}
        }

        let outcome = self
            .build(org_id, inventory, velocities, request)
            .and_then(|digest| {
                self.sender.send_digest(&digest)?;
                Ok(digest)
            });

        match outcome {
            Ok(digest) => {
                if let Err(err) = self.claims.complete(&key, &digest) {
                    // 通知已送出，標記仍停在執行中，需人工補登完成狀態
                    tracing::warn!(
                        "組織 {} {} 摘要已發送，但完成標記寫入失敗，需人工核對: {}",
                        org_id,
                        request.as_of,
                        err
                    );
                    return Err(err);
                }
                if digest.has_alerts() {
                    tracing::info!(
                        "組織 {} {} 摘要已發送：高風險 {} 筆，中風險 {} 筆",
                        org_id,
                        request.as_of,
                        digest.high_count,
                        digest.medium_count
                    );
                } else {
                    tracing::info!("組織 {} {} 摘要已發送：無缺貨風險", org_id, request.as_of);
                }
                Ok(digest)
            }
            Err(err) => {
                tracing::warn!("組織 {} {} 摘要失敗，釋放標記: {}", org_id, request.as_of, err);
                self.claims.release(&key)?;
                Err(err)
            }
        }
    }

    fn build(
        &self,
        org_id: &str,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<DailyDigest> {
        let risks = self.engine.classify_all(inventory, velocities, request)?;

        let high_count = risks.iter().filter(|r| r.tier == RiskTier::High).count();
        let medium_count = risks.iter().filter(|r| r.tier == RiskTier::Medium).count();

        Ok(DailyDigest {
            date: request.as_of,
            org_id: org_id.to_string(),
            high: Self::soonest(&risks, self.engine.config().digest_top_n),
            medium_count,
            high_count,
            already_ran: false,
        })
    }

    /// 高、中風險中最快缺貨的前 N 筆（同天數依 SKU 排序）
    fn soonest(risks: &[StockoutRisk], top_n: usize) -> Vec<DigestEntry> {
        let mut alerting: Vec<&StockoutRisk> =
            risks.iter().filter(|r| r.tier.is_alerting()).collect();
        alerting.sort_by(|a, b| {
            let a_days = a.days_to_stockout.unwrap_or(Decimal::MAX);
            let b_days = b.days_to_stockout.unwrap_or(Decimal::MAX);
            a_days.cmp(&b_days).then_with(|| a.sku.cmp(&b.sku))
        });
        alerting
            .into_iter()
            .take(top_n)
            .map(DigestEntry::from)
            .collect()
    }
}
