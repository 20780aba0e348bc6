//! 摘要通知發送介面

use replenish_core::DailyDigest;

/// 通知發送器（實際傳輸由外部實作）
pub trait NotificationSender: Send + Sync {
    /// 發送每日摘要；失敗時摘要不會被標記完成
    fn send_digest(&self, digest: &DailyDigest) -> replenish_core::Result<()>;
}

/// 只寫入日誌的發送器
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSender;

impl NotificationSender for LogSender {
    fn send_digest(&self, digest: &DailyDigest) -> replenish_core::Result<()> {
        tracing::info!(
            "組織 {} {} 缺貨摘要：高風險 {} 筆，中風險 {} 筆",
            digest.org_id,
            digest.date,
            digest.high_count,
            digest.medium_count
        );
        for entry in &digest.high {
            tracing::info!(
                "  {} {} 庫存 {} 預計 {} 天缺貨（{}）",
                entry.sku,
                entry.name,
                entry.on_hand,
                entry
                    .days_to_stockout
                    .map_or_else(|| "-".to_string(), |d| d.round_dp(1).to_string()),
                entry.velocity_source
            );
        }
        Ok(())
    }
}
