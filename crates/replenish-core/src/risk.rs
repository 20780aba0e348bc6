//! 缺貨風險模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::VelocitySource;

/// 風險等級（由高到低排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Medium,
    Low,
    None,
}

impl RiskTier {
    /// 下限至中風險（低或無風險提升為中風險）
    pub fn floor_at_medium(self) -> Self {
        self.min(RiskTier::Medium)
    }

    /// 是否需要提醒（高或中風險）
    pub fn is_alerting(self) -> bool {
        matches!(self, RiskTier::High | RiskTier::Medium)
    }
}

/// 單一物料的缺貨風險評估
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutRisk {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub on_hand: Decimal,
    pub chosen_velocity: Decimal,
    pub velocity_source: VelocitySource,
    /// 無速度但仍有庫存時無法定義，為空
    pub days_to_stockout: Option<Decimal>,
    pub tier: RiskTier,
    /// 是否因低於再訂購點而被提升
    pub floored_by_reorder_point: bool,
}
