//! 每日缺貨摘要模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{RiskTier, StockoutRisk, VelocitySource};

/// 摘要中的單一物料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestEntry {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub on_hand: Decimal,
    pub days_to_stockout: Option<Decimal>,
    pub velocity_source: VelocitySource,
    pub tier: RiskTier,
}

impl From<&StockoutRisk> for DigestEntry {
    fn from(risk: &StockoutRisk) -> Self {
        Self {
            product_id: risk.product_id.clone(),
            sku: risk.sku.clone(),
            name: risk.name.clone(),
            on_hand: risk.on_hand,
            days_to_stockout: risk.days_to_stockout,
            velocity_source: risk.velocity_source,
            tier: risk.tier,
        }
    }
}

/// 每日摘要（每個組織每天一份）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDigest {
    pub date: NaiveDate,
    pub org_id: String,
    /// 最快缺貨的物料（跨高、中風險）
    pub high: Vec<DigestEntry>,
    pub medium_count: usize,
    pub high_count: usize,
    pub already_ran: bool,
}

impl DailyDigest {
    /// 是否有任何需要提醒的物料
    pub fn has_alerts(&self) -> bool {
        self.high_count + self.medium_count > 0
    }

    /// 標記為重複執行的結果
    pub fn as_already_ran(mut self) -> Self {
        self.already_ran = true;
        self
    }
}
