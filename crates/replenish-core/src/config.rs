//! 引擎配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 引擎層級的預設值與常數
///
/// 物料本身未設定時才會使用這裡的預設值。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 預設安全庫存天數
    pub default_safety_stock_days: u32,

    /// 預設包裝倍數
    pub default_pack_size: Decimal,

    /// 除法保護用的極小值（速度為零時）
    pub epsilon: Decimal,

    /// 最短計劃時界（天）
    pub min_horizon_days: u32,

    /// 風險分級門檻
    pub risk_thresholds: RiskThresholds,

    /// 每日摘要列出的最急迫物料數
    pub digest_top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_safety_stock_days: 3,
            default_pack_size: Decimal::ONE,
            epsilon: Decimal::new(1, 6),
            min_horizon_days: 7,
            risk_thresholds: RiskThresholds::default(),
            digest_top_n: 5,
        }
    }
}

impl EngineConfig {
    /// 從 JSON 載入配置，缺少的欄位使用預設值
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| crate::ReplenishError::invalid(format!("配置格式錯誤: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置預設安全庫存天數
    pub fn with_default_safety_stock_days(mut self, days: u32) -> Self {
        self.default_safety_stock_days = days;
        self
    }

    /// 建構器模式：設置預設包裝倍數
    pub fn with_default_pack_size(mut self, pack_size: Decimal) -> Self {
        self.default_pack_size = pack_size;
        self
    }

    /// 建構器模式：設置極小值
    pub fn with_epsilon(mut self, epsilon: Decimal) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// 建構器模式：設置風險門檻
    pub fn with_risk_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.risk_thresholds = thresholds;
        self
    }

    /// 建構器模式：設置摘要筆數
    pub fn with_digest_top_n(mut self, top_n: usize) -> Self {
        self.digest_top_n = top_n;
        self
    }

    /// 檢查配置是否合法
    pub fn validate(&self) -> crate::Result<()> {
        if self.default_pack_size <= Decimal::ZERO {
            return Err(crate::ReplenishError::invalid(format!(
                "預設包裝倍數必須大於 0，目前為 {}",
                self.default_pack_size
            )));
        }
        if self.epsilon <= Decimal::ZERO {
            return Err(crate::ReplenishError::invalid("epsilon 必須為正數"));
        }
        self.risk_thresholds.validate()
    }
}

/// 缺貨風險分級門檻（天）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub high_days: u32,
    pub medium_days: u32,
    pub low_days: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_days: 7,
            medium_days: 14,
            low_days: 30,
        }
    }
}

impl RiskThresholds {
    fn validate(&self) -> crate::Result<()> {
        if self.high_days > self.medium_days || self.medium_days > self.low_days {
            return Err(crate::ReplenishError::invalid(format!(
                "風險門檻必須遞增: {}/{}/{}",
                self.high_days, self.medium_days, self.low_days
            )));
        }
        Ok(())
    }
}
