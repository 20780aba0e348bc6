//! 銷售速度模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 三個滾動視窗的日均銷量（由外部彙總流程提供的快照）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityWindow {
    pub v7: Decimal,
    pub v30: Decimal,
    pub v56: Decimal,
}

impl VelocityWindow {
    /// 創建新的速度視窗
    pub fn new(v7: Decimal, v30: Decimal, v56: Decimal) -> Self {
        Self { v7, v30, v56 }
    }

    /// 全部為零（無銷售）
    pub fn zero() -> Self {
        Self::default()
    }

    /// 依優先順序（7 → 30 → 56 天）列出各視窗
    pub fn by_priority(&self) -> [(VelocitySource, Decimal); 3] {
        [
            (VelocitySource::Days7, self.v7),
            (VelocitySource::Days30, self.v30),
            (VelocitySource::Days56, self.v56),
        ]
    }
}

/// 速度選擇策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityStrategy {
    /// 最近期的非零值
    Latest,
    /// 非零值中的最小值
    Conservative,
}

impl FromStr for VelocityStrategy {
    type Err = crate::ReplenishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(VelocityStrategy::Latest),
            "conservative" => Ok(VelocityStrategy::Conservative),
            other => Err(crate::ReplenishError::invalid(format!(
                "未知的速度策略: {other}，必須是 'latest' 或 'conservative'"
            ))),
        }
    }
}

impl fmt::Display for VelocityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VelocityStrategy::Latest => f.write_str("latest"),
            VelocityStrategy::Conservative => f.write_str("conservative"),
        }
    }
}

/// 選定速度的來源視窗
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VelocitySource {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "56d")]
    Days56,
    #[serde(rename = "none")]
    None,
}

impl fmt::Display for VelocitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            VelocitySource::Days7 => "7d",
            VelocitySource::Days30 => "30d",
            VelocitySource::Days56 => "56d",
            VelocitySource::None => "none",
        };
        f.write_str(tag)
    }
}

/// 選定的速度與其來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenVelocity {
    pub velocity: Decimal,
    pub source: VelocitySource,
}

impl ChosenVelocity {
    /// 無需求訊號
    pub fn none() -> Self {
        Self {
            velocity: Decimal::ZERO,
            source: VelocitySource::None,
        }
    }

    /// 是否沒有任何銷售速度
    pub fn is_zero(&self) -> bool {
        self.velocity.is_zero()
    }
}
