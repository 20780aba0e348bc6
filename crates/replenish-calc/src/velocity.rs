//! 銷售速度選擇

use replenish_core::{ChosenVelocity, ReplenishError, VelocityStrategy, VelocityWindow};
use rust_decimal::Decimal;

/// 速度選擇器（純函數）
pub struct VelocitySelector;

impl VelocitySelector {
    /// 依策略選出單一速度與其來源
    pub fn select(
        window: &VelocityWindow,
        strategy: VelocityStrategy,
    ) -> replenish_core::Result<ChosenVelocity> {
        Self::validate(window)?;

        let mut non_zero = window
            .by_priority()
            .into_iter()
            .filter(|(_, v)| *v > Decimal::ZERO);

        let chosen = match strategy {
            VelocityStrategy::Latest => non_zero.next(),
            // 相同數值時保留較短的視窗
            VelocityStrategy::Conservative => non_zero.fold(None, |best, (source, v)| match best {
                Some((_, best_v)) if best_v <= v => best,
                _ => Some((source, v)),
            }),
        };

        Ok(chosen
            .map(|(source, velocity)| ChosenVelocity { velocity, source })
            .unwrap_or_else(ChosenVelocity::none))
    }

    /// 以策略字串選擇（未知策略回傳參數錯誤）
    pub fn select_by_name(
        window: &VelocityWindow,
        strategy: &str,
    ) -> replenish_core::Result<ChosenVelocity> {
        Self::select(window, strategy.parse()?)
    }

    fn validate(window: &VelocityWindow) -> replenish_core::Result<()> {
        for (source, v) in window.by_priority() {
            if v < Decimal::ZERO {
                return Err(ReplenishError::invalid(format!(
                    "{source} 速度不可為負數: {v}"
                )));
            }
        }
        Ok(())
    }
}
