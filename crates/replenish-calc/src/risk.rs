//! 缺貨風險分級

use replenish_core::{ChosenVelocity, EngineConfig, Product, RiskTier, StockoutRisk};
use rust_decimal::Decimal;

/// 缺貨風險分級器
///
/// 不經過補貨管線（不套用 MOQ、包裝、上限），只看庫存與速度。
pub struct RiskClassifier;

impl RiskClassifier {
    /// 評估單一物料的缺貨風險
    pub fn classify(
        product: &Product,
        on_hand: Decimal,
        velocity: &ChosenVelocity,
        config: &EngineConfig,
    ) -> replenish_core::Result<StockoutRisk> {
        product.validate()?;

        let days = Self::days_to_stockout(on_hand, velocity.velocity, config.epsilon);
        let computed = Self::tier_for(days, config);

        let below_reorder_point = on_hand < product.reorder_point;
        let tier = if below_reorder_point {
            computed.floor_at_medium()
        } else {
            computed
        };

        // 無速度但仍有庫存時，缺貨天數沒有意義
        let reported_days = if velocity.is_zero() && on_hand > Decimal::ZERO {
            None
        } else {
            Some(days)
        };

        Ok(StockoutRisk {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            on_hand,
            chosen_velocity: velocity.velocity,
            velocity_source: velocity.source,
            days_to_stockout: reported_days,
            tier,
            floored_by_reorder_point: tier != computed,
        })
    }

    /// 缺貨天數 = 庫存 / max(速度, ε)；庫存為零或負時視為 0
    pub fn days_to_stockout(on_hand: Decimal, velocity: Decimal, epsilon: Decimal) -> Decimal {
        if on_hand <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        on_hand
            .checked_div(velocity.max(epsilon))
            .unwrap_or(Decimal::MAX)
    }

    /// 依門檻分級
    pub fn tier_for(days: Decimal, config: &EngineConfig) -> RiskTier {
        let thresholds = &config.risk_thresholds;
        if days <= Decimal::from(thresholds.high_days) {
            RiskTier::High
        } else if days <= Decimal::from(thresholds.medium_days) {
            RiskTier::Medium
        } else if days <= Decimal::from(thresholds.low_days) {
            RiskTier::Low
        } else {
            RiskTier::None
        }
    }
}
