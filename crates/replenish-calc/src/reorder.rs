//! 補貨量計算管線
//!
//! 建議與說明共用同一個實作：每一步都是純函數，接收 `(數量, 原因)`
//! 並回傳新的 `(數量, 原因)`，說明追蹤只是把每一步的結果記錄下來。

use replenish_core::{
    ChosenVelocity, EngineConfig, ExplainTrace, Product, ReasonCode, ReorderSuggestion,
    ReplenishError, Supplier,
};
use rust_decimal::Decimal;

/// 單一物料的計算輸入
#[derive(Debug, Clone)]
pub struct ReorderInput<'a> {
    pub product: &'a Product,
    pub supplier: Option<&'a Supplier>,
    pub on_hand: Decimal,
    /// 計劃時界內的在途數量
    pub incoming: Decimal,
    pub velocity: ChosenVelocity,
    pub horizon_days_override: Option<i32>,
}

/// 管線中流動的數量與原因
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub quantity: Decimal,
    pub reasons: Vec<ReasonCode>,
}

impl Adjustment {
    /// 以缺口作為起始數量
    pub fn new(quantity: Decimal) -> Self {
        Self {
            quantity,
            reasons: Vec::new(),
        }
    }

    fn with(mut self, quantity: Decimal, reason: ReasonCode) -> Self {
        self.quantity = quantity;
        self.reasons.push(reason);
        self
    }

    fn tag(mut self, reason: ReasonCode) -> Self {
        self.reasons.push(reason);
        self
    }

    /// 低於再訂購點時，至少補到再訂購點
    ///
    /// 差額溢出時回傳 `None`。
    pub fn bump_reorder_point(self, on_hand: Decimal, reorder_point: Decimal) -> Option<Self> {
        if on_hand >= reorder_point {
            return Some(self);
        }
        let gap = reorder_point.checked_sub(on_hand)?.ceil();
        let quantity = self.quantity.max(gap);
        Some(self.with(quantity, ReasonCode::BelowReorderPoint))
    }

    /// 無速度時：庫存充足則不訂，否則保留再訂購點的補量
    pub fn guard_zero_velocity(
        self,
        velocity: &ChosenVelocity,
        on_hand: Decimal,
        reorder_point: Decimal,
    ) -> Self {
        if !velocity.is_zero() {
            return self;
        }
        if on_hand >= reorder_point {
            self.with(Decimal::ZERO, ReasonCode::ZeroVelocitySkipped)
        } else {
            self.tag(ReasonCode::NoVelocity)
        }
    }

    /// 提高至最小訂購量
    pub fn enforce_moq(self, moq: Decimal) -> Self {
        if self.quantity > Decimal::ZERO && self.quantity < moq {
            self.with(moq, ReasonCode::MoqEnforced)
        } else {
            self
        }
    }

    /// 進位至包裝倍數（溢出時回傳 `None`）
    pub fn round_to_pack(self, pack_size: Decimal) -> Option<Self> {
        if pack_size <= Decimal::ONE || self.quantity <= Decimal::ZERO {
            return Some(self);
        }
        let rounded = round_up_to_multiple(self.quantity, pack_size)?;
        Some(if rounded != self.quantity {
            self.with(rounded, ReasonCode::PackRounded)
        } else {
            self
        })
    }

    /// 以最大庫存天數設上限
    ///
    /// 上限會向下取到包裝倍數。上限落在 (0, MOQ) 之間時與最小訂購量衝突，
    /// 最小訂購量為硬下限，改為標記衝突。
    pub fn cap_max_stock(
        self,
        allowed: Decimal,
        moq: Decimal,
        pack_size: Decimal,
    ) -> Option<Self> {
        if self.quantity <= allowed {
            return Some(self);
        }
        if allowed > Decimal::ZERO && allowed < moq {
            let moq_floor = if pack_size > Decimal::ONE {
                round_up_to_multiple(moq, pack_size)?
            } else {
                moq
            };
            let quantity = self.quantity.min(moq_floor);
            return Some(self.with(quantity, ReasonCode::MoqCapConflict));
        }
        Some(self.with(allowed, ReasonCode::CappedByMaxDays))
    }
}

/// 補貨量計算器
pub struct ReorderCalculator;

impl ReorderCalculator {
    /// 計算補貨建議
    pub fn suggest(
        input: &ReorderInput<'_>,
        config: &EngineConfig,
    ) -> replenish_core::Result<ReorderSuggestion> {
        Self::explain(input, config).map(|trace| trace.suggestion)
    }

    /// 計算計劃時界：有覆寫值用覆寫值，否則 max(最短時界, 交期 + 安全庫存天數)
    pub fn horizon_days(
        product: &Product,
        supplier: Option<&Supplier>,
        horizon_days_override: Option<i32>,
        config: &EngineConfig,
    ) -> replenish_core::Result<u32> {
        if let Some(days) = horizon_days_override {
            return u32::try_from(days).map_err(|_| {
                ReplenishError::invalid(format!("計劃時界覆寫值不可為負數: {days}"))
            });
        }
        let lead_time = supplier.map_or(0, |s| s.lead_time_days);
        let covered = lead_time.saturating_add(product.effective_safety_stock_days(config));
        Ok(covered.max(config.min_horizon_days))
    }

    /// 執行完整管線並保留每個中間值
    pub fn explain(
        input: &ReorderInput<'_>,
        config: &EngineConfig,
    ) -> replenish_core::Result<ExplainTrace> {
        Self::validate(input)?;

        let product = input.product;
        let velocity = input.velocity.velocity;
        let lead_time_days = input.supplier.map_or(0, |s| s.lead_time_days);
        let moq = input.supplier.map_or(Decimal::ZERO, |s| s.moq);
        let pack_size = product.effective_pack_size(config);

        // Step 1-4: 時界、需求預測、淨可用量、缺口
        let horizon_days =
            Self::horizon_days(product, input.supplier, input.horizon_days_override, config)?;
        let demand_forecast_units = velocity
            .checked_mul(Decimal::from(horizon_days))
            .ok_or_else(|| overflow(&product.id, "需求預測"))?;
        let net_available = input
            .on_hand
            .checked_add(input.incoming)
            .ok_or_else(|| overflow(&product.id, "淨可用量"))?;
        let raw_shortfall = demand_forecast_units
            .checked_sub(net_available)
            .ok_or_else(|| overflow(&product.id, "缺口"))?
            .max(Decimal::ZERO);

        let adjustment = Adjustment::new(raw_shortfall.ceil());
        let after_shortfall = adjustment.quantity;

        // Step 5: 再訂購點
        let adjustment = adjustment
            .bump_reorder_point(input.on_hand, product.reorder_point)
            .ok_or_else(|| overflow(&product.id, "再訂購點補量"))?;
        let after_reorder_point = adjustment.quantity;

        // Step 6: 零速度保護
        let adjustment =
            adjustment.guard_zero_velocity(&input.velocity, input.on_hand, product.reorder_point);
        let after_velocity_guard = adjustment.quantity;

        // Step 7: 最小訂購量
        let adjustment = adjustment.enforce_moq(moq);
        let after_moq = adjustment.quantity;

        // Step 8: 包裝倍數
        let adjustment = adjustment
            .round_to_pack(pack_size)
            .ok_or_else(|| overflow(&product.id, "包裝進位"))?;
        let after_pack = adjustment.quantity;

        // Step 9: 最大庫存天數
        let max_stock_allowed = match product.max_stock_days {
            Some(days) if velocity > Decimal::ZERO => {
                Some(Self::max_stock_allowed(days, velocity, net_available, pack_size, &product.id)?)
            }
            _ => None,
        };
        let adjustment = match max_stock_allowed {
            Some(allowed) => adjustment
                .cap_max_stock(allowed, moq, pack_size)
                .ok_or_else(|| overflow(&product.id, "最小訂購量"))?,
            None => adjustment,
        };
        let after_cap = adjustment.quantity;

        // Step 10-11: 覆蓋天數與資訊性標記
        let recommended_quantity = adjustment.quantity;
        let days_cover_current = cover_days(input.on_hand, velocity);
        let stocked_after = net_available
            .checked_add(recommended_quantity)
            .ok_or_else(|| overflow(&product.id, "補貨後庫存"))?;
        let days_cover_after = cover_days(stocked_after, velocity);

        let mut reasons = adjustment.reasons;
        if days_cover_current.is_some_and(|days| days < Decimal::from(lead_time_days)) {
            reasons.push(ReasonCode::LeadTimeRisk);
        }
        if input.incoming > Decimal::ZERO {
            reasons.push(ReasonCode::IncomingCoverage);
        }

        // Step 12: 無供應商
        if product.preferred_supplier_id.is_none() {
            reasons.push(ReasonCode::NoSupplier);
        }

        tracing::debug!(
            "物料 {} 建議量 {}（缺口 {}，時界 {} 天，原因 {:?}）",
            product.id,
            recommended_quantity,
            raw_shortfall,
            horizon_days,
            reasons
        );

        Ok(ExplainTrace {
            horizon_days,
            demand_forecast_units,
            net_available,
            raw_shortfall,
            after_shortfall,
            after_reorder_point,
            after_velocity_guard,
            after_moq,
            after_pack,
            after_cap,
            max_stock_allowed,
            suggestion: ReorderSuggestion {
                product_id: product.id.clone(),
                sku: product.sku.clone(),
                supplier_id: product.preferred_supplier_id.clone(),
                on_hand: input.on_hand,
                incoming: input.incoming,
                chosen_velocity: velocity,
                velocity_source: input.velocity.source,
                horizon_days,
                demand_forecast_units,
                recommended_quantity,
                reasons,
                days_cover_current,
                days_cover_after,
            },
        })
    }

    /// 讓覆蓋天數剛好等於最大庫存天數的訂購量（不為負，向下取到包裝倍數）
    fn max_stock_allowed(
        max_stock_days: u32,
        velocity: Decimal,
        net_available: Decimal,
        pack_size: Decimal,
        product_id: &str,
    ) -> replenish_core::Result<Decimal> {
        let target = velocity
            .checked_mul(Decimal::from(max_stock_days))
            .ok_or_else(|| overflow(product_id, "最大庫存量"))?;
        let allowed = target
            .checked_sub(net_available)
            .ok_or_else(|| overflow(product_id, "最大庫存量"))?
            .max(Decimal::ZERO);
        if pack_size <= Decimal::ONE {
            return Ok(allowed.floor());
        }
        allowed
            .checked_div(pack_size)
            .and_then(|packs| packs.floor().checked_mul(pack_size))
            .ok_or_else(|| overflow(product_id, "最大庫存量"))
    }

    fn validate(input: &ReorderInput<'_>) -> replenish_core::Result<()> {
        input.product.validate()?;
        if let Some(supplier) = input.supplier {
            supplier.validate()?;
        }
        if input.velocity.velocity < Decimal::ZERO {
            return Err(ReplenishError::invalid(format!(
                "物料 {} 的速度不可為負數: {}",
                input.product.id, input.velocity.velocity
            )));
        }
        if input.incoming < Decimal::ZERO {
            return Err(ReplenishError::invalid(format!(
                "物料 {} 的在途數量不可為負數: {}",
                input.product.id, input.incoming
            )));
        }
        Ok(())
    }
}

/// 向上取到倍數
fn round_up_to_multiple(quantity: Decimal, multiple: Decimal) -> Option<Decimal> {
    let remainder = quantity.checked_rem(multiple)?;
    if remainder > Decimal::ZERO {
        quantity.checked_sub(remainder)?.checked_add(multiple)
    } else {
        Some(quantity)
    }
}

/// 覆蓋天數，無速度時為空
fn cover_days(units: Decimal, velocity: Decimal) -> Option<Decimal> {
    if velocity.is_zero() {
        None
    } else {
        Some(units.checked_div(velocity).unwrap_or(Decimal::MAX))
    }
}

fn overflow(product_id: &str, what: &str) -> ReplenishError {
    ReplenishError::invalid(format!("物料 {product_id} 的{what}數值溢出"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use replenish_core::VelocitySource;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn chosen(value: &str) -> ChosenVelocity {
        let velocity = d(value);
        if velocity.is_zero() {
            ChosenVelocity::none()
        } else {
            ChosenVelocity {
                velocity,
                source: VelocitySource::Days7,
            }
        }
    }

    fn supplier(lead_time: u32, moq: i64) -> Supplier {
        Supplier::new("S-001".to_string(), lead_time).with_moq(Decimal::from(moq))
    }

    fn product() -> Product {
        Product::new("P-001".to_string(), "BEAN-1KG".to_string()).with_supplier("S-001".to_string())
    }

    fn run(
        product: &Product,
        supplier: Option<&Supplier>,
        on_hand: &str,
        incoming: &str,
        velocity: &str,
    ) -> ExplainTrace {
        let input = ReorderInput {
            product,
            supplier,
            on_hand: d(on_hand),
            incoming: d(incoming),
            velocity: chosen(velocity),
            horizon_days_override: None,
        };
        ReorderCalculator::explain(&input, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_moq_and_pack_scenario() {
        // 庫存 15、交期 10、安全庫存 5 天、速度 2.5、MOQ 50、包裝 12
        let product = product().with_safety_stock_days(5).with_pack_size(Decimal::from(12));
        let supplier = supplier(10, 50);

        let trace = run(&product, Some(&supplier), "15", "0", "2.5");

        assert_eq!(trace.horizon_days, 15);
        assert_eq!(trace.demand_forecast_units, d("37.5"));
        assert_eq!(trace.raw_shortfall, d("22.5"));
        assert_eq!(trace.after_moq, Decimal::from(50));
        assert_eq!(trace.after_pack, Decimal::from(60));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(60));
        assert!(trace.suggestion.has_reason(ReasonCode::MoqEnforced));
        assert!(trace.suggestion.has_reason(ReasonCode::PackRounded));
        // 15 / 2.5 = 6 天 < 交期 10 天
        assert!(trace.suggestion.has_reason(ReasonCode::LeadTimeRisk));
        assert_eq!(trace.suggestion.days_cover_current, Some(Decimal::from(6)));
        assert_eq!(trace.suggestion.days_cover_after, Some(Decimal::from(30)));
    }

    #[test]
    fn test_horizon_floor_and_override() {
        let config = EngineConfig::default();
        let product = product().with_safety_stock_days(1);
        let supplier = supplier(2, 0);

        assert_eq!(
            ReorderCalculator::horizon_days(&product, Some(&supplier), None, &config).unwrap(),
            7
        );
        assert_eq!(
            ReorderCalculator::horizon_days(&product, Some(&supplier), Some(3), &config).unwrap(),
            3
        );
        assert!(matches!(
            ReorderCalculator::horizon_days(&product, Some(&supplier), Some(-1), &config),
            Err(ReplenishError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_velocity_with_adequate_stock() {
        let product = product().with_reorder_point(Decimal::from(10));
        let supplier = supplier(5, 20);

        let trace = run(&product, Some(&supplier), "25", "0", "0");

        assert_eq!(trace.suggestion.recommended_quantity, Decimal::ZERO);
        assert_eq!(trace.suggestion.reasons, vec![ReasonCode::ZeroVelocitySkipped]);
        assert!(trace.suggestion.days_cover_current.is_none());
        assert!(trace.suggestion.days_cover_after.is_none());
    }

    #[test]
    fn test_zero_velocity_below_reorder_point_keeps_bump() {
        let product = product().with_reorder_point(Decimal::from(10));
        let supplier = supplier(5, 0);

        let trace = run(&product, Some(&supplier), "4", "0", "0");

        assert_eq!(trace.after_reorder_point, Decimal::from(6));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(6));
        assert_eq!(
            trace.suggestion.reasons,
            vec![ReasonCode::BelowReorderPoint, ReasonCode::NoVelocity]
        );
    }

    #[test]
    fn test_reorder_point_bump_beats_small_shortfall() {
        let product = product().with_reorder_point(Decimal::from(40));
        let supplier = supplier(3, 0);

        // 時界 7 天 × 1 = 7，庫存 10 → 無缺口，但低於再訂購點 40
        let trace = run(&product, Some(&supplier), "10", "0", "1");

        assert_eq!(trace.raw_shortfall, Decimal::ZERO);
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(30));
        assert_eq!(trace.suggestion.reasons[0], ReasonCode::BelowReorderPoint);
    }

    #[test]
    fn test_fractional_shortfall_rounds_up_to_whole_unit() {
        let product = product();
        let supplier = supplier(4, 0);

        // 時界 7 天 × 1.1 = 7.7
        let trace = run(&product, Some(&supplier), "0", "0", "1.1");

        assert_eq!(trace.raw_shortfall, d("7.7"));
        assert_eq!(trace.after_shortfall, Decimal::from(8));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(8));
    }

    #[test]
    fn test_incoming_reduces_shortfall() {
        let product = product();
        let supplier = supplier(10, 0);

        // 時界 13 天 × 2 = 26；庫存 5 + 在途 10 → 缺口 11
        let trace = run(&product, Some(&supplier), "5", "10", "2");

        assert_eq!(trace.net_available, Decimal::from(15));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(11));
        assert!(trace.suggestion.has_reason(ReasonCode::IncomingCoverage));
    }

    #[test]
    fn test_max_stock_cap() {
        // 時界 20 天 × 10 = 200，上限 10 天 × 10 = 100
        let product = product().with_max_stock_days(10).with_safety_stock_days(10);
        let supplier = supplier(10, 0);

        let trace = run(&product, Some(&supplier), "20", "0", "10");

        assert_eq!(trace.after_pack, Decimal::from(180));
        assert_eq!(trace.max_stock_allowed, Some(Decimal::from(80)));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(80));
        assert!(trace.suggestion.has_reason(ReasonCode::CappedByMaxDays));
        assert_eq!(trace.suggestion.days_cover_after, Some(Decimal::from(10)));
    }

    #[test]
    fn test_cap_rounds_down_to_pack_multiple() {
        let product = product()
            .with_max_stock_days(10)
            .with_safety_stock_days(10)
            .with_pack_size(Decimal::from(12));
        let supplier = supplier(10, 0);

        let trace = run(&product, Some(&supplier), "20", "0", "10");

        // 允許 80 → 向下取到 12 的倍數 72
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(72));
        assert_eq!(trace.suggestion.recommended_quantity % Decimal::from(12), Decimal::ZERO);
    }

    #[test]
    fn test_cap_to_zero_when_already_overstocked() {
        let product = product()
            .with_max_stock_days(5)
            .with_reorder_point(Decimal::from(100));
        let supplier = supplier(3, 0);

        let trace = run(&product, Some(&supplier), "60", "0", "10");

        assert_eq!(trace.after_reorder_point, Decimal::from(40));
        assert_eq!(trace.max_stock_allowed, Some(Decimal::ZERO));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::ZERO);
        assert!(trace.suggestion.has_reason(ReasonCode::CappedByMaxDays));
    }

    #[test]
    fn test_moq_cap_conflict_keeps_moq() {
        // 缺口 7，MOQ 50 → 50；上限 3 天 × 1 − 0 = 3，落在 (0, 50)
        let product = product().with_max_stock_days(3);
        let supplier = supplier(4, 50);

        let trace = run(&product, Some(&supplier), "0", "0", "1");

        assert_eq!(trace.max_stock_allowed, Some(Decimal::from(3)));
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(50));
        assert!(trace.suggestion.has_reason(ReasonCode::MoqCapConflict));
        assert!(!trace.suggestion.has_reason(ReasonCode::CappedByMaxDays));
    }

    #[test]
    fn test_no_supplier_still_suggests() {
        let product = Product::new("P-009".to_string(), "FILTER".to_string());

        let trace = run(&product, None, "0", "0", "2");

        // 無供應商：交期視為 0，時界 max(7, 0 + 3) = 7
        assert_eq!(trace.horizon_days, 7);
        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(14));
        assert_eq!(trace.suggestion.reasons.last(), Some(&ReasonCode::NoSupplier));
        assert!(trace.suggestion.supplier_id.is_none());
    }

    #[test]
    fn test_pack_already_multiple_is_not_tagged() {
        let product = product().with_pack_size(Decimal::from(7));
        let supplier = supplier(4, 0);

        let trace = run(&product, Some(&supplier), "0", "0", "1");

        assert_eq!(trace.suggestion.recommended_quantity, Decimal::from(7));
        assert!(!trace.suggestion.has_reason(ReasonCode::PackRounded));
    }

    #[test]
    fn test_reject_negative_inputs() {
        let product = product();
        let supplier = supplier(4, 0);
        let input = ReorderInput {
            product: &product,
            supplier: Some(&supplier),
            on_hand: Decimal::ZERO,
            incoming: Decimal::from(-1),
            velocity: chosen("1"),
            horizon_days_override: None,
        };
        assert!(ReorderCalculator::explain(&input, &EngineConfig::default()).is_err());

        let bad_supplier = Supplier::new("S-001".to_string(), 4).with_moq(Decimal::from(-3));
        let input = ReorderInput {
            supplier: Some(&bad_supplier),
            incoming: Decimal::ZERO,
            ..input
        };
        assert!(matches!(
            ReorderCalculator::explain(&input, &EngineConfig::default()),
            Err(ReplenishError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_extreme_stock_reports_overflow() {
        let product = product().with_reorder_point(Decimal::from(10));
        let supplier = supplier(4, 0);
        let input = ReorderInput {
            product: &product,
            supplier: Some(&supplier),
            on_hand: -Decimal::MAX,
            incoming: Decimal::ZERO,
            velocity: chosen("1"),
            horizon_days_override: None,
        };

        assert!(matches!(
            ReorderCalculator::explain(&input, &EngineConfig::default()),
            Err(ReplenishError::InvalidArgument(_))
        ));

        // 無速度時缺口恰為 Decimal::MAX，溢出發生在再訂購點補量
        let input = ReorderInput {
            velocity: chosen("0"),
            ..input
        };
        assert!(matches!(
            ReorderCalculator::suggest(&input, &EngineConfig::default()),
            Err(ReplenishError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pack_rounding_overflow() {
        // Decimal::MAX 為奇數，進位到 2 的倍數會超出範圍
        assert_eq!(round_up_to_multiple(Decimal::MAX, Decimal::from(2)), None);
        assert_eq!(
            Adjustment::new(Decimal::MAX).round_to_pack(Decimal::from(2)),
            None
        );
        assert_eq!(
            round_up_to_multiple(Decimal::from(38), Decimal::from(12)),
            Some(Decimal::from(48))
        );
    }

    #[test]
    fn test_suggest_matches_explain() {
        let product = product()
            .with_reorder_point(Decimal::from(30))
            .with_pack_size(Decimal::from(6))
            .with_max_stock_days(20);
        let supplier = supplier(8, 24);
        let input = ReorderInput {
            product: &product,
            supplier: Some(&supplier),
            on_hand: d("12"),
            incoming: d("6"),
            velocity: chosen("3.4"),
            horizon_days_override: None,
        };
        let config = EngineConfig::default();

        let suggestion = ReorderCalculator::suggest(&input, &config).unwrap();
        let trace = ReorderCalculator::explain(&input, &config).unwrap();

        assert_eq!(suggestion, trace.suggestion);
    }
}
