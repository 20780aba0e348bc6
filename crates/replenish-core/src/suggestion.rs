//! 補貨建議與說明追蹤模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::VelocitySource;

/// 調整原因代碼（依管線步驟順序累加）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// 現有庫存低於再訂購點
    BelowReorderPoint,
    /// 無需求且庫存充足，不建議訂購
    ZeroVelocitySkipped,
    /// 無需求訊號，訂購量由再訂購點決定
    NoVelocity,
    /// 提高至最小訂購量
    MoqEnforced,
    /// 進位至包裝倍數
    PackRounded,
    /// 受最大庫存天數限制
    CappedByMaxDays,
    /// 最大庫存上限與最小訂購量衝突，保留最小訂購量
    MoqCapConflict,
    /// 現有庫存撐不到交期
    LeadTimeRisk,
    /// 計劃時界內有在途採購
    IncomingCoverage,
    /// 未設定供應商
    NoSupplier,
}

impl ReasonCode {
    /// 對外代碼
    pub fn code(self) -> &'static str {
        match self {
            ReasonCode::BelowReorderPoint => "BELOW_REORDER_POINT",
            ReasonCode::ZeroVelocitySkipped => "ZERO_VELOCITY_SKIPPED",
            ReasonCode::NoVelocity => "NO_VELOCITY",
            ReasonCode::MoqEnforced => "MOQ_ENFORCED",
            ReasonCode::PackRounded => "PACK_ROUNDED",
            ReasonCode::CappedByMaxDays => "CAPPED_BY_MAX_DAYS",
            ReasonCode::MoqCapConflict => "MOQ_CAP_CONFLICT",
            ReasonCode::LeadTimeRisk => "LEAD_TIME_RISK",
            ReasonCode::IncomingCoverage => "INCOMING_COVERAGE",
            ReasonCode::NoSupplier => "NO_SUPPLIER",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 補貨建議（引擎輸出，不由引擎保存）
///
/// 欄位名稱是對外契約，只能新增不能更名。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderSuggestion {
    pub product_id: String,
    pub sku: String,
    pub supplier_id: Option<String>,
    pub on_hand: Decimal,
    pub incoming: Decimal,
    pub chosen_velocity: Decimal,
    pub velocity_source: VelocitySource,
    pub horizon_days: u32,
    pub demand_forecast_units: Decimal,
    pub recommended_quantity: Decimal,
    pub reasons: Vec<ReasonCode>,
    pub days_cover_current: Option<Decimal>,
    pub days_cover_after: Option<Decimal>,
}

impl ReorderSuggestion {
    /// 是否包含指定原因
    pub fn has_reason(&self, reason: ReasonCode) -> bool {
        self.reasons.contains(&reason)
    }

    /// 是否需要下單
    pub fn needs_order(&self) -> bool {
        self.recommended_quantity > Decimal::ZERO
    }

    /// 原因代碼字串（供匯出）
    pub fn reason_codes(&self) -> Vec<&'static str> {
        self.reasons.iter().map(|r| r.code()).collect()
    }
}

/// 單一物料的說明追蹤
///
/// 與建議共用同一條管線產生，每個中間值都保留下來。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainTrace {
    pub horizon_days: u32,
    pub demand_forecast_units: Decimal,
    pub net_available: Decimal,
    pub raw_shortfall: Decimal,
    /// 缺口進位至整數單位後
    pub after_shortfall: Decimal,
    pub after_reorder_point: Decimal,
    pub after_velocity_guard: Decimal,
    pub after_moq: Decimal,
    pub after_pack: Decimal,
    pub after_cap: Decimal,
    /// 最大庫存天數允許的訂購量（未設定或無速度時為空）
    pub max_stock_allowed: Option<Decimal>,
    pub suggestion: ReorderSuggestion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_code_wire_format() {
        let json = serde_json::to_string(&vec![ReasonCode::MoqEnforced, ReasonCode::PackRounded])
            .unwrap();
        assert_eq!(json, r#"["MOQ_ENFORCED","PACK_ROUNDED"]"#);
        assert_eq!(ReasonCode::ZeroVelocitySkipped.to_string(), "ZERO_VELOCITY_SKIPPED");
    }

    #[test]
    fn test_reason_code_matches_serde() {
        let all = [
            ReasonCode::BelowReorderPoint,
            ReasonCode::ZeroVelocitySkipped,
            ReasonCode::NoVelocity,
            ReasonCode::MoqEnforced,
            ReasonCode::PackRounded,
            ReasonCode::CappedByMaxDays,
            ReasonCode::MoqCapConflict,
            ReasonCode::LeadTimeRisk,
            ReasonCode::IncomingCoverage,
            ReasonCode::NoSupplier,
        ];
        for reason in all {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.code()));
        }
    }
}
