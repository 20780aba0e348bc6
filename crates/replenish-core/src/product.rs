//! 物料與供應商補貨政策模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::EngineConfig;

/// 物料補貨政策
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 物料ID
    pub id: String,

    /// 料號
    pub sku: String,

    /// 品名
    pub name: String,

    /// 是否啟用（停用物料不列入每日摘要）
    pub active: bool,

    /// 再訂購點（單位數量）
    pub reorder_point: Decimal,

    /// 安全庫存天數（未設定時使用引擎預設值）
    pub safety_stock_days: Option<u32>,

    /// 包裝倍數（未設定時使用引擎預設值）
    pub pack_size: Option<Decimal>,

    /// 最大庫存天數（未設定表示不設上限）
    pub max_stock_days: Option<u32>,

    /// 首選供應商
    pub preferred_supplier_id: Option<String>,

    /// 單位成本（草稿採購單使用）
    pub unit_cost: Option<Decimal>,
}

impl Product {
    /// 創建新的物料
    pub fn new(id: String, sku: String) -> Self {
        Self {
            name: sku.clone(),
            id,
            sku,
            active: true,
            reorder_point: Decimal::ZERO,
            safety_stock_days: None,
            pack_size: None,
            max_stock_days: None,
            preferred_supplier_id: None,
            unit_cost: None,
        }
    }

    /// 建構器模式：設置品名
    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    /// 建構器模式：設置再訂購點
    pub fn with_reorder_point(mut self, reorder_point: Decimal) -> Self {
        self.reorder_point = reorder_point;
        self
    }

    /// 建構器模式：設置安全庫存天數
    pub fn with_safety_stock_days(mut self, days: u32) -> Self {
        self.safety_stock_days = Some(days);
        self
    }

    /// 建構器模式：設置包裝倍數
    pub fn with_pack_size(mut self, pack_size: Decimal) -> Self {
        self.pack_size = Some(pack_size);
        self
    }

    /// 建構器模式：設置最大庫存天數
    pub fn with_max_stock_days(mut self, days: u32) -> Self {
        self.max_stock_days = Some(days);
        self
    }

    /// 建構器模式：設置首選供應商
    pub fn with_supplier(mut self, supplier_id: String) -> Self {
        self.preferred_supplier_id = Some(supplier_id);
        self
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    /// 建構器模式：設置是否啟用
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// 有效的安全庫存天數
    pub fn effective_safety_stock_days(&self, config: &EngineConfig) -> u32 {
        self.safety_stock_days
            .unwrap_or(config.default_safety_stock_days)
    }

    /// 有效的包裝倍數
    pub fn effective_pack_size(&self, config: &EngineConfig) -> Decimal {
        self.pack_size.unwrap_or(config.default_pack_size)
    }

    /// 檢查政策欄位是否合法（負數或零包裝一律拒絕，不做修正）
    pub fn validate(&self) -> crate::Result<()> {
        if self.reorder_point < Decimal::ZERO {
            return Err(crate::ReplenishError::invalid(format!(
                "物料 {} 的再訂購點不可為負數: {}",
                self.id, self.reorder_point
            )));
        }
        if let Some(pack_size) = self.pack_size {
            if pack_size <= Decimal::ZERO {
                return Err(crate::ReplenishError::invalid(format!(
                    "物料 {} 的包裝倍數必須大於 0: {}",
                    self.id, pack_size
                )));
            }
        }
        if let Some(cost) = self.unit_cost {
            if cost < Decimal::ZERO {
                return Err(crate::ReplenishError::invalid(format!(
                    "物料 {} 的單位成本不可為負數: {}",
                    self.id, cost
                )));
            }
        }
        Ok(())
    }
}

/// 供應商政策
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// 供應商ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 交期（天）
    pub lead_time_days: u32,

    /// 最小訂購量
    pub moq: Decimal,

    /// 幣別
    pub currency: String,
}

impl Supplier {
    /// 創建新的供應商
    pub fn new(id: String, lead_time_days: u32) -> Self {
        Self {
            name: id.clone(),
            id,
            lead_time_days,
            moq: Decimal::ZERO,
            currency: "USD".to_string(),
        }
    }

    /// 建構器模式：設置名稱
    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    /// 建構器模式：設置最小訂購量
    pub fn with_moq(mut self, moq: Decimal) -> Self {
        self.moq = moq;
        self
    }

    /// 建構器模式：設置幣別
    pub fn with_currency(mut self, currency: String) -> Self {
        self.currency = currency;
        self
    }

    /// 檢查政策欄位是否合法
    pub fn validate(&self) -> crate::Result<()> {
        if self.moq < Decimal::ZERO {
            return Err(crate::ReplenishError::invalid(format!(
                "供應商 {} 的最小訂購量不可為負數: {}",
                self.id, self.moq
            )));
        }
        Ok(())
    }
}
