//! 補貨引擎主計算器

use chrono::NaiveDate;
use rayon::prelude::*;
use replenish_core::{
    Catalog, ChosenVelocity, EngineConfig, ExplainTrace, Product, ReorderSuggestion,
    StockoutRisk, VelocityStrategy, VelocityWindow,
};

use crate::inventory_state::{InventoryReader, InventoryStateReader, VelocityFeed};
use crate::reorder::{ReorderCalculator, ReorderInput};
use crate::risk::RiskClassifier;
use crate::velocity::VelocitySelector;

/// 單次計算請求
#[derive(Debug, Clone)]
pub struct SuggestRequest {
    /// 速度選擇策略
    pub strategy: VelocityStrategy,

    /// 計算基準日
    pub as_of: NaiveDate,

    /// 計劃時界覆寫值（天）
    pub horizon_days_override: Option<i32>,

    /// 限定儲位
    pub location_id: Option<String>,
}

impl SuggestRequest {
    /// 創建新的請求
    pub fn new(strategy: VelocityStrategy, as_of: NaiveDate) -> Self {
        Self {
            strategy,
            as_of,
            horizon_days_override: None,
            location_id: None,
        }
    }

    /// 由策略字串建立請求（未知策略回傳參數錯誤）
    pub fn parse(strategy: &str, as_of: NaiveDate) -> replenish_core::Result<Self> {
        Ok(Self::new(strategy.parse()?, as_of))
    }

    /// 建構器模式：設置時界覆寫值
    pub fn with_horizon_override(mut self, days: i32) -> Self {
        self.horizon_days_override = Some(days);
        self
    }

    /// 建構器模式：設置儲位
    pub fn with_location(mut self, location_id: String) -> Self {
        self.location_id = Some(location_id);
        self
    }
}

/// 補貨引擎
///
/// 本身不持有可變狀態，同一個引擎可在多個請求間共用。
pub struct ReplenishmentEngine {
    /// 物料與供應商政策
    catalog: Catalog,

    /// 引擎配置
    config: EngineConfig,
}

impl ReplenishmentEngine {
    /// 創建新的引擎
    pub fn new(catalog: Catalog, config: EngineConfig) -> replenish_core::Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// 單一物料的補貨建議
    pub fn suggest(
        &self,
        product_id: &str,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<ReorderSuggestion> {
        self.explain(product_id, inventory, velocities, request)
            .map(|trace| trace.suggestion)
    }

    /// 單一物料的說明追蹤（與建議走同一條管線）
    pub fn explain(
        &self,
        product_id: &str,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<ExplainTrace> {
        let product = self.catalog.product(product_id)?;
        let supplier = self.catalog.supplier_for(product)?;
        let velocity = self.choose_velocity(product, velocities, request.strategy)?;

        let horizon_days = ReorderCalculator::horizon_days(
            product,
            supplier,
            request.horizon_days_override,
            &self.config,
        )?;
        let until = InventoryStateReader::horizon_end(request.as_of, horizon_days)?;
        let on_hand = inventory.on_hand(product_id, request.location_id.as_deref())?;
        let incoming = inventory.incoming_until(product_id, until)?;

        let input = ReorderInput {
            product,
            supplier,
            on_hand,
            incoming,
            velocity,
            horizon_days_override: request.horizon_days_override,
        };
        ReorderCalculator::explain(&input, &self.config)
    }

    /// 所有啟用物料的補貨建議（任一物料失敗則整批失敗）
    pub fn suggest_all(
        &self,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<Vec<ReorderSuggestion>> {
        let products = self.catalog.active_products();
        tracing::info!(
            "開始補貨建議計算：物料 {} 筆，策略 {}，基準日 {}",
            products.len(),
            request.strategy,
            request.as_of
        );
        let start_time = std::time::Instant::now();

        let suggestions = products
            .par_iter()
            .map(|product| self.suggest(&product.id, inventory, velocities, request))
            .collect::<replenish_core::Result<Vec<_>>>()?;

        tracing::info!(
            "補貨建議計算完成，需下單 {} 筆，耗時 {:?}",
            suggestions.iter().filter(|s| s.needs_order()).count(),
            start_time.elapsed()
        );
        Ok(suggestions)
    }

    /// 單一物料的缺貨風險
    pub fn classify(
        &self,
        product_id: &str,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<StockoutRisk> {
        let product = self.catalog.product(product_id)?;
        let velocity = self.choose_velocity(product, velocities, request.strategy)?;
        let on_hand = inventory.on_hand(product_id, request.location_id.as_deref())?;
        RiskClassifier::classify(product, on_hand, &velocity, &self.config)
    }

    /// 所有啟用物料的缺貨風險
    pub fn classify_all(
        &self,
        inventory: &dyn InventoryReader,
        velocities: &dyn VelocityFeed,
        request: &SuggestRequest,
    ) -> replenish_core::Result<Vec<StockoutRisk>> {
        let products = self.catalog.active_products();
        tracing::debug!("缺貨風險分級：物料 {} 筆", products.len());

        products
            .par_iter()
            .map(|product| self.classify(&product.id, inventory, velocities, request))
            .collect()
    }

    fn choose_velocity(
        &self,
        product: &Product,
        velocities: &dyn VelocityFeed,
        strategy: VelocityStrategy,
    ) -> replenish_core::Result<ChosenVelocity> {
        let window = velocities
            .window(&product.id)?
            .unwrap_or_else(VelocityWindow::zero);
        VelocitySelector::select(&window, strategy)
    }

    /// 獲取目錄引用
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 獲取配置引用
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
