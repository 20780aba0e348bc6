//! # Replenish Calculation Engine
//!
//! 補貨與缺貨風險計算：庫存狀態、速度選擇、補貨管線、風險分級

pub mod calculator;
pub mod inventory_state;
pub mod reorder;
pub mod risk;
pub mod velocity;

// Re-export 主要類型
pub use calculator::{ReplenishmentEngine, SuggestRequest};
pub use inventory_state::{
    InventoryReader, InventorySnapshot, InventoryStateReader, VelocityFeed, VelocityTable,
};
pub use reorder::{Adjustment, ReorderCalculator, ReorderInput};
pub use risk::RiskClassifier;
pub use velocity::VelocitySelector;
