//! # Replenish
//!
//! 補貨與缺貨風險引擎
//!
//! - `model`：資料模型、配置、錯誤
//! - `calc`：速度選擇、補貨管線、風險分級
//! - `store`：採購單配號與摘要冪等標記
//! - `orders`：草稿採購單批次建立、每日摘要

pub use replenish_calc as calc;
pub use replenish_core as model;
pub use replenish_orders as orders;
pub use replenish_store as store;

pub use replenish_calc::{ReplenishmentEngine, SuggestRequest};
pub use replenish_core::{ReplenishError, Result};
pub use replenish_orders::{DigestGenerator, DraftPoBatcher, DraftPoRequest};
