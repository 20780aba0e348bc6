//! 物料與供應商目錄

use std::collections::HashMap;

use crate::{Product, ReplenishError, Supplier};

/// 補貨計算使用的政策目錄（由外部目錄管理維護，引擎只讀）
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<String, Product>,
    suppliers: HashMap<String, Supplier>,
}

impl Catalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 由物料與供應商清單建立目錄，並檢查政策欄位
    pub fn from_parts(products: Vec<Product>, suppliers: Vec<Supplier>) -> crate::Result<Self> {
        let mut catalog = Self::new();
        for supplier in suppliers {
            catalog.add_supplier(supplier)?;
        }
        for product in products {
            catalog.add_product(product)?;
        }
        Ok(catalog)
    }

    /// 新增物料
    pub fn add_product(&mut self, product: Product) -> crate::Result<()> {
        product.validate()?;
        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    /// 新增供應商
    pub fn add_supplier(&mut self, supplier: Supplier) -> crate::Result<()> {
        supplier.validate()?;
        self.suppliers.insert(supplier.id.clone(), supplier);
        Ok(())
    }

    /// 取得物料
    pub fn product(&self, product_id: &str) -> crate::Result<&Product> {
        self.products
            .get(product_id)
            .ok_or_else(|| ReplenishError::ProductNotFound(product_id.to_string()))
    }

    /// 取得物料的首選供應商（未設定時為空）
    ///
    /// 供應商ID 有設定但目錄中找不到，視為上游資料缺漏。
    pub fn supplier_for(&self, product: &Product) -> crate::Result<Option<&Supplier>> {
        match &product.preferred_supplier_id {
            None => Ok(None),
            Some(supplier_id) => self.suppliers.get(supplier_id).map(Some).ok_or_else(|| {
                ReplenishError::upstream(
                    format!("supplier {supplier_id}"),
                    format!("物料 {} 指定的供應商不存在", product.id),
                )
            }),
        }
    }

    /// 取得物料的首選供應商，未設定時回傳 `MissingSupplier`
    pub fn require_supplier(&self, product: &Product) -> crate::Result<&Supplier> {
        self.supplier_for(product)?
            .ok_or_else(|| ReplenishError::MissingSupplier {
                product_id: product.id.clone(),
            })
    }

    /// 所有啟用中的物料（依ID排序，確保結果穩定）
    pub fn active_products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().filter(|p| p.active).collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }
}
