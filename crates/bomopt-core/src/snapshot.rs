//! 計算快照
//!
//! 由呼叫方組裝的不可變輸入（物料/產品/BOM/MOQ），
//! 以借用傳入各純函數；核心不持有任何行程級可變快取

use crate::{BomRow, Material, PlanError, Product, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 一次計算所見的完整資料快照
#[derive(Debug, Clone, Default)]
pub struct PlanningSnapshot {
    /// 物料主檔（編碼 → 物料）
    materials: HashMap<String, Material>,

    /// 產品列表（保留呼叫方順序）
    products: Vec<Product>,

    /// BOM 扁平行
    bom_rows: Vec<BomRow>,

    /// 最小起訂量表（編碼 → MOQ）
    moq_table: HashMap<String, Decimal>,
}

impl PlanningSnapshot {
    /// 由各資料載入器的輸出組裝快照
    pub fn new(materials: Vec<Material>, products: Vec<Product>, bom_rows: Vec<BomRow>) -> Self {
        let materials = materials
            .into_iter()
            .map(|material| (material.code.clone(), material))
            .collect();

        Self {
            materials,
            products,
            bom_rows,
            moq_table: HashMap::new(),
        }
    }

    /// 建構器模式：附加 MOQ 表
    pub fn with_moq_table(mut self, moq_table: HashMap<String, Decimal>) -> Self {
        self.moq_table = moq_table;
        self
    }

    /// 物料主檔
    pub fn materials(&self) -> &HashMap<String, Material> {
        &self.materials
    }

    /// 產品列表
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// BOM 行
    pub fn bom_rows(&self) -> &[BomRow] {
        &self.bom_rows
    }

    /// MOQ 表
    pub fn moq_table(&self) -> &HashMap<String, Decimal> {
        &self.moq_table
    }

    /// 查找物料
    pub fn material(&self, code: &str) -> Option<&Material> {
        self.materials.get(code)
    }

    /// 查找物料，不存在時回傳錯誤
    pub fn require_material(&self, code: &str) -> Result<&Material> {
        self.material(code)
            .ok_or_else(|| PlanError::MaterialNotFound(code.to_string()))
    }

    /// 查找產品
    pub fn product(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.code == code)
    }

    /// 查找產品，不存在時回傳錯誤
    pub fn require_product(&self, code: &str) -> Result<&Product> {
        self.product(code)
            .ok_or_else(|| PlanError::ProductNotFound(code.to_string()))
    }

    /// 有庫存物料的庫存映射（編碼 → 現有庫存，僅含庫存 > 0 者）
    pub fn inventory_map(&self) -> HashMap<String, Decimal> {
        self.materials
            .values()
            .filter(|material| material.has_stock())
            .map(|material| (material.code.clone(), material.current_stock))
            .collect()
    }

    /// 全部有庫存物料的帳面總價值
    pub fn total_inventory_value(&self) -> Decimal {
        self.materials
            .values()
            .filter(|material| material.has_stock())
            .map(|material| material.stock_value())
            .sum()
    }
}
