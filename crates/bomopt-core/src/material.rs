//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 物料主檔記錄
///
/// BOM 樹的葉節點或中間節點；快照由呼叫方持有，計算過程中不可變
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// 物料編碼（唯一）
    pub code: String,

    /// 物料名稱
    pub name: String,

    /// 規格說明
    pub specification: String,

    /// 物料類型（自製/外購/委外）
    pub material_type: String,

    /// 單價
    pub unit_price: Decimal,

    /// 現有庫存
    pub current_stock: Decimal,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 庫齡（天）
    pub storage_days: u32,

    /// 是否呆滯
    pub is_stagnant: bool,
}

impl Material {
    /// 創建新的物料記錄
    pub fn new(code: impl Into<String>, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            specification: String::new(),
            material_type: String::new(),
            unit_price,
            current_stock: Decimal::ZERO,
            safety_stock: Decimal::ZERO,
            storage_days: 0,
            is_stagnant: false,
        }
    }

    /// 建構器模式：設置規格
    pub fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = specification.into();
        self
    }

    /// 建構器模式：設置物料類型
    pub fn with_material_type(mut self, material_type: impl Into<String>) -> Self {
        self.material_type = material_type.into();
        self
    }

    /// 建構器模式：設置現有庫存
    pub fn with_stock(mut self, current_stock: Decimal) -> Self {
        self.current_stock = current_stock;
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, safety_stock: Decimal) -> Self {
        self.safety_stock = safety_stock;
        self
    }

    /// 建構器模式：設置庫齡
    pub fn with_storage_days(mut self, storage_days: u32) -> Self {
        self.storage_days = storage_days;
        self
    }

    /// 建構器模式：標記為呆滯料
    pub fn stagnant(mut self) -> Self {
        self.is_stagnant = true;
        self
    }

    /// 現有庫存的帳面價值
    pub fn stock_value(&self) -> Decimal {
        self.current_stock * self.unit_price
    }

    /// 是否有庫存
    pub fn has_stock(&self) -> bool {
        self.current_stock > Decimal::ZERO
    }

    /// 檢查庫存是否低於安全庫存
    pub fn is_below_safety_stock(&self) -> bool {
        self.current_stock < self.safety_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_material() {
        let material = Material::new("MAT-001", "鋁擠型支架", Decimal::from(12))
            .with_stock(Decimal::from(300))
            .with_safety_stock(Decimal::from(50));

        assert_eq!(material.code, "MAT-001");
        assert_eq!(material.current_stock, Decimal::from(300));
        assert_eq!(material.stock_value(), Decimal::from(3600));
        assert!(material.has_stock());
        assert!(!material.is_below_safety_stock());
        assert!(!material.is_stagnant);
    }

    #[test]
    fn test_stagnant_material_builder() {
        let material = Material::new("MAT-002", "舊款面板", Decimal::from(80))
            .with_specification("V2 絕版")
            .with_material_type("外購")
            .with_stock(Decimal::from(40))
            .with_storage_days(365)
            .stagnant();

        assert!(material.is_stagnant);
        assert_eq!(material.storage_days, 365);
        assert_eq!(material.material_type, "外購");
    }

    #[test]
    fn test_material_serde_roundtrip() {
        let material = Material::new("MAT-003", "螺絲", Decimal::new(5, 1))
            .with_stock(Decimal::from(1000));

        let json = serde_json::to_string(&material).unwrap();
        let back: Material = serde_json::from_str(&json).unwrap();

        assert_eq!(back.code, "MAT-003");
        assert_eq!(back.unit_price, Decimal::new(5, 1));
        assert_eq!(back.current_stock, Decimal::from(1000));
    }
}
