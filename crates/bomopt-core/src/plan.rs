//! 生產方案模型（計算結果值物件）

use crate::quantity::Roi;
use crate::substitution::SubstitutionDecision;
use crate::{Material, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 單一物料的使用情況
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialUsage {
    /// 物料信息
    pub material: Material,

    /// 需求數量（目標產量下的總需求）
    pub required_quantity: Decimal,

    /// 實際使用數量
    pub used_quantity: Decimal,

    /// 剩餘數量
    pub remaining_quantity: Decimal,

    /// 消耗價值
    pub value: Decimal,

    /// 是否呆滯料
    pub is_stagnant: bool,
}

/// 補料（採購缺口）信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSupplement {
    /// 物料信息
    pub material: Material,

    /// 缺口數量
    pub shortage: Decimal,

    /// 補料數量
    pub supplement_quantity: Decimal,

    /// 補料成本
    pub cost: Decimal,
}

/// 生產方案（一次計算的完整輸出，建立後不再修改）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// 方案ID
    pub id: Uuid,

    /// 產品信息
    pub product: Product,

    /// 可生產數量
    pub quantity: Decimal,

    /// 選中庫存的使用情況
    pub materials_used: Vec<MaterialUsage>,

    /// 替代料決策
    pub substitution_decisions: Vec<SubstitutionDecision>,

    /// 補料清單
    pub supplement_materials: Vec<MaterialSupplement>,

    /// 總成本（補料成本）
    pub total_cost: Decimal,

    /// 產出價值
    pub output_value: Decimal,

    /// 投資報酬率
    pub roi: Roi,

    /// 余料價值
    pub waste_value: Decimal,

    /// 庫存消納率（百分比）
    pub consumption_rate: Decimal,
}

impl ProductionPlan {
    /// 零值方案：BOM 為空或展開失敗時的定義結果
    pub fn empty(product: Product) -> Self {
        Self {
            id: Uuid::new_v4(),
            product,
            quantity: Decimal::ZERO,
            materials_used: Vec::new(),
            substitution_decisions: Vec::new(),
            supplement_materials: Vec::new(),
            total_cost: Decimal::ZERO,
            output_value: Decimal::ZERO,
            roi: Roi::Ratio(Decimal::ZERO),
            waste_value: Decimal::ZERO,
            consumption_rate: Decimal::ZERO,
        }
    }

    /// 消納的庫存價值總和
    pub fn consumed_value(&self) -> Decimal {
        self.materials_used.iter().map(|usage| usage.value).sum()
    }

    /// 是否可執行（產量大於零）
    pub fn is_producible(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan_is_zero_valued() {
        let product = Product::new("PROD-100", "智慧閘道器", Decimal::from(1500));
        let plan = ProductionPlan::empty(product);

        assert_eq!(plan.quantity, Decimal::ZERO);
        assert_eq!(plan.total_cost, Decimal::ZERO);
        assert_eq!(plan.output_value, Decimal::ZERO);
        assert_eq!(plan.roi, Roi::Ratio(Decimal::ZERO));
        assert_eq!(plan.consumption_rate, Decimal::ZERO);
        assert!(!plan.is_producible());
        assert!(plan.substitution_decisions.is_empty());
    }

    #[test]
    fn test_consumed_value_sums_usages() {
        let product = Product::new("PROD-100", "智慧閘道器", Decimal::from(1500));
        let mut plan = ProductionPlan::empty(product);

        let material = Material::new("MAT-001", "支架", Decimal::from(10));
        plan.materials_used.push(MaterialUsage {
            material: material.clone(),
            required_quantity: Decimal::from(20),
            used_quantity: Decimal::from(15),
            remaining_quantity: Decimal::from(5),
            value: Decimal::from(150),
            is_stagnant: true,
        });
        plan.materials_used.push(MaterialUsage {
            material,
            required_quantity: Decimal::from(10),
            used_quantity: Decimal::from(10),
            remaining_quantity: Decimal::ZERO,
            value: Decimal::from(100),
            is_stagnant: true,
        });

        assert_eq!(plan.consumed_value(), Decimal::from(250));
    }

    #[test]
    fn test_plan_serde_roundtrip() {
        let product = Product::new("PROD-100", "智慧閘道器", Decimal::from(1500));
        let plan = ProductionPlan::empty(product);

        let json = serde_json::to_string(&plan).unwrap();
        let back: ProductionPlan = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, plan.id);
        assert_eq!(back.product.code, "PROD-100");
        assert_eq!(back.roi, Roi::Ratio(Decimal::ZERO));
    }
}
