//! # bomopt
//!
//! BOM 展開與庫存消納優化引擎的統一入口。
//!
//! 典型流程：組裝 [`PlanningSnapshot`] → 展開 BOM →
//! 計算生產方案（方案 A / 方案 B）→ 全產品掃描或多產品分配。

pub use bomopt_calc::{
    expand_bom, format_tree, leaf_requirements, leaf_requirements_with_substitutes,
    material_requirements, max_producible_with_substitutes, parse_substitution_relations,
    tree_stats, BomTree, MoqAnalysis, MoqCalculator, PlanCalculator, SubstituteSelector,
};
pub use bomopt_core::{
    BomRow, Material, PlanError, PlanningSnapshot, Producible, Product, ProductionPlan, Result,
    Roi, SubstitutionDecision, SubstitutionRelation,
};
pub use bomopt_optimizer::{
    InventoryAnalyzer, MultiProductOptimizer, OptimizationResult, ProductAllocation,
    ProductOptimizationResult,
};

/// 以產品編碼計算兩種生產方案（方案 A 最大化消納、方案 B 最小化余料）
pub fn plan_product(
    product_code: &str,
    selected: &[Material],
    snapshot: &PlanningSnapshot,
) -> Result<(ProductionPlan, ProductionPlan)> {
    let product = snapshot.require_product(product_code)?;
    let relations = parse_substitution_relations(snapshot.bom_rows(), snapshot.materials());

    let max_consumption =
        PlanCalculator::calculate_max_consumption(selected, product, snapshot, &relations);
    let min_waste = PlanCalculator::calculate_min_waste(selected, product, snapshot, &relations);

    Ok((max_consumption, min_waste))
}

/// 掃描快照中全部產品，回傳按可消納價值降序的優化建議
pub fn rank_products(snapshot: &PlanningSnapshot) -> Vec<ProductOptimizationResult> {
    InventoryAnalyzer::analyze_all_products(snapshot)
}

/// 對指定產品組合做貪心庫存分配
pub fn optimize_mix(products: &[Product], snapshot: &PlanningSnapshot) -> OptimizationResult {
    MultiProductOptimizer::optimize_product_mix(products, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_plan_product_unknown_code() {
        let snapshot = PlanningSnapshot::default();
        let result = plan_product("NO-SUCH", &[], &snapshot);
        assert!(matches!(result, Err(PlanError::ProductNotFound(_))));
    }

    #[test]
    fn test_plan_product_returns_both_strategies() {
        let materials = vec![
            Material::new("MAT-X", "外殼", Decimal::from(10)).with_stock(Decimal::from(10))
        ];
        let products = vec![Product::new("PROD-1", "成品", Decimal::from(100))];
        let bom_rows = vec![BomRow::new("PROD-1", "MAT-X", Decimal::from(2))];
        let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
        let selected = vec![snapshot.material("MAT-X").unwrap().clone()];

        let (max_consumption, min_waste) = plan_product("PROD-1", &selected, &snapshot).unwrap();

        assert_eq!(max_consumption.quantity, Decimal::from(5));
        assert_eq!(min_waste.quantity, Decimal::from(5));
        assert_eq!(min_waste.roi, Roi::Infinite);
    }
}
