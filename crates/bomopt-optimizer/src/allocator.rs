//! 多產品貪心分配
//!
//! 多個產品競爭同一批庫存時，按單件消納價值密度排序逐一分配

use bomopt_calc::{expand_bom, leaf_requirements};
use bomopt_core::{Material, PlanningSnapshot, Producible, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單一產品的分配結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAllocation {
    /// 產品信息
    pub product: Product,

    /// 分配的生產數量
    pub quantity: Decimal,

    /// 消納的庫存價值
    pub consumed_value: Decimal,

    /// 消耗明細（物料編碼 → 消耗數量）
    pub consumed_materials: HashMap<String, Decimal>,
}

/// 分配後仍未消納的物料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnconsumedMaterial {
    /// 物料信息
    pub material: Material,

    /// 剩餘數量
    pub remaining_quantity: Decimal,

    /// 剩餘價值
    pub remaining_value: Decimal,
}

/// 多產品優化結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// 產品組合（按分配順序）
    pub product_mix: Vec<ProductAllocation>,

    /// 消納總價值
    pub total_consumed_value: Decimal,

    /// 未消納物料（按剩餘價值降序）
    pub unconsumed_materials: Vec<UnconsumedMaterial>,

    /// 優化分數（消納價值佔原始庫存價值的百分比，0-100）
    pub optimization_score: Decimal,
}

/// 貪心候選：展開一次 BOM 後的產品評分
struct Candidate {
    product: Product,
    requirements: HashMap<String, Decimal>,
    value_per_unit: Decimal,
}

/// 多產品優化器
pub struct MultiProductOptimizer;

impl MultiProductOptimizer {
    /// 貪心優化產品組合
    ///
    /// 消納價值密度高的產品優先取得庫存；每次分配後扣減剩餘庫存，
    /// 後續產品只能用剩下的部分。密度相同時保持呼叫方的產品順序
    pub fn optimize_product_mix(
        products: &[Product],
        snapshot: &PlanningSnapshot,
    ) -> OptimizationResult {
        let inventory = snapshot.inventory_map();
        let materials = snapshot.materials();

        tracing::info!(
            "開始多產品優化: 候選產品 {} 個，庫存物料 {} 種",
            products.len(),
            inventory.len()
        );

        let mut remaining_inventory = inventory.clone();
        let mut candidates = Self::score_candidates(products, snapshot, &inventory);

        // 穩定排序，密度相同時維持原順序
        candidates.sort_by(|a, b| b.value_per_unit.cmp(&a.value_per_unit));

        let mut product_mix = Vec::new();
        let mut total_consumed_value = Decimal::ZERO;

        for candidate in candidates {
            // 以當前剩餘庫存重算可生產量
            let mut quantity: Option<Decimal> = None;
            for (code, required_per_unit) in &candidate.requirements {
                if *required_per_unit <= Decimal::ZERO {
                    continue;
                }
                let available = remaining_inventory
                    .get(code)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let can_make = (available / required_per_unit).floor();
                quantity = Some(quantity.map_or(can_make, |current| current.min(can_make)));
            }

            let Some(quantity) = quantity.filter(|quantity| *quantity > Decimal::ZERO) else {
                continue;
            };

            let mut consumed_materials = HashMap::new();
            let mut consumed_value = Decimal::ZERO;

            for (code, required_per_unit) in &candidate.requirements {
                let available = remaining_inventory
                    .get(code)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let consumed = (required_per_unit * quantity).min(available);

                if consumed > Decimal::ZERO {
                    consumed_materials.insert(code.clone(), consumed);
                    remaining_inventory.insert(code.clone(), available - consumed);

                    if let Some(material) = materials.get(code) {
                        consumed_value += consumed * material.unit_price;
                    }
                }
            }

            tracing::debug!(
                "分配 {}: {} 件，消納 {}",
                candidate.product.code,
                quantity,
                consumed_value
            );

            total_consumed_value += consumed_value;
            product_mix.push(ProductAllocation {
                product: candidate.product,
                quantity,
                consumed_value,
                consumed_materials,
            });
        }

        let mut unconsumed_materials: Vec<UnconsumedMaterial> = remaining_inventory
            .iter()
            .filter(|(_, remaining)| **remaining > Decimal::ZERO)
            .filter_map(|(code, remaining)| {
                materials.get(code).map(|material| UnconsumedMaterial {
                    material: material.clone(),
                    remaining_quantity: *remaining,
                    remaining_value: remaining * material.unit_price,
                })
            })
            .collect();

        unconsumed_materials.sort_by(|a, b| {
            b.remaining_value
                .cmp(&a.remaining_value)
                .then_with(|| a.material.code.cmp(&b.material.code))
        });

        let original_value: Decimal = inventory
            .iter()
            .filter_map(|(code, quantity)| {
                materials
                    .get(code)
                    .map(|material| quantity * material.unit_price)
            })
            .sum();

        let optimization_score = if original_value > Decimal::ZERO {
            (total_consumed_value / original_value * Decimal::from(100)).round()
        } else {
            Decimal::ZERO
        };

        tracing::info!(
            "優化結果: 消納總價值 {}，未消納物料 {} 種，分數 {}",
            total_consumed_value,
            unconsumed_materials.len(),
            optimization_score
        );

        OptimizationResult {
            product_mix,
            total_consumed_value,
            unconsumed_materials,
            optimization_score,
        }
    }

    /// 計算各產品的單件消納價值密度
    ///
    /// BOM 展開失敗、無法生產或消納價值為零的產品不進入候選
    fn score_candidates(
        products: &[Product],
        snapshot: &PlanningSnapshot,
        inventory: &HashMap<String, Decimal>,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for product in products {
            let tree = match expand_bom(&product.code, snapshot.bom_rows(), Decimal::ONE) {
                Ok(tree) => tree,
                Err(err) => {
                    tracing::warn!("產品 {} BOM 展開失敗: {}", product.code, err);
                    continue;
                }
            };
            let requirements = leaf_requirements(&tree);

            let mut value_per_unit = Decimal::ZERO;
            let mut max_producible = Producible::Unbounded;

            for (code, required_per_unit) in &requirements {
                let available = inventory.get(code).copied().unwrap_or(Decimal::ZERO);

                if available > Decimal::ZERO {
                    if let Some(material) = snapshot.material(code) {
                        // 這個物料對單件產品的消納貢獻
                        let consumed_per_unit = (*required_per_unit).min(available);
                        value_per_unit += consumed_per_unit * material.unit_price;
                    }
                }

                if *required_per_unit > Decimal::ZERO {
                    let can_make = (available / required_per_unit).floor();
                    max_producible = max_producible.min(Producible::Bounded(can_make));
                }
            }

            // 無約束產品（BOM 不含任何受限物料）不進入候選
            if max_producible.is_positive() && value_per_unit > Decimal::ZERO {
                candidates.push(Candidate {
                    product: product.clone(),
                    requirements,
                    value_per_unit,
                });
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomopt_core::BomRow;
    use proptest::prelude::*;

    /// 兩個產品共用同一物料庫存
    fn competing_snapshot() -> PlanningSnapshot {
        let materials =
            vec![Material::new("MAT-Y", "共用料", Decimal::from(8)).with_stock(Decimal::from(100))];
        let products = vec![
            Product::new("PROD-1", "高價品", Decimal::from(50)),
            Product::new("PROD-2", "低價品", Decimal::from(30)),
        ];
        let bom_rows = vec![
            BomRow::new("PROD-1", "MAT-Y", Decimal::from(2)),
            BomRow::new("PROD-2", "MAT-Y", Decimal::ONE),
        ];
        PlanningSnapshot::new(materials, products, bom_rows)
    }

    #[test]
    fn test_denser_product_allocated_first() {
        let snapshot = competing_snapshot();
        let products = snapshot.products().to_vec();

        let result = MultiProductOptimizer::optimize_product_mix(&products, &snapshot);

        // PROD-1 密度 2×8=16 > PROD-2 密度 1×8=8 → 先分配 PROD-1 取走全部庫存
        assert_eq!(result.product_mix.len(), 1);
        assert_eq!(result.product_mix[0].product.code, "PROD-1");
        assert_eq!(result.product_mix[0].quantity, Decimal::from(50));
        assert_eq!(result.product_mix[0].consumed_value, Decimal::from(800));

        assert_eq!(result.total_consumed_value, Decimal::from(800));
        assert!(result.unconsumed_materials.is_empty());
        assert_eq!(result.optimization_score, Decimal::from(100));
    }

    #[test]
    fn test_conservation_of_inventory() {
        let materials = vec![
            Material::new("MAT-Y", "共用料", Decimal::from(8)).with_stock(Decimal::from(7)),
            Material::new("MAT-W", "專用料", Decimal::from(3)).with_stock(Decimal::from(10)),
        ];
        let products = vec![
            Product::new("PROD-1", "甲", Decimal::from(50)),
            Product::new("PROD-2", "乙", Decimal::from(30)),
        ];
        let bom_rows = vec![
            BomRow::new("PROD-1", "MAT-Y", Decimal::from(2)),
            BomRow::new("PROD-2", "MAT-Y", Decimal::ONE),
            BomRow::new("PROD-2", "MAT-W", Decimal::from(2)),
        ];
        let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
        let products = snapshot.products().to_vec();

        let result = MultiProductOptimizer::optimize_product_mix(&products, &snapshot);

        // 每種物料：消耗 + 剩餘 = 原始庫存
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for allocation in &result.product_mix {
            for (code, consumed) in &allocation.consumed_materials {
                *totals.entry(code.clone()).or_default() += *consumed;
            }
        }
        for unconsumed in &result.unconsumed_materials {
            *totals.entry(unconsumed.material.code.clone()).or_default() +=
                unconsumed.remaining_quantity;
        }

        assert_eq!(totals.get("MAT-Y"), Some(&Decimal::from(7)));
        assert_eq!(totals.get("MAT-W"), Some(&Decimal::from(10)));
    }

    #[test]
    fn test_second_product_gets_leftover() {
        let materials = vec![
            Material::new("MAT-Y", "共用料", Decimal::from(8)).with_stock(Decimal::from(10)),
            Material::new("MAT-W", "專用料", Decimal::from(20)).with_stock(Decimal::from(6)),
        ];
        let products = vec![
            Product::new("PROD-1", "甲", Decimal::from(50)),
            Product::new("PROD-2", "乙", Decimal::from(30)),
        ];
        // PROD-1 密度 2×8+1×20 = 36；受限於 MAT-W floor(6/1)=6 → 但 MAT-Y 只剩 10 → floor(10/2)=5
        let bom_rows = vec![
            BomRow::new("PROD-1", "MAT-Y", Decimal::from(2)),
            BomRow::new("PROD-1", "MAT-W", Decimal::ONE),
            BomRow::new("PROD-2", "MAT-W", Decimal::ONE),
        ];
        let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
        let products = snapshot.products().to_vec();

        let result = MultiProductOptimizer::optimize_product_mix(&products, &snapshot);

        assert_eq!(result.product_mix.len(), 2);
        assert_eq!(result.product_mix[0].product.code, "PROD-1");
        assert_eq!(result.product_mix[0].quantity, Decimal::from(5));

        // PROD-2 只拿得到剩下的 1 件 MAT-W
        assert_eq!(result.product_mix[1].product.code, "PROD-2");
        assert_eq!(result.product_mix[1].quantity, Decimal::ONE);
    }

    #[test]
    fn test_unproducible_product_excluded() {
        let materials =
            vec![Material::new("MAT-Y", "共用料", Decimal::from(8)).with_stock(Decimal::from(100))];
        let products = vec![Product::new("PROD-3", "缺料品", Decimal::from(10))];
        // 依賴無庫存的 MAT-NONE
        let bom_rows = vec![BomRow::new("PROD-3", "MAT-NONE", Decimal::ONE)];
        let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
        let products = snapshot.products().to_vec();

        let result = MultiProductOptimizer::optimize_product_mix(&products, &snapshot);

        assert!(result.product_mix.is_empty());
        assert_eq!(result.total_consumed_value, Decimal::ZERO);
        assert_eq!(result.optimization_score, Decimal::ZERO);
        // 庫存原封不動
        assert_eq!(result.unconsumed_materials.len(), 1);
        assert_eq!(
            result.unconsumed_materials[0].remaining_quantity,
            Decimal::from(100)
        );
    }

    proptest! {
        /// 任意庫存與單耗下，每種物料的消耗 + 剩餘恆等於原始庫存
        #[test]
        fn prop_allocation_conserves_inventory(
            stock_a in 1u32..200,
            stock_b in 1u32..200,
            req_1a in 1u32..10,
            req_1b in 1u32..10,
            req_2b in 1u32..10,
        ) {
            let materials = vec![
                Material::new("MAT-A", "甲料", Decimal::from(10))
                    .with_stock(Decimal::from(stock_a)),
                Material::new("MAT-B", "乙料", Decimal::from(4))
                    .with_stock(Decimal::from(stock_b)),
            ];
            let products = vec![
                Product::new("P1", "甲", Decimal::from(100)),
                Product::new("P2", "乙", Decimal::from(100)),
            ];
            let bom_rows = vec![
                BomRow::new("P1", "MAT-A", Decimal::from(req_1a)),
                BomRow::new("P1", "MAT-B", Decimal::from(req_1b)),
                BomRow::new("P2", "MAT-B", Decimal::from(req_2b)),
            ];
            let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
            let products = snapshot.products().to_vec();

            let result = MultiProductOptimizer::optimize_product_mix(&products, &snapshot);

            let mut totals: HashMap<String, Decimal> = HashMap::new();
            for allocation in &result.product_mix {
                for (code, consumed) in &allocation.consumed_materials {
                    prop_assert!(*consumed > Decimal::ZERO);
                    *totals.entry(code.clone()).or_default() += *consumed;
                }
            }
            for unconsumed in &result.unconsumed_materials {
                *totals.entry(unconsumed.material.code.clone()).or_default() +=
                    unconsumed.remaining_quantity;
            }

            prop_assert_eq!(totals.get("MAT-A"), Some(&Decimal::from(stock_a)));
            prop_assert_eq!(totals.get("MAT-B"), Some(&Decimal::from(stock_b)));
        }
    }

    #[test]
    fn test_equal_density_keeps_caller_order() {
        let materials = vec![
            Material::new("MAT-A", "甲料", Decimal::from(5)).with_stock(Decimal::from(10)),
            Material::new("MAT-B", "乙料", Decimal::from(5)).with_stock(Decimal::from(10)),
        ];
        let products = vec![
            Product::new("PROD-2", "後宣告", Decimal::from(30)),
            Product::new("PROD-1", "先宣告", Decimal::from(30)),
        ];
        let bom_rows = vec![
            BomRow::new("PROD-2", "MAT-A", Decimal::ONE),
            BomRow::new("PROD-1", "MAT-B", Decimal::ONE),
        ];
        let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
        let products = snapshot.products().to_vec();

        let result = MultiProductOptimizer::optimize_product_mix(&products, &snapshot);

        // 密度相同 (5)，維持傳入順序 PROD-2 在前
        assert_eq!(result.product_mix[0].product.code, "PROD-2");
        assert_eq!(result.product_mix[1].product.code, "PROD-1");
    }
}
