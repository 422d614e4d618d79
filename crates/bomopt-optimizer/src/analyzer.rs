//! 庫存優化自動分析
//!
//! 掃描全部產品，匹配庫存與 BOM，產出按可消納價值排序的建議清單

use bomopt_calc::{expand_bom, leaf_requirements};
use bomopt_core::{Material, PlanningSnapshot, Product, Result, Roi};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單一產品的優化分析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOptimizationResult {
    /// 產品信息
    pub product: Product,

    /// 可消納的庫存價值
    pub consumable_value: Decimal,

    /// 消納率（佔全部庫存價值的百分比）
    pub consumption_rate: Decimal,

    /// 匹配到庫存的物料數量
    pub matched_material_count: usize,

    /// BOM 底層物料總數
    pub total_bom_material_count: usize,

    /// 最大可生產數量（消耗完所有匹配庫存）
    pub max_producible_quantity: Decimal,

    /// 最小可生產數量（不補料）
    pub min_producible_quantity: Decimal,

    /// 補料成本（按最大可生產數量）
    pub supplement_cost: Decimal,

    /// 產出價值
    pub output_value: Decimal,

    /// 投資報酬率
    pub roi: Roi,

    /// 涉及的庫存物料
    pub involved_materials: Vec<Material>,

    /// 是否為推薦方案
    pub is_recommended: bool,

    /// 推薦理由
    pub recommend_reason: String,
}

/// 庫存優化分析器
pub struct InventoryAnalyzer;

impl InventoryAnalyzer {
    /// 分析所有產品，生成按可消納價值降序的優化方案
    ///
    /// 單一產品分析失敗（如 BOM 循環）只記警告並略過，
    /// 不中斷整批掃描
    pub fn analyze_all_products(snapshot: &PlanningSnapshot) -> Vec<ProductOptimizationResult> {
        let total_inventory_value = snapshot.total_inventory_value();

        tracing::info!(
            "開始庫存優化掃描: 產品 {} 個，庫存總價值 {}",
            snapshot.products().len(),
            total_inventory_value
        );

        let mut results: Vec<ProductOptimizationResult> = snapshot
            .products()
            .par_iter()
            .filter_map(|product| {
                match Self::analyze_product(product, snapshot, total_inventory_value) {
                    Ok(result) => Some(result),
                    Err(err) => {
                        tracing::warn!("產品 {} 分析失敗: {}", product.code, err);
                        None
                    }
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.consumable_value
                .cmp(&a.consumable_value)
                .then_with(|| a.product.code.cmp(&b.product.code))
        });

        if let Some(best) = results.first_mut() {
            best.is_recommended = true;
            best.recommend_reason = "可消納庫存價值最高".to_string();
        }

        tracing::info!("掃描完成，共生成 {} 個優化方案", results.len());
        results
    }

    /// 分析單個產品
    fn analyze_product(
        product: &Product,
        snapshot: &PlanningSnapshot,
        total_inventory_value: Decimal,
    ) -> Result<ProductOptimizationResult> {
        let tree = expand_bom(&product.code, snapshot.bom_rows(), Decimal::ONE)?;
        let requirements = leaf_requirements(&tree);

        let mut consumable_value = Decimal::ZERO;
        let mut involved_materials: Vec<Material> = Vec::new();

        let mut max_quantity = Decimal::ZERO;
        let mut min_quantity: Option<Decimal> = None;
        let mut has_any_inventory = false;

        for (code, required_per_unit) in &requirements {
            let Some(material) = snapshot.material(code) else {
                continue;
            };

            if material.has_stock() {
                has_any_inventory = true;
                involved_materials.push(material.clone());
                consumable_value += material.stock_value();

                if *required_per_unit > Decimal::ZERO {
                    let stock = material.current_stock;
                    max_quantity = max_quantity.max((stock / required_per_unit).ceil());

                    let can_produce = (stock / required_per_unit).floor();
                    min_quantity = Some(min_quantity.map_or(can_produce, |m| m.min(can_produce)));
                }
            } else {
                // 無庫存物料在不補料前提下限制生產
                min_quantity = Some(Decimal::ZERO);
            }
        }

        if !has_any_inventory {
            max_quantity = Decimal::ZERO;
        }
        let min_quantity = min_quantity.unwrap_or(Decimal::ZERO);

        // 補料成本按最大可生產數量估算
        let mut supplement_cost = Decimal::ZERO;
        for (code, required_per_unit) in &requirements {
            let Some(material) = snapshot.material(code) else {
                continue;
            };
            let shortage =
                (required_per_unit * max_quantity - material.current_stock).max(Decimal::ZERO);
            supplement_cost += shortage * material.unit_price;
        }

        let output_value = max_quantity * product.amount;

        let consumption_rate = if total_inventory_value > Decimal::ZERO {
            consumable_value / total_inventory_value * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        involved_materials.sort_by(|a, b| a.code.cmp(&b.code));

        tracing::debug!(
            "產品 {}: 匹配 {}/{}，可消納價值 {}",
            product.code,
            involved_materials.len(),
            requirements.len(),
            consumable_value
        );

        Ok(ProductOptimizationResult {
            product: product.clone(),
            consumable_value,
            consumption_rate,
            matched_material_count: involved_materials.len(),
            total_bom_material_count: requirements.len(),
            max_producible_quantity: max_quantity,
            min_producible_quantity: min_quantity,
            supplement_cost,
            output_value,
            roi: Roi::from_values(output_value, supplement_cost),
            involved_materials,
            is_recommended: false,
            recommend_reason: String::new(),
        })
    }
}
