//! 逆向生產方案計算
//!
//! 由選中庫存反推生產方案：
//! - 方案 A（最大化消納）：消耗完全部選中庫存，缺口物料採購補足
//! - 方案 B（最小化余料）：只用現有庫存生產，不採購任何物料

use crate::expander::{expand_bom, leaf_requirements};
use bomopt_core::{
    Material, MaterialSupplement, MaterialUsage, PlanningSnapshot, Product, ProductionPlan, Roi,
    SubstitutionRelation,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 逆向生產計算器
pub struct PlanCalculator;

impl PlanCalculator {
    /// 方案 A: 最大化消納
    ///
    /// 找到「消耗完選中庫存需要生產最多件」的那個物料決定產量，
    /// 其餘缺口（含完全無庫存的 BOM 物料）全部列入補料清單
    pub fn calculate_max_consumption(
        selected: &[Material],
        product: &Product,
        snapshot: &PlanningSnapshot,
        _relations: &[SubstitutionRelation],
    ) -> ProductionPlan {
        tracing::info!(
            "開始計算方案 A (最大化消納): 產品 {} 選中物料 {} 種",
            product.code,
            selected.len()
        );

        let selected_inventory = Self::selected_inventory(selected);

        let tree = match expand_bom(&product.code, snapshot.bom_rows(), Decimal::ONE) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!("BOM 展開失敗: {}", err);
                return ProductionPlan::empty(product.clone());
            }
        };
        let requirements = leaf_requirements(&tree);

        // 消耗完每種選中庫存各需生產多少件，取其中最大者
        let mut quantity = Decimal::ZERO;
        let mut limiting_material = String::new();

        for (code, required_per_unit) in &requirements {
            if *required_per_unit <= Decimal::ZERO {
                continue;
            }
            if let Some(available) = selected_inventory.get(code) {
                let needed_to_consume_all = (available / required_per_unit).ceil();
                if needed_to_consume_all > quantity {
                    quantity = needed_to_consume_all;
                    limiting_material = code.clone();
                }
            }
        }

        if quantity == Decimal::ZERO {
            // 選中物料都不在此產品 BOM 中，採用預設產量
            quantity = Decimal::from(100);
            tracing::warn!("選中物料不在產品 {} 的 BOM 中，採用預設產量 100", product.code);
        } else {
            tracing::debug!("方案 A 產量 {} 件 (消耗完 {})", quantity, limiting_material);
        }

        let mut materials_used = Vec::new();
        let mut supplement_materials = Vec::new();
        let mut total_cost = Decimal::ZERO;
        let mut consumed_value = Decimal::ZERO;

        for (code, required_per_unit) in &requirements {
            let Some(material) = snapshot.material(code) else {
                tracing::warn!("物料主檔缺少 {}，跳過該需求", code);
                continue;
            };

            let total_required = required_per_unit * quantity;
            let available = selected_inventory
                .get(code)
                .copied()
                .unwrap_or(Decimal::ZERO);

            if available > Decimal::ZERO {
                let used_quantity = total_required.min(available);
                consumed_value += used_quantity * material.unit_price;

                materials_used.push(MaterialUsage {
                    material: material.clone(),
                    required_quantity: total_required,
                    used_quantity,
                    remaining_quantity: available - used_quantity,
                    value: used_quantity * material.unit_price,
                    is_stagnant: true,
                });

                let shortage = total_required - used_quantity;
                if shortage > Decimal::ZERO {
                    total_cost += shortage * material.unit_price;
                    supplement_materials.push(MaterialSupplement {
                        material: material.clone(),
                        shortage,
                        supplement_quantity: shortage,
                        cost: shortage * material.unit_price,
                    });
                }
            } else {
                // 未選中的 BOM 物料整批採購
                total_cost += total_required * material.unit_price;
                supplement_materials.push(MaterialSupplement {
                    material: material.clone(),
                    shortage: total_required,
                    supplement_quantity: total_required,
                    cost: total_required * material.unit_price,
                });
            }
        }

        let output_value = quantity * product.amount;

        tracing::info!(
            "方案 A 完成: 消納價值 {} 補料成本 {}",
            consumed_value,
            total_cost
        );

        ProductionPlan {
            roi: Roi::from_values(output_value, total_cost),
            consumption_rate: Self::consumption_rate(consumed_value, selected),
            quantity,
            materials_used,
            supplement_materials,
            total_cost,
            output_value,
            waste_value: Decimal::ZERO,
            ..ProductionPlan::empty(product.clone())
        }
    }

    /// 方案 B: 最小化余料（不補料）
    ///
    /// 可用庫存看全部物料而不只選中者；任何無庫存的必需物料
    /// 都會把產量限制為零
    pub fn calculate_min_waste(
        selected: &[Material],
        product: &Product,
        snapshot: &PlanningSnapshot,
        _relations: &[SubstitutionRelation],
    ) -> ProductionPlan {
        tracing::info!(
            "開始計算方案 B (最小化余料): 產品 {} 選中物料 {} 種",
            product.code,
            selected.len()
        );

        let selected_inventory = Self::selected_inventory(selected);
        let all_inventory = snapshot.inventory_map();

        let tree = match expand_bom(&product.code, snapshot.bom_rows(), Decimal::ONE) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!("BOM 展開失敗: {}", err);
                return ProductionPlan::empty(product.clone());
            }
        };
        let requirements = leaf_requirements(&tree);

        let mut quantity: Option<Decimal> = None;
        let mut limiting_material = String::new();

        for (code, required_per_unit) in &requirements {
            if *required_per_unit <= Decimal::ZERO {
                continue;
            }

            let available = all_inventory.get(code).copied().unwrap_or(Decimal::ZERO);
            if available > Decimal::ZERO {
                let can_produce = (available / required_per_unit).floor();
                if quantity.map_or(true, |current| can_produce < current) {
                    quantity = Some(can_produce);
                    limiting_material = code.clone();
                }
            } else {
                // 必需物料無庫存，不補料就無法生產
                tracing::debug!("{} 無庫存，方案 B 產量限制為 0", code);
                quantity = Some(Decimal::ZERO);
                limiting_material = code.clone();
                break;
            }
        }

        let quantity = quantity.unwrap_or(Decimal::ZERO);
        tracing::debug!("方案 B 產量 {} 件 (受限於 {})", quantity, limiting_material);

        let mut materials_used = Vec::new();
        let mut consumed_value = Decimal::ZERO;
        let mut waste_value = Decimal::ZERO;

        for (code, required_per_unit) in &requirements {
            let Some(material) = snapshot.material(code) else {
                tracing::warn!("物料主檔缺少 {}，跳過該需求", code);
                continue;
            };

            let available = all_inventory.get(code).copied().unwrap_or(Decimal::ZERO);
            if available <= Decimal::ZERO {
                continue;
            }

            let total_required = required_per_unit * quantity;
            let used_quantity = total_required.min(available);
            let remaining_quantity = available - used_quantity;

            // 只記錄選中物料的消納與余料
            if selected_inventory.contains_key(code) {
                consumed_value += used_quantity * material.unit_price;
                waste_value += remaining_quantity * material.unit_price;

                materials_used.push(MaterialUsage {
                    material: material.clone(),
                    required_quantity: total_required,
                    used_quantity,
                    remaining_quantity,
                    value: used_quantity * material.unit_price,
                    is_stagnant: true,
                });
            }
        }

        let output_value = quantity * product.amount;

        tracing::info!(
            "方案 B 完成: 消納價值 {} 余料價值 {}",
            consumed_value,
            waste_value
        );

        ProductionPlan {
            roi: Roi::Infinite,
            consumption_rate: Self::consumption_rate(consumed_value, selected),
            quantity,
            materials_used,
            output_value,
            waste_value,
            ..ProductionPlan::empty(product.clone())
        }
    }

    /// 選中物料的庫存映射（僅含庫存 > 0 者）
    fn selected_inventory(selected: &[Material]) -> HashMap<String, Decimal> {
        selected
            .iter()
            .filter(|material| material.has_stock())
            .map(|material| (material.code.clone(), material.current_stock))
            .collect()
    }

    /// 庫存消納率（百分比），以選中庫存總價值為分母
    fn consumption_rate(consumed_value: Decimal, selected: &[Material]) -> Decimal {
        let total_value: Decimal = selected.iter().map(Material::stock_value).sum();
        if total_value > Decimal::ZERO {
            consumed_value / total_value * Decimal::from(100)
        } else {
            Decimal::ZERO
        }
    }
}
