//! MOQ 感知補料分析
//!
//! 按最小起訂量約束計算實際訂貨量與過剩金額

use bomopt_core::Material;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單一物料的 MOQ 補料分析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoqAnalysis {
    /// 物料編碼
    pub material_code: String,

    /// 物料名稱
    pub material_name: String,

    /// 缺口數量
    pub shortage: Decimal,

    /// 最小起訂量
    pub moq: Decimal,

    /// 實際訂貨量（MOQ 的整數倍）
    pub order_quantity: Decimal,

    /// 過剩數量（訂貨量 − 缺口）
    pub excess: Decimal,

    /// 過剩金額
    pub excess_value: Decimal,

    /// 單價
    pub unit_price: Decimal,
}

/// MOQ 計算器
pub struct MoqCalculator;

impl MoqCalculator {
    /// 分析達到目標產量需要補充的物料
    ///
    /// `requirements` 為單位需求量（物料編碼 → 單耗）。
    /// 只回報有缺口的物料，按過剩金額降序排列（高風險在前）
    pub fn analyze(
        target_quantity: Decimal,
        requirements: &HashMap<String, Decimal>,
        inventory: &HashMap<String, Decimal>,
        moq_table: &HashMap<String, Decimal>,
        materials: &HashMap<String, Material>,
    ) -> Vec<MoqAnalysis> {
        let mut results = Vec::new();
        let mut total_excess_value = Decimal::ZERO;

        for (code, required_per_unit) in requirements {
            let total_required = required_per_unit * target_quantity;
            let available = inventory.get(code).copied().unwrap_or(Decimal::ZERO);
            let shortage = (total_required - available).max(Decimal::ZERO);

            if shortage <= Decimal::ZERO {
                continue;
            }

            let moq = moq_table
                .get(code)
                .copied()
                .filter(|moq| *moq > Decimal::ZERO)
                .unwrap_or(Decimal::ONE);
            let material = materials.get(code);
            let unit_price = material.map_or(Decimal::ZERO, |material| material.unit_price);

            let order_quantity = (shortage / moq).ceil() * moq;
            let excess = order_quantity - shortage;
            let excess_value = excess * unit_price;
            total_excess_value += excess_value;

            results.push(MoqAnalysis {
                material_code: code.clone(),
                material_name: material.map_or_else(|| code.clone(), |m| m.name.clone()),
                shortage,
                moq,
                order_quantity,
                excess,
                excess_value,
                unit_price,
            });
        }

        results.sort_by(|a, b| b.excess_value.cmp(&a.excess_value));

        tracing::debug!(
            "MOQ 分析完成: 需補料 {} 種，預計過剩總金額 {}",
            results.len(),
            total_excess_value
        );

        results
    }
}
