//! 替代料選料引擎
//!
//! 依主料缺口對候選替代料評分排序，偏好消納呆滯庫存

use bomopt_core::{Material, SubstitutionDecision, SubstitutionRelation};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 替代料候選項
struct Candidate<'a> {
    relation: &'a SubstitutionRelation,
    material: &'a Material,
    required_quantity: Decimal,
    score: Decimal,
}

/// 替代料選擇器
pub struct SubstituteSelector;

impl SubstituteSelector {
    /// 選擇最優替代料
    ///
    /// 只考慮庫存足以覆蓋換算後需求量的候選；全部不足時回傳 `None`
    pub fn select_best(
        primary: &Material,
        shortage: Decimal,
        relations: &[SubstitutionRelation],
        materials: &HashMap<String, Material>,
        inventory: &HashMap<String, Decimal>,
        prefer_stagnant: bool,
    ) -> Option<SubstitutionDecision> {
        let mut candidates: Vec<Candidate> = Vec::new();

        for relation in relations {
            let Some(material) = materials.get(&relation.substitute_code) else {
                continue;
            };

            let required_quantity = shortage * relation.ratio;
            let available_quantity = inventory
                .get(&relation.substitute_code)
                .copied()
                .unwrap_or(Decimal::ZERO);

            if available_quantity >= required_quantity {
                let score = Self::calculate_score(
                    relation,
                    material,
                    required_quantity,
                    available_quantity,
                    prefer_stagnant,
                );
                candidates.push(Candidate {
                    relation,
                    material,
                    required_quantity,
                    score,
                });
            }
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));

        let best = candidates.first()?;
        tracing::debug!(
            "選中替代料: {} → {} (評分 {})",
            primary.code,
            best.material.code,
            best.score
        );

        Some(SubstitutionDecision {
            primary: primary.clone(),
            substitute: best.material.clone(),
            ratio: best.relation.ratio,
            primary_used: Decimal::ZERO,
            substitute_used: best.required_quantity,
            reason: Self::build_reason(best),
            cost_impact: best.required_quantity * best.relation.cost_difference,
            stagnant_value_consumed: if best.material.is_stagnant {
                best.required_quantity * best.material.unit_price
            } else {
                Decimal::ZERO
            },
        })
    }

    /// 替代料評分
    ///
    /// 呆滯料 +50；比例接近 1:1 最高 +30；成本不高於主料 +20（更貴則按差額扣）；
    /// 庫存充足度最高 +10；再加關係優先級
    fn calculate_score(
        relation: &SubstitutionRelation,
        material: &Material,
        required_quantity: Decimal,
        available_quantity: Decimal,
        prefer_stagnant: bool,
    ) -> Decimal {
        let mut score = Decimal::ZERO;

        if prefer_stagnant && material.is_stagnant {
            score += Decimal::from(50);
        }

        let ratio_diff = (relation.ratio - Decimal::ONE).abs();
        score += (Decimal::from(30) - ratio_diff * Decimal::from(30)).max(Decimal::ZERO);

        if relation.cost_difference <= Decimal::ZERO {
            score += Decimal::from(20);
        } else {
            score += (Decimal::from(20) - relation.cost_difference / Decimal::from(10))
                .max(Decimal::ZERO);
        }

        // 需求量為零時視為庫存絕對充足
        score += if required_quantity > Decimal::ZERO {
            (available_quantity / required_quantity * Decimal::from(5)).min(Decimal::from(10))
        } else {
            Decimal::from(10)
        };

        score += Decimal::from(relation.priority);

        score
    }

    /// 生成替代原因說明
    fn build_reason(candidate: &Candidate) -> String {
        let mut reasons = Vec::new();

        if candidate.material.is_stagnant {
            reasons.push("消納呆滯庫存");
        }
        if (candidate.relation.ratio - Decimal::ONE).abs() < Decimal::new(1, 1) {
            reasons.push("替代比例接近 1:1");
        }
        if candidate.relation.cost_difference <= Decimal::ZERO {
            reasons.push("成本更低");
        }

        if reasons.is_empty() {
            "庫存充足".to_string()
        } else {
            reasons.join(", ")
        }
    }
}
