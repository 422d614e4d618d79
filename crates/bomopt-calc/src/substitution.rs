//! 替代料關係解析
//!
//! 從 BOM 替代組推導主料/替代料關係與換算比例

use bomopt_core::{BomRow, Material, SubstitutionRelation};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 解析替代料關係
///
/// 以 `(父件編碼, 替代組)` 分組；組內替代標識空白的行是主料，
/// 其餘為替代料。缺少主料或沒有任何替代料的組不產生關係。
pub fn parse_substitution_relations(
    bom_rows: &[BomRow],
    materials: &HashMap<String, Material>,
) -> Vec<SubstitutionRelation> {
    let mut groups: HashMap<(String, String), Vec<&BomRow>> = HashMap::new();

    for row in bom_rows {
        if row.in_alternative_group() {
            groups
                .entry((row.parent_code.clone(), row.alternative_group.clone()))
                .or_default()
                .push(row);
        }
    }

    let mut relations = Vec::new();

    for ((parent_code, group), rows) in groups {
        let primary = rows.iter().find(|row| !row.is_substitute());
        let substitutes: Vec<&&BomRow> = rows.iter().filter(|row| row.is_substitute()).collect();

        let primary = match primary {
            Some(primary) if !substitutes.is_empty() => primary,
            _ => continue,
        };

        if primary.child_quantity <= Decimal::ZERO {
            // Decimal 除以零會 panic，這種主料行只能捨棄
            tracing::warn!(
                "替代組主料單耗非正值，跳過: 父件 {} 組 {}",
                parent_code,
                group
            );
            continue;
        }

        for substitute in substitutes {
            let ratio = substitute.child_quantity / primary.child_quantity;

            let cost_difference = match (
                materials.get(&substitute.child_code),
                materials.get(&primary.child_code),
            ) {
                (Some(substitute_material), Some(primary_material)) => {
                    substitute_material.unit_price - primary_material.unit_price
                }
                _ => Decimal::ZERO,
            };

            relations.push(
                SubstitutionRelation::new(
                    primary.child_code.clone(),
                    substitute.child_code.clone(),
                    ratio,
                )
                .with_cost_difference(cost_difference)
                .with_applicable_products(vec![parent_code.clone()]),
            );
        }
    }

    tracing::debug!("解析替代料關係: {} 條", relations.len());
    relations
}

/// 取得某主料的所有替代料關係
pub fn substitutes_for<'a>(
    material_code: &str,
    relations: &'a [SubstitutionRelation],
) -> Vec<&'a SubstitutionRelation> {
    relations
        .iter()
        .filter(|relation| relation.primary_code == material_code)
        .collect()
}

/// 物料是否有替代料
pub fn has_substitutes(material_code: &str, relations: &[SubstitutionRelation]) -> bool {
    relations
        .iter()
        .any(|relation| relation.primary_code == material_code)
}

/// 物料是否為替代料
pub fn is_substitute_material(material_code: &str, relations: &[SubstitutionRelation]) -> bool {
    relations
        .iter()
        .any(|relation| relation.substitute_code == material_code)
}

/// 某替代料可以替代哪些主料
pub fn substitutable_primaries<'a>(
    material_code: &str,
    relations: &'a [SubstitutionRelation],
) -> Vec<&'a SubstitutionRelation> {
    relations
        .iter()
        .filter(|relation| relation.substitute_code == material_code)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn materials_with_prices() -> HashMap<String, Material> {
        HashMap::from([
            (
                "MAIN".to_string(),
                Material::new("MAIN", "主料", Decimal::from(10)),
            ),
            (
                "ALT-1".to_string(),
                Material::new("ALT-1", "替代一", Decimal::from(8)),
            ),
            (
                "ALT-2".to_string(),
                Material::new("ALT-2", "替代二", Decimal::from(15)),
            ),
        ])
    }

    #[test]
    fn test_parse_one_group_two_substitutes() {
        let rows = vec![
            BomRow::new("P", "MAIN", Decimal::from(2)).in_group("G1"),
            BomRow::new("P", "ALT-1", Decimal::from(2)).as_substitute_in("G1"),
            BomRow::new("P", "ALT-2", Decimal::from(4)).as_substitute_in("G1"),
        ];

        let mut relations = parse_substitution_relations(&rows, &materials_with_prices());
        relations.sort_by(|a, b| a.substitute_code.cmp(&b.substitute_code));

        assert_eq!(relations.len(), 2);

        // ALT-1: 2/2 = 1，成本差 8-10 = -2
        assert_eq!(relations[0].primary_code, "MAIN");
        assert_eq!(relations[0].ratio, Decimal::ONE);
        assert_eq!(relations[0].cost_difference, Decimal::from(-2));
        assert_eq!(relations[0].priority, 5);
        assert_eq!(relations[0].applicable_products, vec!["P".to_string()]);

        // ALT-2: 4/2 = 2，成本差 15-10 = 5
        assert_eq!(relations[1].ratio, Decimal::from(2));
        assert_eq!(relations[1].cost_difference, Decimal::from(5));
    }

    #[test]
    fn test_group_without_primary_is_skipped() {
        let rows = vec![BomRow::new("P", "ALT-1", Decimal::ONE).as_substitute_in("G1")];
        assert!(parse_substitution_relations(&rows, &HashMap::new()).is_empty());
    }

    #[test]
    fn test_group_without_substitute_is_skipped() {
        let rows = vec![BomRow::new("P", "MAIN", Decimal::ONE).in_group("G1")];
        assert!(parse_substitution_relations(&rows, &HashMap::new()).is_empty());
    }

    #[test]
    fn test_unknown_material_cost_difference_zero() {
        let rows = vec![
            BomRow::new("P", "MAIN", Decimal::ONE).in_group("G1"),
            BomRow::new("P", "GHOST", Decimal::ONE).as_substitute_in("G1"),
        ];

        let relations = parse_substitution_relations(&rows, &materials_with_prices());
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].cost_difference, Decimal::ZERO);
    }

    #[test]
    fn test_zero_quantity_primary_skipped() {
        let rows = vec![
            BomRow::new("P", "MAIN", Decimal::ZERO).in_group("G1"),
            BomRow::new("P", "ALT-1", Decimal::ONE).as_substitute_in("G1"),
        ];

        assert!(parse_substitution_relations(&rows, &materials_with_prices()).is_empty());
    }

    #[test]
    fn test_same_group_id_under_different_parents() {
        // 不同父件下的同名替代組互不混淆
        let rows = vec![
            BomRow::new("P1", "MAIN", Decimal::ONE).in_group("G1"),
            BomRow::new("P1", "ALT-1", Decimal::ONE).as_substitute_in("G1"),
            BomRow::new("P2", "MAIN", Decimal::ONE).in_group("G1"),
            BomRow::new("P2", "ALT-2", Decimal::from(3)).as_substitute_in("G1"),
        ];

        let relations = parse_substitution_relations(&rows, &materials_with_prices());
        assert_eq!(relations.len(), 2);

        let for_p2: Vec<_> = relations
            .iter()
            .filter(|relation| relation.applicable_products == vec!["P2".to_string()])
            .collect();
        assert_eq!(for_p2.len(), 1);
        assert_eq!(for_p2[0].ratio, Decimal::from(3));
    }

    #[test]
    fn test_query_helpers() {
        let relations = vec![
            SubstitutionRelation::new("MAIN", "ALT-1", Decimal::ONE),
            SubstitutionRelation::new("MAIN", "ALT-2", Decimal::from(2)),
            SubstitutionRelation::new("OTHER", "ALT-1", Decimal::ONE),
        ];

        assert_eq!(substitutes_for("MAIN", &relations).len(), 2);
        assert!(has_substitutes("MAIN", &relations));
        assert!(!has_substitutes("ALT-1", &relations));
        assert!(is_substitute_material("ALT-1", &relations));
        assert!(!is_substitute_material("MAIN", &relations));
        assert_eq!(substitutable_primaries("ALT-1", &relations).len(), 2);
    }
}
