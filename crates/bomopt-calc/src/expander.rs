//! BOM 層級展開
//!
//! 遞歸展開產品/組件到最底層物料，沿路徑累乘單耗並偵測循環引用

use bomopt_core::{BomRow, Material, PlanError, Producible, Result, SubstitutionRelation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// BOM 樹節點（單次計算持有，葉需求彙總後即丟棄）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomTree {
    /// 物料/產品編碼
    pub code: String,

    /// 名稱
    pub name: String,

    /// 此節點的總需求數量（已沿路徑累乘）
    pub quantity: Decimal,

    /// 層級（0 = 頂層）
    pub level: u32,

    /// 子節點
    pub children: Vec<BomTree>,

    /// 是否為最底層物料
    pub is_leaf: bool,
}

/// BOM 樹統計信息（診斷用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub max_depth: u32,
    pub unique_materials: usize,
}

/// 物料需求明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub material_code: String,
    pub material_name: String,
    pub required_quantity: Decimal,
    pub available_quantity: Decimal,
    pub shortage: Decimal,
}

/// 含替代料合併計算的增強需求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedMaterialRequirement {
    /// 主料編碼
    pub material_code: String,

    /// 單位產品需求量
    pub required_per_unit: Decimal,

    /// 主料可用庫存
    pub available_from_primary: Decimal,

    /// 替代料可用庫存（編碼 → 換算為主料當量的數量）
    pub available_from_substitutes: HashMap<String, Decimal>,

    /// 總可用量（主料 + 替代料當量）
    pub total_available: Decimal,

    /// 此物料約束下的可生產數量
    pub can_produce: Producible,

    /// 是否有替代料
    pub has_substitutes: bool,
}

/// 遞歸展開 BOM 到最底層物料
///
/// 僅沿主料行（替代標識空白）向下展開；替代料由選料引擎另行解析。
/// 路徑上重複出現的編碼視為循環引用，向呼叫方回傳 `CycleDetected`。
pub fn expand_bom(
    root_code: &str,
    bom_rows: &[BomRow],
    initial_quantity: Decimal,
) -> Result<BomTree> {
    expand_node(root_code, bom_rows, initial_quantity, 0, &HashSet::new())
}

fn expand_node(
    code: &str,
    bom_rows: &[BomRow],
    quantity: Decimal,
    level: u32,
    visited: &HashSet<String>,
) -> Result<BomTree> {
    if visited.contains(code) {
        return Err(PlanError::CycleDetected(code.to_string()));
    }

    // visited 只包含當前路徑上的祖先，兄弟子樹互不影響
    let mut path = visited.clone();
    path.insert(code.to_string());

    let child_rows: Vec<&BomRow> = bom_rows
        .iter()
        .filter(|row| row.parent_code == code)
        .collect();

    let name = child_rows
        .first()
        .map(|row| row.parent_name.clone())
        .filter(|parent_name| !parent_name.is_empty())
        .unwrap_or_else(|| code.to_string());

    let mut tree = BomTree {
        code: code.to_string(),
        name,
        quantity,
        level,
        children: Vec::new(),
        is_leaf: child_rows.is_empty(),
    };

    for row in child_rows {
        // 跳過替代料行，只展開主料
        if row.is_substitute() {
            continue;
        }

        let child_quantity = quantity * row.child_quantity;

        match expand_node(&row.child_code, bom_rows, child_quantity, level + 1, &path) {
            Ok(child_tree) => tree.children.push(child_tree),
            Err(err @ PlanError::CycleDetected(_)) => return Err(err),
            Err(err) => {
                tracing::warn!("展開子節點失敗，捨棄分支: {} ({})", row.child_code, err);
            }
        }
    }

    Ok(tree)
}

/// 彙總所有底層物料需求（編碼 → 總需求數量）
///
/// 同一物料經多條路徑到達時數量相加，而非覆蓋
pub fn leaf_requirements(tree: &BomTree) -> HashMap<String, Decimal> {
    let mut requirements = HashMap::new();
    collect_leaves(tree, &mut requirements);
    requirements
}

fn collect_leaves(node: &BomTree, requirements: &mut HashMap<String, Decimal>) {
    if node.is_leaf {
        *requirements.entry(node.code.clone()).or_insert(Decimal::ZERO) += node.quantity;
    } else {
        for child in &node.children {
            collect_leaves(child, requirements);
        }
    }
}

/// 取得詳細的物料需求列表（對照庫存計算缺口）
pub fn material_requirements(
    tree: &BomTree,
    materials: &HashMap<String, Material>,
    inventory: &HashMap<String, Decimal>,
) -> Vec<MaterialRequirement> {
    leaf_requirements(tree)
        .into_iter()
        .map(|(material_code, required_quantity)| {
            let material_name = materials
                .get(&material_code)
                .map(|material| material.name.clone())
                .unwrap_or_else(|| material_code.clone());
            let available_quantity = inventory
                .get(&material_code)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let shortage = (required_quantity - available_quantity).max(Decimal::ZERO);

            MaterialRequirement {
                material_code,
                material_name,
                required_quantity,
                available_quantity,
                shortage,
            }
        })
        .collect()
}

/// BOM 樹統計信息
pub fn tree_stats(tree: &BomTree) -> TreeStats {
    let mut stats = TreeStats {
        total_nodes: 0,
        leaf_nodes: 0,
        max_depth: 0,
        unique_materials: 0,
    };
    let mut unique = HashSet::new();
    walk_stats(tree, &mut stats, &mut unique);
    stats.max_depth += 1;
    stats.unique_materials = unique.len();
    stats
}

fn walk_stats(node: &BomTree, stats: &mut TreeStats, unique: &mut HashSet<String>) {
    stats.total_nodes += 1;
    unique.insert(node.code.clone());

    if node.is_leaf {
        stats.leaf_nodes += 1;
    }
    stats.max_depth = stats.max_depth.max(node.level);

    for child in &node.children {
        walk_stats(child, stats, unique);
    }
}

/// 以 ASCII 樹狀圖輸出 BOM（診斷用）
pub fn format_tree(tree: &BomTree) -> String {
    let mut out = String::new();
    format_node(tree, "", &mut out);
    out
}

fn format_node(node: &BomTree, indent: &str, out: &mut String) {
    let prefix = if node.is_leaf { "└─" } else { "├─" };
    out.push_str(&format!(
        "{}{} {} ({}) x{}\n",
        indent, prefix, node.code, node.name, node.quantity
    ));

    let last_index = node.children.len().saturating_sub(1);
    for (index, child) in node.children.iter().enumerate() {
        let child_indent = format!("{}{}", indent, if index == last_index { "  " } else { "│ " });
        format_node(child, &child_indent, out);
    }
}

/// 取得底層物料需求（含替代料合併計算）
///
/// 替代料庫存換算為主料當量（庫存 ÷ 替代比例）後併入可用量
pub fn leaf_requirements_with_substitutes(
    tree: &BomTree,
    inventory: &HashMap<String, Decimal>,
    relations: &[SubstitutionRelation],
) -> HashMap<String, EnhancedMaterialRequirement> {
    let base_requirements = leaf_requirements(tree);

    let mut substitution_map: HashMap<&str, Vec<&SubstitutionRelation>> = HashMap::new();
    for relation in relations {
        substitution_map
            .entry(relation.primary_code.as_str())
            .or_default()
            .push(relation);
    }

    let mut enhanced = HashMap::new();

    for (material_code, required_per_unit) in base_requirements {
        let available_from_primary = inventory
            .get(&material_code)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let substitutes = substitution_map
            .get(material_code.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut available_from_substitutes = HashMap::new();
        let mut total_from_substitutes = Decimal::ZERO;

        for relation in substitutes {
            let substitute_stock = inventory
                .get(&relation.substitute_code)
                .copied()
                .unwrap_or(Decimal::ZERO);

            if substitute_stock <= Decimal::ZERO {
                continue;
            }
            if relation.ratio <= Decimal::ZERO {
                tracing::warn!(
                    "替代比例非正值，忽略替代料: {} → {}",
                    relation.primary_code,
                    relation.substitute_code
                );
                continue;
            }

            let effective_available = substitute_stock / relation.ratio;
            available_from_substitutes
                .insert(relation.substitute_code.clone(), effective_available);
            total_from_substitutes += effective_available;
        }

        let total_available = available_from_primary + total_from_substitutes;
        let can_produce = if required_per_unit > Decimal::ZERO {
            Producible::Bounded((total_available / required_per_unit).floor())
        } else {
            Producible::Unbounded
        };

        enhanced.insert(
            material_code.clone(),
            EnhancedMaterialRequirement {
                material_code,
                required_per_unit,
                available_from_primary,
                available_from_substitutes,
                total_available,
                can_produce,
                has_substitutes: !substitutes.is_empty(),
            },
        );
    }

    tracing::debug!("替代料合併計算完成: {} 種物料", enhanced.len());

    enhanced
}

/// 考慮替代料後的最大可生產數量與瓶頸物料
pub fn max_producible_with_substitutes(
    requirements: &HashMap<String, EnhancedMaterialRequirement>,
) -> (Decimal, Option<String>) {
    let mut tightest = Producible::Unbounded;
    let mut bottleneck: Option<String> = None;

    for (material_code, requirement) in requirements {
        let combined = tightest.min(requirement.can_produce);
        if combined != tightest {
            tightest = combined;
            bottleneck = Some(material_code.clone());
        }
    }

    // 全部無約束等同於沒有任何受限物料
    (tightest.bounded_or_zero(), bottleneck)
}
