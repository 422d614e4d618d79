//! # BOM Calculation Engine
//!
//! BOM 展開、替代料解析/選料、生產方案與 MOQ 補料計算

pub mod expander;
pub mod moq;
pub mod planner;
pub mod selector;
pub mod substitution;

// Re-export 主要類型
pub use expander::{
    expand_bom, format_tree, leaf_requirements, leaf_requirements_with_substitutes,
    material_requirements, max_producible_with_substitutes, tree_stats, BomTree,
    EnhancedMaterialRequirement, MaterialRequirement, TreeStats,
};
pub use moq::{MoqAnalysis, MoqCalculator};
pub use planner::PlanCalculator;
pub use selector::SubstituteSelector;
pub use substitution::{
    has_substitutes, is_substitute_material, parse_substitution_relations, substitutable_primaries,
    substitutes_for,
};
