//! # BOM Optimization Core
//!
//! 核心資料模型與類型定義

pub mod bom;
pub mod material;
pub mod plan;
pub mod product;
pub mod quantity;
pub mod snapshot;
pub mod substitution;

// Re-export 主要類型
pub use bom::BomRow;
pub use material::Material;
pub use plan::{MaterialSupplement, MaterialUsage, ProductionPlan};
pub use product::Product;
pub use quantity::{Producible, Roi};
pub use snapshot::PlanningSnapshot;
pub use substitution::{SubstitutionDecision, SubstitutionRelation};

/// 計算層錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("BOM 循環引用: {0}")]
    CycleDetected(String),

    #[error("找不到物料: {0}")]
    MaterialNotFound(String),

    #[error("找不到產品: {0}")]
    ProductNotFound(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
