//! # BOM Optimizer
//!
//! 庫存優化模組（全產品掃描分析、多產品貪心分配）

pub mod allocator;
pub mod analyzer;

// Re-export 主要類型
pub use allocator::{MultiProductOptimizer, OptimizationResult, ProductAllocation, UnconsumedMaterial};
pub use analyzer::{InventoryAnalyzer, ProductOptimizationResult};
