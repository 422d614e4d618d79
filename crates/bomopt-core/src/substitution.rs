//! 替代料關係與決策模型

use crate::Material;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 替代料關係（由 BOM 替代組推導，不落庫）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionRelation {
    /// 主料編碼
    pub primary_code: String,

    /// 替代料編碼
    pub substitute_code: String,

    /// 替代比例（每 1 單位主料需要的替代料數量）
    pub ratio: Decimal,

    /// 優先級 1-10
    pub priority: u8,

    /// 成本差異（替代料單價 − 主料單價；任一物料未知時為 0）
    pub cost_difference: Decimal,

    /// 適用產品範圍（父件編碼列表）
    pub applicable_products: Vec<String>,
}

impl SubstitutionRelation {
    /// 創建新的替代料關係
    pub fn new(
        primary_code: impl Into<String>,
        substitute_code: impl Into<String>,
        ratio: Decimal,
    ) -> Self {
        Self {
            primary_code: primary_code.into(),
            substitute_code: substitute_code.into(),
            ratio,
            priority: 5,
            cost_difference: Decimal::ZERO,
            applicable_products: Vec::new(),
        }
    }

    /// 建構器模式：設置優先級
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.min(10);
        self
    }

    /// 建構器模式：設置成本差異
    pub fn with_cost_difference(mut self, cost_difference: Decimal) -> Self {
        self.cost_difference = cost_difference;
        self
    }

    /// 建構器模式：設置適用產品
    pub fn with_applicable_products(mut self, products: Vec<String>) -> Self {
        self.applicable_products = products;
        self
    }
}

/// 替代料決策（選料引擎輸出）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionDecision {
    /// 主料
    pub primary: Material,

    /// 選中的替代料
    pub substitute: Material,

    /// 替代比例
    pub ratio: Decimal,

    /// 使用的主料數量
    pub primary_used: Decimal,

    /// 使用的替代料數量
    pub substitute_used: Decimal,

    /// 替代原因說明
    pub reason: String,

    /// 成本影響（替代料用量 × 成本差異）
    pub cost_impact: Decimal,

    /// 消納的呆滯料價值
    pub stagnant_value_consumed: Decimal,
}
