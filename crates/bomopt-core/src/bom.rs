//! BOM 扁平邊列表模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// BOM 單行記錄（父件 → 子件的一條邊）
///
/// 同一父件下共用 `alternative_group` 的行構成一個替代組：
/// `alternative_part` 為空白的行是主料，其餘為替代料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomRow {
    /// BOM 編號
    pub bom_number: String,

    /// 父件編碼
    pub parent_code: String,

    /// 父件名稱
    pub parent_name: String,

    /// 子件編碼
    pub child_code: String,

    /// 子件名稱
    pub child_name: String,

    /// 單耗數量（每 1 單位父件所需子件數量）
    pub child_quantity: Decimal,

    /// 單位
    pub unit: String,

    /// 損耗率
    pub loss_rate: Decimal,

    /// 替代組編號（空白 = 不屬於任何替代組）
    pub alternative_group: String,

    /// 替代標識（空白 = 主料，非空白 = 替代料）
    pub alternative_part: String,
}

impl BomRow {
    /// 創建新的 BOM 行
    pub fn new(
        parent_code: impl Into<String>,
        child_code: impl Into<String>,
        child_quantity: Decimal,
    ) -> Self {
        Self {
            bom_number: String::new(),
            parent_code: parent_code.into(),
            parent_name: String::new(),
            child_code: child_code.into(),
            child_name: String::new(),
            child_quantity,
            unit: String::new(),
            loss_rate: Decimal::ZERO,
            alternative_group: String::new(),
            alternative_part: String::new(),
        }
    }

    /// 建構器模式：設置 BOM 編號
    pub fn with_bom_number(mut self, bom_number: impl Into<String>) -> Self {
        self.bom_number = bom_number.into();
        self
    }

    /// 建構器模式：設置父件/子件名稱
    pub fn with_names(
        mut self,
        parent_name: impl Into<String>,
        child_name: impl Into<String>,
    ) -> Self {
        self.parent_name = parent_name.into();
        self.child_name = child_name.into();
        self
    }

    /// 建構器模式：設置單位
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// 建構器模式：設置損耗率
    pub fn with_loss_rate(mut self, loss_rate: Decimal) -> Self {
        self.loss_rate = loss_rate;
        self
    }

    /// 建構器模式：加入替代組（主料行）
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.alternative_group = group.into();
        self
    }

    /// 建構器模式：加入替代組並標記為替代料
    pub fn as_substitute_in(mut self, group: impl Into<String>) -> Self {
        self.alternative_group = group.into();
        self.alternative_part = "替代".to_string();
        self
    }

    /// 是否為替代料行（替代標識非空白）
    pub fn is_substitute(&self) -> bool {
        !self.alternative_part.trim().is_empty()
    }

    /// 是否屬於某個替代組
    pub fn in_alternative_group(&self) -> bool {
        !self.alternative_group.trim().is_empty()
    }
}
