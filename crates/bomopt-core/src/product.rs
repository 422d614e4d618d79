//! 產品模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產品主檔記錄（BOM 樹的根節點）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 產品編碼
    pub code: String,

    /// 產品名稱
    pub name: String,

    /// 產品型號
    pub model: String,

    /// 產品系列
    pub series: String,

    /// 產品類型
    pub product_type: String,

    /// 單台售價
    pub amount: Decimal,
}

impl Product {
    /// 創建新的產品記錄
    pub fn new(code: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            model: String::new(),
            series: String::new(),
            product_type: String::new(),
            amount,
        }
    }

    /// 建構器模式：設置型號
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// 建構器模式：設置系列
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    /// 建構器模式：設置類型
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = product_type.into();
        self
    }
}
