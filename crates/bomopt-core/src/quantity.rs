//! 可生產數量與 ROI 的哨兵類型
//!
//! 原始邏輯以浮點 Infinity 表示「無約束」與「零成本 ROI」，
//! 這裡改以明確的 sum type 表達，避免 NaN 擴散

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 某物料約束下的可生產數量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Producible {
    /// 無約束（單耗為零或缺漏）
    Unbounded,
    /// 受限於庫存的有限數量
    Bounded(Decimal),
}

impl Producible {
    /// 取兩個約束中較緊的一個（Unbounded 視為無限大）
    pub fn min(self, other: Producible) -> Producible {
        match (self, other) {
            (Producible::Unbounded, b) => b,
            (a, Producible::Unbounded) => a,
            (Producible::Bounded(a), Producible::Bounded(b)) => Producible::Bounded(a.min(b)),
        }
    }

    /// 取有限值，無約束時回傳預設值
    pub fn bounded_or(self, default: Decimal) -> Decimal {
        match self {
            Producible::Unbounded => default,
            Producible::Bounded(qty) => qty,
        }
    }

    /// 取有限值，無約束時回傳 0
    ///
    /// 「全部無約束」等同於「沒有任何物料被 BOM 用到」，可生產數量定義為 0
    pub fn bounded_or_zero(self) -> Decimal {
        self.bounded_or(Decimal::ZERO)
    }

    /// 有限且大於零
    pub fn is_positive(&self) -> bool {
        matches!(self, Producible::Bounded(qty) if *qty > Decimal::ZERO)
    }
}

impl fmt::Display for Producible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Producible::Unbounded => write!(f, "∞"),
            Producible::Bounded(qty) => write!(f, "{}", qty),
        }
    }
}

/// 投資報酬率
///
/// 成本為零時定義為 +∞（有產出、零投入）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Roi {
    /// 零成本哨兵值
    Infinite,
    /// (產出價值 − 成本) / 成本
    Ratio(Decimal),
}

impl Roi {
    /// 由產出價值與成本計算 ROI
    pub fn from_values(output_value: Decimal, total_cost: Decimal) -> Roi {
        if total_cost > Decimal::ZERO {
            Roi::Ratio((output_value - total_cost) / total_cost)
        } else {
            Roi::Infinite
        }
    }

    /// 報酬是否為正
    pub fn is_positive(&self) -> bool {
        match self {
            Roi::Infinite => true,
            Roi::Ratio(ratio) => *ratio > Decimal::ZERO,
        }
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Roi::Infinite => write!(f, "+∞"),
            Roi::Ratio(ratio) => write!(f, "{}", ratio),
        }
    }
}
