//! 货币值对象

use serde::{Deserialize, Serialize};

/// 货币代码
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Self(code.to_uppercase())
    }

    pub fn inr() -> Self {
        Self("INR".to_string())
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }
}

/// 金额值对象
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    /// 金额（以最小单位存储，如分）
    pub amount: i64,
    /// 货币代码
    pub currency: Currency,
}

// PartialOrd/Ord 仅在同币种下有意义，跨币种比较由调用方先行校验

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    pub fn inr(amount: i64) -> Self {
        Self::new(amount, Currency::inr())
    }

    /// 转换为浮点数（用于显示）
    pub fn to_decimal(&self) -> f64 {
        self.amount as f64 / 100.0
    }

    /// 从浮点数创建
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        Self::new((amount * 100.0).round() as i64, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    pub fn same_currency(&self, other: &Self) -> bool {
        self.currency == other.currency
    }

    /// 带校验的减法
    ///
    /// 商品折扣等减法必须以错误而不是 panic 的形式暴露币种不一致
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if !self.same_currency(other) {
            return None;
        }
        Some(Self::new(self.amount - other.amount, self.currency.clone()))
    }

    /// 带校验的加法
    ///
    /// 订单汇总等读路径在币种不一致时返回 None，而不是 panic
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if !self.same_currency(other) {
            return None;
        }
        Some(Self::new(self.amount + other.amount, self.currency.clone()))
    }

    /// 按数量缩放（同币种，无需校验）
    pub fn scaled(&self, factor: i64) -> Self {
        Self::new(self.amount * factor, self.currency.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sub_same_currency() {
        let original = Money::inr(25_000);
        let selling = Money::inr(19_900);
        let discount = original.checked_sub(&selling).unwrap();
        assert_eq!(discount.amount, 5_100);
        assert!(discount.is_positive());
    }

    #[test]
    fn test_checked_sub_currency_mismatch() {
        let a = Money::inr(100);
        let b = Money::new(100, Currency::usd());
        assert!(a.checked_sub(&b).is_none());
    }

    #[test]
    fn test_checked_add_and_scaled() {
        let a = Money::inr(9_900);
        assert_eq!(a.checked_add(&Money::inr(4_500)), Some(Money::inr(14_400)));
        assert_eq!(a.scaled(3), Money::inr(29_700));

        let b = Money::new(100, Currency::usd());
        assert!(a.checked_add(&b).is_none());
    }

    #[test]
    fn test_decimal_conversion() {
        let m = Money::from_decimal(199.99, Currency::inr());
        assert_eq!(m.amount, 19_999);
        assert_eq!(m.to_decimal(), 199.99);
    }
}
