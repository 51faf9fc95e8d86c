//! 优惠券
//!
//! 券码大小写归一且全局唯一；生效窗口 expires_at > active_from
//! 在任何写入前校验

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use mesa_access::{ProtectedResource, ResourceKind};
use mesa_common::{AuditInfo, OwnerId};
use mesa_domain_core::{AggregateRoot, Entity, Money};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryId;
use crate::error::CatalogError;

/// 优惠券 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct CouponId(pub Uuid);

impl CouponId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CouponId {
    fn default() -> Self {
        Self::new()
    }
}

/// 券码（唯一键，统一大写）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct CouponCode(String);

impl CouponCode {
    pub fn new(code: impl Into<String>) -> Result<Self, CatalogError> {
        let code = code.into().trim().to_uppercase();
        if code.is_empty() {
            return Err(CatalogError::EmptyCode);
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 折扣类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountType {
    /// 按百分比（1..=100）
    Percentage(u8),
    /// 按固定金额
    Fixed(Money),
}

/// 适用范围
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum CouponScope {
    AllProducts,
    Category { category_id: CategoryId },
}

/// 优惠券
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub discount: DiscountType,
    pub min_order_value: Money,
    pub max_uses_per_customer: u32,
    pub active_from: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub scope: CouponScope,
    pub owner: OwnerId,
    pub audit_info: AuditInfo,
}

impl Coupon {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: CouponCode,
        discount: DiscountType,
        min_order_value: Money,
        max_uses_per_customer: u32,
        active_from: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        scope: CouponScope,
        owner: OwnerId,
    ) -> Result<Self, CatalogError> {
        validate_window(active_from, expires_at)?;
        validate_discount(&discount)?;

        Ok(Self {
            id: CouponId::new(),
            code,
            discount,
            min_order_value,
            max_uses_per_customer,
            active_from,
            expires_at,
            scope,
            owner,
            audit_info: AuditInfo::default(),
        })
    }

    /// 调整生效窗口，非法窗口拒绝且不改动现状
    pub fn reschedule(
        &mut self,
        active_from: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        validate_window(active_from, expires_at)?;
        self.active_from = active_from;
        self.expires_at = expires_at;
        self.audit_info.touch();
        Ok(())
    }

    pub fn set_discount(&mut self, discount: DiscountType) -> Result<(), CatalogError> {
        validate_discount(&discount)?;
        self.discount = discount;
        self.audit_info.touch();
        Ok(())
    }

    /// 某时刻是否生效
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.active_from <= at && at < self.expires_at
    }
}

fn validate_window(
    active_from: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<(), CatalogError> {
    if expires_at <= active_from {
        return Err(CatalogError::InvalidWindow);
    }
    Ok(())
}

fn validate_discount(discount: &DiscountType) -> Result<(), CatalogError> {
    match discount {
        DiscountType::Percentage(pct) => {
            if *pct == 0 || *pct > 100 {
                return Err(CatalogError::InvalidPercentage);
            }
        }
        DiscountType::Fixed(amount) => {
            if !amount.is_positive() {
                return Err(CatalogError::NonPositiveDiscount);
            }
        }
    }
    Ok(())
}

impl Entity for Coupon {
    type Id = CouponId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Coupon {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

impl ProtectedResource for Coupon {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Coupon
    }

    fn owner(&self) -> OwnerId {
        self.owner.clone()
    }
}
