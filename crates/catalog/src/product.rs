//! 商品
//!
//! 折扣 = 原价 - 售价，必须非负；优惠活动是封闭的标签变体

use derive_more::{Display, From};
use mesa_access::{ProtectedResource, ResourceKind};
use mesa_common::{AuditInfo, OwnerId};
use mesa_domain_core::{AggregateRoot, Entity, Money};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryId;
use crate::error::CatalogError;

/// 商品 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 上架状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Available,
    Upcoming,
    Cancelled,
}

/// 优惠活动
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Offer {
    None,
    /// 买一送一（同款）
    Bogo,
    /// 买一送一（指定另一商品）
    BogoDifferentProduct { product_id: ProductId },
    /// 买 X 送 Y（同款）
    BuyXGetY { buy: u32, get: u32 },
    /// 买 X 送 Y（指定另一商品）
    BuyXGetYDifferentProduct {
        buy: u32,
        get: u32,
        product_id: ProductId,
    },
}

/// 商品定价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    pub original_price: Money,
    pub selling_price: Money,
}

impl Pricing {
    /// 校验定价：同币种且售价不高于原价
    pub fn new(original_price: Money, selling_price: Money) -> Result<Self, CatalogError> {
        let discount = original_price
            .checked_sub(&selling_price)
            .ok_or(CatalogError::CurrencyMismatch)?;

        if discount.is_negative() {
            return Err(CatalogError::NegativeDiscount);
        }

        Ok(Self {
            original_price,
            selling_price,
        })
    }

    /// 派生折扣额
    pub fn discount(&self) -> Money {
        // 构造时已校验同币种与非负
        Money::new(
            self.original_price.amount - self.selling_price.amount,
            self.original_price.currency.clone(),
        )
    }
}

/// 商品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub owner: OwnerId,
    pub category_id: CategoryId,
    pub pricing: Pricing,
    pub status: ProductStatus,
    pub offer: Offer,
    pub image_url: Option<String>,
    pub audit_info: AuditInfo,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        owner: OwnerId,
        category_id: CategoryId,
        pricing: Pricing,
        status: ProductStatus,
        offer: Offer,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            owner,
            category_id,
            pricing,
            status,
            offer,
            image_url: None,
            audit_info: AuditInfo::default(),
        }
    }

    pub fn discount(&self) -> Money {
        self.pricing.discount()
    }

    pub fn update_pricing(&mut self, pricing: Pricing) {
        self.pricing = pricing;
        self.audit_info.touch();
    }

    pub fn set_status(&mut self, status: ProductStatus) {
        self.status = status;
        self.audit_info.touch();
    }

    pub fn set_offer(&mut self, offer: Offer) {
        self.offer = offer;
        self.audit_info.touch();
    }

    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = Some(url.into());
        self.audit_info.touch();
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Product {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

impl ProtectedResource for Product {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Product
    }

    fn owner(&self) -> OwnerId {
        self.owner.clone()
    }

    /// 仅在售商品对顾客可见，upcoming/cancelled 视同待审批
    fn is_approved(&self) -> bool {
        self.status == ProductStatus::Available
    }
}
