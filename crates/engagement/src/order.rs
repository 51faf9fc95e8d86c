//! 订单只读视图
//!
//! 订单由下单端生成，管理后台只读：没有任何创建或修改入口

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use mesa_access::{ProtectedResource, ResourceKind};
use mesa_catalog::ProductId;
use mesa_common::OwnerId;
use mesa_domain_core::{Entity, Money};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 订单 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

/// 收货人信息（下单时反规范化的快照）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

/// 订单行（商品快照 + 数量 + 行内折扣）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_discount: Money,
}

impl OrderLine {
    /// 行小计 = 单价 × 数量 - 行内折扣
    ///
    /// 折扣与单价币种不一致的行视为不可结算，返回 None
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price
            .scaled(self.quantity as i64)
            .checked_sub(&self.line_discount)
    }
}

/// 订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: OwnerId,
    pub receiver: Receiver,
    pub lines: Vec<OrderLine>,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// 订单总额
    ///
    /// 空订单或行间币种不一致返回 None；汇总是读路径，不 panic
    pub fn total(&self) -> Option<Money> {
        let mut lines = self.lines.iter();
        let mut total = lines.next()?.subtotal()?;
        for line in lines {
            total = total.checked_add(&line.subtotal()?)?;
        }
        Some(total)
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProtectedResource for Order {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Order
    }

    fn owner(&self) -> OwnerId {
        self.owner.clone()
    }
}
