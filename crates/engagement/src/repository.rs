//! 互动仓储接口
//!
//! 订单仓储只有读操作：本后台对订单是纯粹的旁观者

use async_trait::async_trait;
use mesa_access::Audience;
use mesa_common::VendorId;
use mesa_errors::AppResult;
use mesa_ports::{RecordFilter, Repository};

use crate::feedback::{AuthorKind, Feedback, FeedbackId};
use crate::notification::{Notification, NotificationId};
use crate::order::{Order, OrderId};

/// 订单只读仓储
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>>;

    /// 单一取数路径
    async fn find_filtered(&self, filter: &RecordFilter<()>) -> AppResult<Vec<Order>>;
}

/// 反馈仓储
#[async_trait]
pub trait FeedbackRepository: Repository<Feedback, FeedbackId> {
    /// 商家可见子集：指向该商家的顾客反馈
    async fn find_customer_feedback_for(&self, vendor_id: &VendorId)
    -> AppResult<Vec<Feedback>>;

    /// 管理端列表，可按作者类型过滤
    async fn find_by_author(&self, author: Option<AuthorKind>) -> AppResult<Vec<Feedback>>;
}

/// 通知仓储
#[async_trait]
pub trait NotificationRepository: Repository<Notification, NotificationId> {
    async fn find_by_audience(&self, audience: Audience) -> AppResult<Vec<Notification>>;
}
