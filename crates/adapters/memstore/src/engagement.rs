//! 互动仓储的文档存储实现
//!
//! 订单集合没有写入口，测试通过 MemDocumentStore::seed 播种

use std::sync::Arc;

use async_trait::async_trait;
use mesa_access::Audience;
use mesa_common::VendorId;
use mesa_engagement::{
    AuthorKind, Feedback, FeedbackId, FeedbackRepository, Notification, NotificationId,
    NotificationRepository, Order, OrderId, OrderRepository,
};
use mesa_errors::AppResult;
use mesa_ports::{DocumentStore, Filter, RecordFilter, Repository};

use crate::codec::{from_document, from_documents, id_filter, owner_only, to_document, upsert};

const ORDERS: &str = "orders";
const FEEDBACK: &str = "feedback";
const NOTIFICATIONS: &str = "notifications";

/// 订单只读仓储
pub struct DocOrderRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocOrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderRepository for DocOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>> {
        match self.store.find_one(ORDERS, &id_filter(&id.to_string())).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn find_filtered(&self, filter: &RecordFilter<()>) -> AppResult<Vec<Order>> {
        let conditions = owner_only(filter)?;
        from_documents(self.store.find_many(ORDERS, &conditions).await?)
    }
}

/// 反馈仓储
pub struct DocFeedbackRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocFeedbackRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Feedback, FeedbackId> for DocFeedbackRepository {
    async fn find_by_id(&self, id: &FeedbackId) -> AppResult<Option<Feedback>> {
        match self.store.find_one(FEEDBACK, &id_filter(&id.to_string())).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: &Feedback) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), FEEDBACK, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &FeedbackId) -> AppResult<()> {
        self.store.delete(FEEDBACK, &id.to_string()).await
    }
}

#[async_trait]
impl FeedbackRepository for DocFeedbackRepository {
    async fn find_customer_feedback_for(&self, vendor_id: &VendorId) -> AppResult<Vec<Feedback>> {
        let conditions = Filter::new()
            .eq("author", to_document(&AuthorKind::Customer)?)
            .eq("vendor_id", vendor_id.to_string());
        from_documents(self.store.find_many(FEEDBACK, &conditions).await?)
    }

    async fn find_by_author(&self, author: Option<AuthorKind>) -> AppResult<Vec<Feedback>> {
        let conditions = match author {
            Some(kind) => Filter::new().eq("author", to_document(&kind)?),
            None => Filter::new(),
        };
        from_documents(self.store.find_many(FEEDBACK, &conditions).await?)
    }
}

/// 通知仓储
pub struct DocNotificationRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocNotificationRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Notification, NotificationId> for DocNotificationRepository {
    async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
        match self
            .store
            .find_one(NOTIFICATIONS, &id_filter(&id.to_string()))
            .await?
        {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: &Notification) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), NOTIFICATIONS, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &NotificationId) -> AppResult<()> {
        self.store.delete(NOTIFICATIONS, &id.to_string()).await
    }
}

#[async_trait]
impl NotificationRepository for DocNotificationRepository {
    async fn find_by_audience(&self, audience: Audience) -> AppResult<Vec<Notification>> {
        let conditions = Filter::new().eq("audience", to_document(&audience)?);
        from_documents(self.store.find_many(NOTIFICATIONS, &conditions).await?)
    }
}
