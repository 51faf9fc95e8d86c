//! 互动应用服务

use std::sync::Arc;

use chrono::Utc;
use mesa_access::{
    Action, Audience, Listing, authorize, degrade_reads, filter_visible, scope_listing,
};
use mesa_auth_core::{Capability, Principal, Role};
use mesa_common::VendorId;
use mesa_errors::{AppError, AppResult};
use mesa_ports::RecordFilter;
use tracing::info;

use crate::feedback::{AuthorKind, Feedback, FeedbackKind, Rating};
use crate::notification::{Notification, NotificationId};
use crate::order::{Order, OrderId};
use crate::repository::{FeedbackRepository, NotificationRepository, OrderRepository};

/// 新反馈
#[derive(Debug)]
pub struct FeedbackDraft {
    pub vendor_id: Option<VendorId>,
    pub kind: FeedbackKind,
    pub rating: Option<u8>,
    pub message: String,
}

/// 新通知
#[derive(Debug)]
pub struct NotificationDraft {
    pub title: String,
    pub body: String,
    pub audience: Audience,
    pub expires_at: Option<chrono::DateTime<Utc>>,
}

/// 互动服务
pub struct EngagementService {
    orders: Arc<dyn OrderRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl EngagementService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            orders,
            feedback,
            notifications,
        }
    }

    // ---- 反馈 ----

    /// 提交反馈，作者身份取自请求主体，不可伪造
    pub async fn submit_feedback(
        &self,
        actor: &Principal,
        draft: FeedbackDraft,
    ) -> AppResult<Feedback> {
        let author = match actor.role {
            Role::Customer => AuthorKind::Customer,
            Role::Vendor => AuthorKind::Vendor,
            Role::Admin | Role::MainAdmin => {
                return Err(AppError::permission_denied(
                    "administrators do not author feedback",
                ));
            }
        };

        let rating = draft
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(AppError::from)?;

        let feedback = Feedback::new(
            author,
            actor.id.as_str(),
            draft.vendor_id,
            draft.kind,
            rating,
            draft.message,
        );

        authorize(actor, Action::Create, &feedback).into_result()?;
        self.feedback.save(&feedback).await?;
        info!(feedback_id = %feedback.id, author = ?feedback.author, "Feedback submitted");
        Ok(feedback)
    }

    /// 反馈列表
    ///
    /// 管理端可全量并按作者类型过滤；商家只能拿到指向自己的顾客反馈
    pub async fn list_feedback(
        &self,
        actor: &Principal,
        author: Option<AuthorKind>,
    ) -> AppResult<Vec<Feedback>> {
        if actor.is_administrative() {
            return degrade_reads(self.feedback.find_by_author(author).await, "feedback");
        }

        match actor.role {
            Role::Vendor => {
                let vendor_id = actor
                    .vendor_id
                    .clone()
                    .ok_or_else(|| AppError::internal("vendor principal without vendor id"))?;
                let records = degrade_reads(
                    self.feedback.find_customer_feedback_for(&vendor_id).await,
                    "feedback",
                )?;
                // 仓储已收窄，这里再过一遍同一条可见性规则兜底
                Ok(filter_visible(actor, records))
            }
            _ => Err(AppError::permission_denied(
                "feedback listing is not available to customers",
            )),
        }
    }

    // ---- 通知 ----

    /// 发布平台广播
    pub async fn broadcast(
        &self,
        actor: &Principal,
        draft: NotificationDraft,
    ) -> AppResult<Notification> {
        if !actor.has_capability(Capability::NotificationBroadcast) {
            return Err(AppError::permission_denied(
                "notification broadcast requires an administrative actor",
            ));
        }

        let notification = Notification::new(
            draft.title,
            draft.body,
            draft.audience,
            draft.expires_at,
            actor.id.as_str(),
        )
        .map_err(AppError::from)?;

        self.notifications.save(&notification).await?;
        info!(
            notification_id = %notification.id,
            audience = ?notification.audience,
            "Notification broadcast"
        );
        Ok(notification)
    }

    /// 当前主体的未过期通知
    pub async fn active_notifications(&self, actor: &Principal) -> AppResult<Vec<Notification>> {
        let audience = match actor.role {
            Role::Vendor => Audience::Vendors,
            Role::Customer => Audience::Customers,
            Role::Admin | Role::MainAdmin => {
                return Err(AppError::permission_denied(
                    "administrators list notifications by audience explicitly",
                ));
            }
        };

        let now = Utc::now();
        let records = degrade_reads(
            self.notifications.find_by_audience(audience).await,
            "notifications",
        )?;
        let active = records
            .into_iter()
            .filter(|n| n.is_active_at(now))
            .collect();
        Ok(filter_visible(actor, active))
    }

    /// 管理端按受众列出全部通知（含已过期）
    pub async fn list_notifications(
        &self,
        actor: &Principal,
        audience: Audience,
    ) -> AppResult<Vec<Notification>> {
        if !actor.is_administrative() {
            return Err(AppError::permission_denied(
                "notification administration is admin only",
            ));
        }
        degrade_reads(
            self.notifications.find_by_audience(audience).await,
            "notifications",
        )
    }

    /// 标记已读（重复调用为空操作，不产生第二次写）
    pub async fn mark_notification_read(
        &self,
        actor: &Principal,
        id: &NotificationId,
    ) -> AppResult<()> {
        let mut notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("notification {id}")))?;

        if !actor.is_administrative() {
            authorize(actor, Action::Read, &notification).into_result()?;
        }

        if notification.mark_read(actor.id.as_str()) {
            self.notifications.save(&notification).await?;
        }
        Ok(())
    }

    // ---- 订单 ----

    pub async fn get_order(&self, actor: &Principal, id: &OrderId) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("order {id}")))?;
        authorize(actor, Action::Read, &order).into_result()?;
        Ok(order)
    }

    pub async fn list_orders(
        &self,
        actor: &Principal,
        requested: RecordFilter<()>,
    ) -> AppResult<Vec<Order>> {
        match scope_listing(actor, requested)? {
            Listing::Store(filter) => {
                degrade_reads(self.orders.find_filtered(&filter).await, "orders")
            }
            Listing::VisibleSubset => Err(AppError::permission_denied(
                "order listing is not available to customers",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_auth_core::PrincipalId;
    use mesa_common::OwnerId;
    use mesa_domain_core::Email;
    use mesa_errors::AppError;
    use mesa_ports::Repository;
    use mockall::mock;

    use crate::feedback::FeedbackId;

    mock! {
        Orders {}

        #[async_trait::async_trait]
        impl OrderRepository for Orders {
            async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>>;
            async fn find_filtered(&self, filter: &RecordFilter<()>) -> AppResult<Vec<Order>>;
        }
    }

    mock! {
        Feedbacks {}

        #[async_trait::async_trait]
        impl Repository<Feedback, FeedbackId> for Feedbacks {
            async fn find_by_id(&self, id: &FeedbackId) -> AppResult<Option<Feedback>>;
            async fn save(&self, entity: &Feedback) -> AppResult<()>;
            async fn delete(&self, id: &FeedbackId) -> AppResult<()>;
            async fn exists(&self, id: &FeedbackId) -> AppResult<bool>;
        }

        #[async_trait::async_trait]
        impl FeedbackRepository for Feedbacks {
            async fn find_customer_feedback_for(
                &self,
                vendor_id: &VendorId,
            ) -> AppResult<Vec<Feedback>>;
            async fn find_by_author(
                &self,
                author: Option<AuthorKind>,
            ) -> AppResult<Vec<Feedback>>;
        }
    }

    mock! {
        Notifications {}

        #[async_trait::async_trait]
        impl Repository<Notification, NotificationId> for Notifications {
            async fn find_by_id(&self, id: &NotificationId) -> AppResult<Option<Notification>>;
            async fn save(&self, entity: &Notification) -> AppResult<()>;
            async fn delete(&self, id: &NotificationId) -> AppResult<()>;
            async fn exists(&self, id: &NotificationId) -> AppResult<bool>;
        }

        #[async_trait::async_trait]
        impl NotificationRepository for Notifications {
            async fn find_by_audience(&self, audience: Audience) -> AppResult<Vec<Notification>>;
        }
    }

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    fn customer() -> Principal {
        Principal::customer(PrincipalId::new("cred-c"), email("diner@example.com"))
    }

    fn vendor(id: &VendorId) -> Principal {
        Principal::vendor(PrincipalId::new("cred-v"), email("shop@example.com"), id.clone())
    }

    fn admin() -> Principal {
        Principal::admin(PrincipalId::new("cred-a"), email("ops@example.com"))
    }

    fn service(
        orders: MockOrders,
        feedback: MockFeedbacks,
        notifications: MockNotifications,
    ) -> EngagementService {
        EngagementService::new(Arc::new(orders), Arc::new(feedback), Arc::new(notifications))
    }

    #[tokio::test]
    async fn test_customer_submits_feedback_about_vendor() {
        let target = VendorId::new();

        let mut feedback = MockFeedbacks::new();
        let expected = target.clone();
        feedback
            .expect_save()
            .withf(move |f: &Feedback| {
                f.author == AuthorKind::Customer && f.vendor_id.as_ref() == Some(&expected)
            })
            .returning(|_| Ok(()));

        let saved = service(MockOrders::new(), feedback, MockNotifications::new())
            .submit_feedback(
                &customer(),
                FeedbackDraft {
                    vendor_id: Some(target),
                    kind: FeedbackKind::Compliment,
                    rating: Some(5),
                    message: "Great dosa".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(saved.rating.map(Rating::value), Some(5));
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected_before_write() {
        let mut feedback = MockFeedbacks::new();
        feedback.expect_save().never();

        let err = service(MockOrders::new(), feedback, MockNotifications::new())
            .submit_feedback(
                &customer(),
                FeedbackDraft {
                    vendor_id: None,
                    kind: FeedbackKind::General,
                    rating: Some(6),
                    message: "overflow".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_vendor_feedback_listing_excludes_vendor_authored() {
        let mine = VendorId::new();

        let customer_note = Feedback::new(
            AuthorKind::Customer,
            "cred-c",
            Some(mine.clone()),
            FeedbackKind::Complaint,
            Some(Rating::new(2).unwrap()),
            "Late delivery",
        );
        // 仓储层回传了越界数据也要被可见性兜底过滤掉
        let vendor_note = Feedback::new(
            AuthorKind::Vendor,
            "cred-other",
            Some(mine.clone()),
            FeedbackKind::Suggestion,
            None,
            "Self promotion",
        );

        let mut feedback = MockFeedbacks::new();
        let records = vec![customer_note.clone(), vendor_note];
        feedback
            .expect_find_customer_feedback_for()
            .returning(move |_| Ok(records.clone()));

        let listed = service(MockOrders::new(), feedback, MockNotifications::new())
            .list_feedback(&vendor(&mine), None)
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].author, AuthorKind::Customer);
    }

    #[tokio::test]
    async fn test_broadcast_requires_admin() {
        let mut notifications = MockNotifications::new();
        notifications.expect_save().never();

        let err = service(MockOrders::new(), MockFeedbacks::new(), notifications)
            .broadcast(
                &vendor(&VendorId::new()),
                NotificationDraft {
                    title: "Hello".to_string(),
                    body: "world".to_string(),
                    audience: Audience::Customers,
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_mark_read_twice_writes_once() {
        let mut notification = Notification::new(
            "Maintenance",
            "Sunday 02:00",
            Audience::Vendors,
            None,
            "cred-admin",
        )
        .unwrap();
        notification.mark_read("cred-v");
        let id = notification.id.clone();

        let mut notifications = MockNotifications::new();
        notifications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(notification.clone())));
        // 已读主体再次标记不应产生写
        notifications.expect_save().never();

        service(MockOrders::new(), MockFeedbacks::new(), notifications)
            .mark_notification_read(&vendor(&VendorId::new()), &id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_order_listing_scoped_to_owner() {
        let mine = VendorId::new();
        let own = OwnerId::Vendor(mine.clone());

        let mut orders = MockOrders::new();
        let expected = own.clone();
        orders
            .expect_find_filtered()
            .withf(move |f: &RecordFilter<()>| f.owner() == Some(&expected))
            .returning(|_| Ok(Vec::new()));

        service(orders, MockFeedbacks::new(), MockNotifications::new())
            .list_orders(&vendor(&mine), RecordFilter::All)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_feedback_listing_passes_author_filter() {
        let mut feedback = MockFeedbacks::new();
        feedback
            .expect_find_by_author()
            .withf(|author: &Option<AuthorKind>| *author == Some(AuthorKind::Customer))
            .returning(|_| Ok(Vec::new()));

        service(MockOrders::new(), feedback, MockNotifications::new())
            .list_feedback(&admin(), Some(AuthorKind::Customer))
            .await
            .unwrap();
    }
}
