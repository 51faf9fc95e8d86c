//! 归属隔离与可见性测试
//!
//! 目录与互动服务跑在内存适配器上，校验点读、列表与
//! 审批可见性使用同一套规则

use std::sync::Arc;

use chrono::{Duration, Utc};
use mesa_auth_core::{Principal, PrincipalId};
use mesa_catalog::{
    ApprovalState, CatalogService, CategoryDraft, CouponDraft, CouponScope, DiscountType, Offer,
    ProductDraft, ProductId, ProductStatus,
};
use mesa_common::{OwnerId, VendorId};
use mesa_domain_core::{Email, Money};
use mesa_engagement::{
    AuthorKind, EngagementService, FeedbackDraft, FeedbackKind, NotificationDraft, Order,
    OrderLine, Receiver,
};
use mesa_access::Audience;
use mesa_errors::AppError;
use mesa_memstore::{
    DocCategoryRepository, DocCouponRepository, DocFeedbackRepository, DocNotificationRepository,
    DocOrderRepository, DocProductRepository, MemDocumentStore,
};
use mesa_ports::RecordFilter;

struct Harness {
    store: Arc<MemDocumentStore>,
    catalog: CatalogService,
    engagement: EngagementService,
}

fn harness() -> Harness {
    let store = Arc::new(MemDocumentStore::new());
    let catalog = CatalogService::new(
        Arc::new(DocCategoryRepository::new(store.clone())),
        Arc::new(DocProductRepository::new(store.clone())),
        Arc::new(DocCouponRepository::new(store.clone())),
    );
    let engagement = EngagementService::new(
        Arc::new(DocOrderRepository::new(store.clone())),
        Arc::new(DocFeedbackRepository::new(store.clone())),
        Arc::new(DocNotificationRepository::new(store.clone())),
    );
    Harness {
        store,
        catalog,
        engagement,
    }
}

fn admin() -> Principal {
    Principal::admin(
        PrincipalId::new("cred-admin"),
        Email::new("ops@mesa-platform.dev").unwrap(),
    )
}

fn vendor(tag: &str, id: &VendorId) -> Principal {
    Principal::vendor(
        PrincipalId::new(format!("cred-{tag}")),
        Email::new(format!("{tag}@example.com")).unwrap(),
        id.clone(),
    )
}

fn customer() -> Principal {
    Principal::customer(
        PrincipalId::new("cred-diner"),
        Email::new("diner@example.com").unwrap(),
    )
}

fn product_draft(owner: OwnerId, category_id: mesa_catalog::CategoryId) -> ProductDraft {
    ProductDraft {
        name: "Masala Dosa".to_string(),
        owner,
        category_id,
        original_price: Money::inr(12_000),
        selling_price: Money::inr(9_900),
        status: ProductStatus::Available,
        offer: Offer::None,
    }
}

#[tokio::test]
async fn test_cross_vendor_product_isolation() {
    let h = harness();
    let (id_a, id_b) = (VendorId::new(), VendorId::new());
    let (vendor_a, vendor_b) = (vendor("asha", &id_a), vendor("bela", &id_b));

    let category = h
        .catalog
        .create_category(
            &admin(),
            CategoryDraft {
                name: "South Indian".to_string(),
                parent_id: None,
                is_global: true,
            },
        )
        .await
        .unwrap();

    let product = h
        .catalog
        .create_product(&vendor_a, product_draft(OwnerId::Vendor(id_a.clone()), category.id))
        .await
        .unwrap();

    // 他人商品的点读、改、删全部拒绝
    let err = h
        .catalog
        .get_product(&vendor_b, &product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let err = h
        .catalog
        .delete_product(&vendor_b, &product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    // 列表彻底排除他人商品
    let b_list = h
        .catalog
        .list_products(&vendor_b, RecordFilter::All)
        .await
        .unwrap();
    assert!(b_list.is_empty());

    let a_list = h
        .catalog
        .list_products(&vendor_a, RecordFilter::All)
        .await
        .unwrap();
    assert_eq!(a_list.len(), 1);

    // 归属者自己可以删除
    h.catalog.delete_product(&vendor_a, &product.id).await.unwrap();
    assert_eq!(h.store.count("products").await, 0);
}

#[tokio::test]
async fn test_pending_category_hidden_until_approved() {
    let h = harness();
    let id_a = VendorId::new();
    let id_b = VendorId::new();
    let vendor_a = vendor("asha", &id_a);

    let submitted = h
        .catalog
        .create_category(
            &vendor_a,
            CategoryDraft {
                name: "Millet Bowls".to_string(),
                parent_id: None,
                is_global: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(submitted.approval, ApprovalState::Pending);

    let global = h
        .catalog
        .create_category(
            &admin(),
            CategoryDraft {
                name: "Beverages".to_string(),
                parent_id: None,
                is_global: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(global.approval, ApprovalState::Approved);

    // 审批前：顾客与其他商家都看不到，提交者自己能看到
    let diner_view = h
        .catalog
        .list_categories(&customer(), RecordFilter::All)
        .await
        .unwrap();
    assert_eq!(diner_view.len(), 1);
    assert_eq!(diner_view[0].id, global.id);

    let peer_view = h
        .catalog
        .list_categories(&vendor("bela", &id_b), RecordFilter::All)
        .await
        .unwrap();
    assert!(peer_view.iter().all(|c| c.id != submitted.id));

    let own_view = h
        .catalog
        .list_categories(&vendor_a, RecordFilter::All)
        .await
        .unwrap();
    assert!(own_view.iter().any(|c| c.id == submitted.id));

    // 审批队列只有管理端可见
    let queue = h.catalog.pending_categories(&admin()).await.unwrap();
    assert_eq!(queue.len(), 1);
    let err = h.catalog.pending_categories(&vendor_a).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    // 审批后顾客可见
    h.catalog.approve_category(&admin(), &submitted.id).await.unwrap();
    let diner_view = h
        .catalog
        .list_categories(&customer(), RecordFilter::All)
        .await
        .unwrap();
    assert_eq!(diner_view.len(), 2);
}

#[tokio::test]
async fn test_coupon_window_and_code_invariants_block_writes() {
    let h = harness();
    let now = Utc::now();

    let draft = CouponDraft {
        code: "diwali20".to_string(),
        owner: OwnerId::Admin,
        discount: DiscountType::Percentage(20),
        min_order_value: Money::inr(50_000),
        max_uses_per_customer: 1,
        active_from: now,
        expires_at: now - Duration::hours(1),
        scope: CouponScope::AllProducts,
    };

    // 失效窗口在任何写入前拒绝
    let err = h.catalog.create_coupon(&admin(), draft).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.store.count("coupons").await, 0);

    let valid = CouponDraft {
        code: "diwali20".to_string(),
        owner: OwnerId::Admin,
        discount: DiscountType::Percentage(20),
        min_order_value: Money::inr(50_000),
        max_uses_per_customer: 1,
        active_from: now,
        expires_at: now + Duration::days(7),
        scope: CouponScope::AllProducts,
    };
    let coupon = h.catalog.create_coupon(&admin(), valid).await.unwrap();
    assert_eq!(coupon.code.as_str(), "DIWALI20");

    // 改期到非法窗口同样拒绝且不落盘
    let err = h
        .catalog
        .reschedule_coupon(&admin(), &coupon.id, now, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // 券码大小写归一后唯一
    let duplicate = CouponDraft {
        code: "Diwali20".to_string(),
        owner: OwnerId::Admin,
        discount: DiscountType::Percentage(10),
        min_order_value: Money::inr(0),
        max_uses_per_customer: 1,
        active_from: now,
        expires_at: now + Duration::days(1),
        scope: CouponScope::AllProducts,
    };
    let err = h.catalog.create_coupon(&admin(), duplicate).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));
    assert_eq!(h.store.count("coupons").await, 1);
}

#[tokio::test]
async fn test_feedback_visibility_per_role() {
    let h = harness();
    let id_a = VendorId::new();
    let vendor_a = vendor("asha", &id_a);

    // 顾客夸了 A 家
    h.engagement
        .submit_feedback(
            &customer(),
            FeedbackDraft {
                vendor_id: Some(id_a.clone()),
                kind: FeedbackKind::Compliment,
                rating: Some(5),
                message: "Crispiest dosa in town".to_string(),
            },
        )
        .await
        .unwrap();

    // A 自己给平台提了建议
    h.engagement
        .submit_feedback(
            &vendor_a,
            FeedbackDraft {
                vendor_id: None,
                kind: FeedbackKind::Suggestion,
                rating: None,
                message: "Weekly payout reports please".to_string(),
            },
        )
        .await
        .unwrap();

    // 商家只能看到指向自己的顾客反馈
    let vendor_view = h.engagement.list_feedback(&vendor_a, None).await.unwrap();
    assert_eq!(vendor_view.len(), 1);
    assert_eq!(vendor_view[0].author, AuthorKind::Customer);

    // 管理端全量，可按作者类型过滤
    let all = h.engagement.list_feedback(&admin(), None).await.unwrap();
    assert_eq!(all.len(), 2);
    let from_vendors = h
        .engagement
        .list_feedback(&admin(), Some(AuthorKind::Vendor))
        .await
        .unwrap();
    assert_eq!(from_vendors.len(), 1);

    // 评分越界在写入前拒绝
    let err = h
        .engagement
        .submit_feedback(
            &customer(),
            FeedbackDraft {
                vendor_id: Some(id_a),
                kind: FeedbackKind::General,
                rating: Some(6),
                message: "!".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_notification_broadcast_expiry_and_read_marks() {
    let h = harness();
    let id_a = VendorId::new();
    let vendor_a = vendor("asha", &id_a);

    // 广播是管理端能力
    let err = h
        .engagement
        .broadcast(
            &vendor_a,
            NotificationDraft {
                title: "Hi".to_string(),
                body: "I am not an admin".to_string(),
                audience: Audience::Vendors,
                expires_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let current = h
        .engagement
        .broadcast(
            &admin(),
            NotificationDraft {
                title: "Payout schedule".to_string(),
                body: "Weekly payouts move to Mondays".to_string(),
                audience: Audience::Vendors,
                expires_at: None,
            },
        )
        .await
        .unwrap();
    h.engagement
        .broadcast(
            &admin(),
            NotificationDraft {
                title: "Old maintenance window".to_string(),
                body: "Already over".to_string(),
                audience: Audience::Vendors,
                expires_at: Some(Utc::now() - Duration::hours(1)),
            },
        )
        .await
        .unwrap();

    // 商家侧只看到未过期的
    let feed = h.engagement.active_notifications(&vendor_a).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, current.id);

    // 标记已读幂等
    h.engagement
        .mark_notification_read(&vendor_a, &current.id)
        .await
        .unwrap();
    h.engagement
        .mark_notification_read(&vendor_a, &current.id)
        .await
        .unwrap();

    let feed = h.engagement.active_notifications(&vendor_a).await.unwrap();
    assert!(feed[0].read_by.contains("cred-asha"));
    assert_eq!(feed[0].read_by.len(), 1);
}

#[tokio::test]
async fn test_orders_are_owner_scoped_and_read_only() {
    let h = harness();
    let (id_a, id_b) = (VendorId::new(), VendorId::new());
    let (vendor_a, vendor_b) = (vendor("asha", &id_a), vendor("bela", &id_b));

    // 订单由下单端产生，这里直接播种进存储
    let order = Order {
        id: mesa_engagement::OrderId::new(),
        owner: OwnerId::Vendor(id_a.clone()),
        receiver: Receiver {
            name: "Diner".to_string(),
            phone: "+91-9900000009".to_string(),
            address: "5 Brigade Road".to_string(),
            city: "Bengaluru".to_string(),
            pincode: "560001".to_string(),
        },
        lines: vec![OrderLine {
            product_id: ProductId::new(),
            product_name: "Masala Dosa".to_string(),
            unit_price: Money::inr(9_900),
            quantity: 2,
            line_discount: Money::inr(1_000),
        }],
        placed_at: Utc::now(),
    };
    h.store
        .seed("orders", &order.id.to_string(), serde_json::to_value(&order).unwrap())
        .await;

    let a_orders = h
        .engagement
        .list_orders(&vendor_a, RecordFilter::All)
        .await
        .unwrap();
    assert_eq!(a_orders.len(), 1);
    assert_eq!(a_orders[0].total(), Some(Money::inr(9_900 * 2 - 1_000)));

    let b_orders = h
        .engagement
        .list_orders(&vendor_b, RecordFilter::All)
        .await
        .unwrap();
    assert!(b_orders.is_empty());

    let err = h
        .engagement
        .get_order(&vendor_b, &order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));
}
