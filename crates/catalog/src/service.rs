//! 目录应用服务
//!
//! 所有入口先过 authorize 再动存储；写路径在任何写入前重新校验不变式，
//! 读路径的瞬态存储错误降级为空结果并告警

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mesa_access::{
    Action, Listing, ProtectedResource, authorize, degrade_reads, filter_visible, scope_listing,
};
use mesa_auth_core::{Capability, Principal, Role};
use mesa_common::OwnerId;
use mesa_domain_core::Money;
use mesa_errors::{AppError, AppResult};
use mesa_ports::RecordFilter;
use tracing::info;

use crate::category::{ApprovalState, Category, CategoryId};
use crate::coupon::{Coupon, CouponCode, CouponId, CouponScope, DiscountType};
use crate::error::CatalogError;
use crate::product::{Offer, Pricing, Product, ProductId, ProductStatus};
use crate::repository::{CategoryRepository, CouponRepository, ProductRepository};

/// 新商品
#[derive(Debug)]
pub struct ProductDraft {
    pub name: String,
    pub owner: OwnerId,
    pub category_id: CategoryId,
    pub original_price: Money,
    pub selling_price: Money,
    pub status: ProductStatus,
    pub offer: Offer,
}

/// 商品变更（未给出的字段保持不变）
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub pricing: Option<(Money, Money)>,
    pub status: Option<ProductStatus>,
    pub offer: Option<Offer>,
    pub image_url: Option<String>,
}

/// 新分类
#[derive(Debug)]
pub struct CategoryDraft {
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub is_global: bool,
}

/// 新优惠券
#[derive(Debug)]
pub struct CouponDraft {
    pub code: String,
    pub owner: OwnerId,
    pub discount: DiscountType,
    pub min_order_value: Money,
    pub max_uses_per_customer: u32,
    pub active_from: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub scope: CouponScope,
}

/// 目录服务
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    coupons: Arc<dyn CouponRepository>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        coupons: Arc<dyn CouponRepository>,
    ) -> Self {
        Self {
            categories,
            products,
            coupons,
        }
    }

    // ---- 商品 ----

    pub async fn create_product(
        &self,
        actor: &Principal,
        draft: ProductDraft,
    ) -> AppResult<Product> {
        let pricing = Pricing::new(draft.original_price, draft.selling_price)
            .map_err(AppError::from)?;

        let product = Product::new(
            draft.name,
            draft.owner,
            draft.category_id.clone(),
            pricing,
            draft.status,
            draft.offer,
        );

        authorize(actor, Action::Create, &product).into_result()?;

        // 分类必须存在且对操作者可读
        let category = self
            .categories
            .find_by_id(&draft.category_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category {}", draft.category_id)))?;
        authorize(actor, Action::Read, &category).into_result()?;

        self.products.save(&product).await?;
        info!(product_id = %product.id, owner = %product.owner, "Product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        actor: &Principal,
        id: &ProductId,
        update: ProductUpdate,
    ) -> AppResult<Product> {
        let mut product = self.load_product(id).await?;
        authorize(actor, Action::Update, &product).into_result()?;

        if let Some((original, selling)) = update.pricing {
            let pricing = Pricing::new(original, selling).map_err(AppError::from)?;
            product.update_pricing(pricing);
        }
        if let Some(status) = update.status {
            product.set_status(status);
        }
        if let Some(offer) = update.offer {
            product.set_offer(offer);
        }
        if let Some(url) = update.image_url {
            product.set_image_url(url);
        }

        self.products.save(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, actor: &Principal, id: &ProductId) -> AppResult<()> {
        let product = self.load_product(id).await?;
        authorize(actor, Action::Delete, &product).into_result()?;
        self.products.delete(id).await?;
        info!(product_id = %id, actor = %actor.id, "Product deleted");
        Ok(())
    }

    pub async fn get_product(&self, actor: &Principal, id: &ProductId) -> AppResult<Product> {
        let product = self.load_product(id).await?;
        authorize(actor, Action::Read, &product).into_result()?;
        Ok(product)
    }

    pub async fn list_products(
        &self,
        actor: &Principal,
        requested: RecordFilter<ProductStatus>,
    ) -> AppResult<Vec<Product>> {
        match scope_listing(actor, requested)? {
            Listing::Store(filter) => {
                degrade_reads(self.products.find_filtered(&filter).await, "products")
            }
            Listing::VisibleSubset => {
                let all =
                    degrade_reads(self.products.find_filtered(&RecordFilter::All).await, "products")?;
                Ok(filter_visible(actor, all))
            }
        }
    }

    // ---- 分类 ----

    pub async fn create_category(
        &self,
        actor: &Principal,
        draft: CategoryDraft,
    ) -> AppResult<Category> {
        self.ensure_nesting_depth(draft.parent_id.as_ref()).await?;

        let category = match actor.role {
            Role::Admin | Role::MainAdmin => {
                Category::admin_created(draft.name, draft.parent_id, draft.is_global)
            }
            Role::Vendor => {
                if draft.is_global {
                    return Err(CatalogError::VendorGlobalCategory.into());
                }
                let vendor_id = actor
                    .vendor_id
                    .clone()
                    .ok_or_else(|| AppError::internal("vendor principal without vendor id"))?;
                Category::vendor_submission(draft.name, vendor_id, draft.parent_id)
            }
            Role::Customer => {
                return Err(AppError::permission_denied(
                    "customers cannot create categories",
                ));
            }
        };

        authorize(actor, Action::Create, &category).into_result()?;
        self.categories.save(&category).await?;
        info!(category_id = %category.id, approval = ?category.approval, "Category created");
        Ok(category)
    }

    /// 审批商家提交的分类（幂等）
    pub async fn approve_category(
        &self,
        actor: &Principal,
        id: &CategoryId,
    ) -> AppResult<Category> {
        if !actor.has_capability(Capability::CategoryApproval) {
            return Err(AppError::permission_denied(
                "category approval requires an administrative actor",
            ));
        }

        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category {id}")))?;

        if category.approval == ApprovalState::Approved {
            return Ok(category);
        }

        category.approve();
        self.categories.save(&category).await?;
        info!(category_id = %category.id, actor = %actor.id, "Category approved");
        Ok(category)
    }

    /// 管理端审批队列
    pub async fn pending_categories(&self, actor: &Principal) -> AppResult<Vec<Category>> {
        if !actor.is_administrative() {
            return Err(AppError::permission_denied(
                "approval queue is admin only",
            ));
        }
        degrade_reads(self.categories.find_pending().await, "pending categories")
    }

    pub async fn list_categories(
        &self,
        actor: &Principal,
        requested: RecordFilter<ApprovalState>,
    ) -> AppResult<Vec<Category>> {
        match scope_listing(actor, requested)? {
            Listing::Store(filter) => {
                let own =
                    degrade_reads(self.categories.find_filtered(&filter).await, "categories")?;
                if actor.role == Role::Vendor {
                    // 商家除自有分类外还能看到全局分类
                    let global = degrade_reads(
                        self.categories
                            .find_filtered(&RecordFilter::ByOwner(OwnerId::Admin))
                            .await,
                        "global categories",
                    )?;
                    let mut merged = own;
                    merged.extend(global.into_iter().filter(|c| c.is_global));
                    Ok(merged)
                } else {
                    Ok(own)
                }
            }
            Listing::VisibleSubset => {
                let all = degrade_reads(
                    self.categories.find_filtered(&RecordFilter::All).await,
                    "categories",
                )?;
                Ok(filter_visible(actor, all))
            }
        }
    }

    // ---- 优惠券 ----

    pub async fn create_coupon(&self, actor: &Principal, draft: CouponDraft) -> AppResult<Coupon> {
        let code = CouponCode::new(draft.code).map_err(AppError::from)?;

        if self.coupons.find_by_code(&code).await?.is_some() {
            return Err(AppError::already_exists(format!("coupon code {code}")));
        }

        let coupon = Coupon::new(
            code,
            draft.discount,
            draft.min_order_value,
            draft.max_uses_per_customer,
            draft.active_from,
            draft.expires_at,
            draft.scope,
            draft.owner,
        )
        .map_err(AppError::from)?;

        authorize(actor, Action::Create, &coupon).into_result()?;
        self.coupons.save(&coupon).await?;
        info!(coupon_id = %coupon.id, code = %coupon.code, "Coupon created");
        Ok(coupon)
    }

    pub async fn reschedule_coupon(
        &self,
        actor: &Principal,
        id: &CouponId,
        active_from: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Coupon> {
        let mut coupon = self.load_coupon(id).await?;
        authorize(actor, Action::Update, &coupon).into_result()?;

        coupon
            .reschedule(active_from, expires_at)
            .map_err(AppError::from)?;
        self.coupons.save(&coupon).await?;
        Ok(coupon)
    }

    pub async fn delete_coupon(&self, actor: &Principal, id: &CouponId) -> AppResult<()> {
        let coupon = self.load_coupon(id).await?;
        authorize(actor, Action::Delete, &coupon).into_result()?;
        self.coupons.delete(id).await
    }

    pub async fn list_coupons(
        &self,
        actor: &Principal,
        requested: RecordFilter<()>,
    ) -> AppResult<Vec<Coupon>> {
        match scope_listing(actor, requested)? {
            Listing::Store(filter) => {
                degrade_reads(self.coupons.find_filtered(&filter).await, "coupons")
            }
            Listing::VisibleSubset => Err(AppError::permission_denied(
                "coupon listing is not available to customers",
            )),
        }
    }

    // ---- 内部 ----

    async fn load_product(&self, id: &ProductId) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("product {id}")))
    }

    async fn load_coupon(&self, id: &CouponId) -> AppResult<Coupon> {
        self.coupons
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("coupon {id}")))
    }

    /// 分类最多两级嵌套：父分类的深度不得超过 1
    async fn ensure_nesting_depth(&self, parent_id: Option<&CategoryId>) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        let parent = self
            .categories
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("parent category {parent_id}")))?;

        if let Some(grandparent_id) = parent.parent_id {
            let grandparent = self
                .categories
                .find_by_id(&grandparent_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("category {grandparent_id}")))?;
            if grandparent.parent_id.is_some() {
                return Err(CatalogError::CategoryTooDeep.into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_auth_core::PrincipalId;
    use mesa_common::VendorId;
    use mesa_domain_core::Email;
    use mesa_ports::Repository;
    use mockall::mock;

    mock! {
        Categories {}

        #[async_trait::async_trait]
        impl Repository<Category, CategoryId> for Categories {
            async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>>;
            async fn save(&self, entity: &Category) -> AppResult<()>;
            async fn delete(&self, id: &CategoryId) -> AppResult<()>;
            async fn exists(&self, id: &CategoryId) -> AppResult<bool>;
        }

        #[async_trait::async_trait]
        impl CategoryRepository for Categories {
            async fn find_filtered(
                &self,
                filter: &RecordFilter<ApprovalState>,
            ) -> AppResult<Vec<Category>>;
            async fn find_pending(&self) -> AppResult<Vec<Category>>;
        }
    }

    mock! {
        Products {}

        #[async_trait::async_trait]
        impl Repository<Product, ProductId> for Products {
            async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>>;
            async fn save(&self, entity: &Product) -> AppResult<()>;
            async fn delete(&self, id: &ProductId) -> AppResult<()>;
            async fn exists(&self, id: &ProductId) -> AppResult<bool>;
        }

        #[async_trait::async_trait]
        impl ProductRepository for Products {
            async fn find_filtered(
                &self,
                filter: &RecordFilter<ProductStatus>,
            ) -> AppResult<Vec<Product>>;
        }
    }

    mock! {
        Coupons {}

        #[async_trait::async_trait]
        impl Repository<Coupon, CouponId> for Coupons {
            async fn find_by_id(&self, id: &CouponId) -> AppResult<Option<Coupon>>;
            async fn save(&self, entity: &Coupon) -> AppResult<()>;
            async fn delete(&self, id: &CouponId) -> AppResult<()>;
            async fn exists(&self, id: &CouponId) -> AppResult<bool>;
        }

        #[async_trait::async_trait]
        impl CouponRepository for Coupons {
            async fn find_filtered(&self, filter: &RecordFilter<()>) -> AppResult<Vec<Coupon>>;
            async fn find_by_code(&self, code: &CouponCode) -> AppResult<Option<Coupon>>;
        }
    }

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    fn vendor(id: &VendorId) -> Principal {
        Principal::vendor(PrincipalId::new("cred-v"), email("shop@example.com"), id.clone())
    }

    fn admin() -> Principal {
        Principal::admin(PrincipalId::new("cred-a"), email("ops@example.com"))
    }

    fn service(
        categories: MockCategories,
        products: MockProducts,
        coupons: MockCoupons,
    ) -> CatalogService {
        CatalogService::new(Arc::new(categories), Arc::new(products), Arc::new(coupons))
    }

    fn own_product(owner: &VendorId) -> Product {
        Product::new(
            "Masala Dosa",
            OwnerId::Vendor(owner.clone()),
            CategoryId::new(),
            Pricing::new(Money::inr(12_000), Money::inr(9_900)).unwrap(),
            ProductStatus::Available,
            Offer::None,
        )
    }

    #[tokio::test]
    async fn test_vendor_cannot_delete_foreign_product() {
        let owner = VendorId::new();
        let intruder = VendorId::new();
        let product = own_product(&owner);
        let id = product.id.clone();

        let mut products = MockProducts::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        products.expect_delete().never();

        let err = service(MockCategories::new(), products, MockCoupons::new())
            .delete_product(&vendor(&intruder), &id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_discount_before_any_write() {
        let owner = VendorId::new();

        let mut products = MockProducts::new();
        products.expect_save().never();

        let err = service(MockCategories::new(), products, MockCoupons::new())
            .create_product(
                &vendor(&owner),
                ProductDraft {
                    name: "Thali".to_string(),
                    owner: OwnerId::Vendor(owner.clone()),
                    category_id: CategoryId::new(),
                    original_price: Money::inr(10_000),
                    selling_price: Money::inr(11_000),
                    status: ProductStatus::Available,
                    offer: Offer::None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_vendor_listing_is_scoped_to_own_records() {
        let owner = VendorId::new();
        let own = OwnerId::Vendor(owner.clone());

        let mut products = MockProducts::new();
        let expected = own.clone();
        products
            .expect_find_filtered()
            .withf(move |f: &RecordFilter<ProductStatus>| f.owner() == Some(&expected))
            .returning(|_| Ok(Vec::new()));

        service(MockCategories::new(), products, MockCoupons::new())
            .list_products(&vendor(&owner), RecordFilter::All)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_vendor_listing_of_foreign_owner_is_denied() {
        let owner = VendorId::new();
        let foreign = OwnerId::Vendor(VendorId::new());

        let mut products = MockProducts::new();
        products.expect_find_filtered().never();

        let err = service(MockCategories::new(), products, MockCoupons::new())
            .list_products(&vendor(&owner), RecordFilter::ByOwner(foreign))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_vendor_cannot_create_global_category() {
        let owner = VendorId::new();

        let mut categories = MockCategories::new();
        categories.expect_save().never();

        let err = service(categories, MockProducts::new(), MockCoupons::new())
            .create_category(
                &vendor(&owner),
                CategoryDraft {
                    name: "Desserts".to_string(),
                    parent_id: None,
                    is_global: true,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_category_nesting_capped_at_two_levels() {
        let root = Category::admin_created("Food", None, true);
        let sub = Category::admin_created("Snacks", Some(root.id.clone()), true);
        let nested = Category::admin_created("Fried", Some(sub.id.clone()), true);

        let mut categories = MockCategories::new();
        let by_id = vec![root.clone(), sub.clone(), nested.clone()];
        categories.expect_find_by_id().returning(move |id| {
            Ok(by_id.iter().find(|c| &c.id == id).cloned())
        });
        categories.expect_save().never();

        let err = service(categories, MockProducts::new(), MockCoupons::new())
            .create_category(
                &admin(),
                CategoryDraft {
                    name: "Too Deep".to_string(),
                    parent_id: Some(nested.id.clone()),
                    is_global: false,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_approve_category_requires_capability_and_is_idempotent() {
        let category = Category::vendor_submission("Street Food", VendorId::new(), None);
        let id = category.id.clone();

        // 商家自己不能审批
        let mut categories = MockCategories::new();
        categories.expect_find_by_id().never();
        let err = service(categories, MockProducts::new(), MockCoupons::new())
            .approve_category(&vendor(&VendorId::new()), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));

        // 已通过的分类再次审批是空操作
        let mut approved = category.clone();
        approved.approve();
        let mut categories = MockCategories::new();
        categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(approved.clone())));
        categories.expect_save().never();

        let result = service(categories, MockProducts::new(), MockCoupons::new())
            .approve_category(&admin(), &id)
            .await
            .unwrap();
        assert!(result.approval.is_approved());
    }

    #[tokio::test]
    async fn test_duplicate_coupon_code_is_rejected_before_write() {
        let owner = VendorId::new();
        let now = Utc::now();

        let existing = Coupon::new(
            CouponCode::new("WELCOME10").unwrap(),
            DiscountType::Percentage(10),
            Money::inr(20_000),
            1,
            now,
            now + chrono::Duration::days(7),
            CouponScope::AllProducts,
            OwnerId::Vendor(owner.clone()),
        )
        .unwrap();

        let mut coupons = MockCoupons::new();
        coupons
            .expect_find_by_code()
            .returning(move |_| Ok(Some(existing.clone())));
        coupons.expect_save().never();

        let err = service(MockCategories::new(), MockProducts::new(), coupons)
            .create_coupon(
                &vendor(&owner),
                CouponDraft {
                    code: "welcome10".to_string(),
                    owner: OwnerId::Vendor(owner.clone()),
                    discount: DiscountType::Percentage(15),
                    min_order_value: Money::inr(10_000),
                    max_uses_per_customer: 1,
                    active_from: now,
                    expires_at: now + chrono::Duration::days(3),
                    scope: CouponScope::AllProducts,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_listing_degrades_on_transient_store_error() {
        let owner = VendorId::new();

        let mut products = MockProducts::new();
        products
            .expect_find_filtered()
            .returning(|_| Err(AppError::store("connection reset")));

        let listed = service(MockCategories::new(), products, MockCoupons::new())
            .list_products(&vendor(&owner), RecordFilter::All)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
