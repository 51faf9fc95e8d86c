//! 目录仓储的文档存储实现
//!
//! 三个仓储共用同一条取数路径：RecordFilter 翻译为存储层等值条件

use std::sync::Arc;

use async_trait::async_trait;
use mesa_catalog::{
    ApprovalState, Category, CategoryId, CategoryRepository, Coupon, CouponCode, CouponId,
    CouponRepository, Product, ProductId, ProductRepository, ProductStatus,
};
use mesa_errors::AppResult;
use mesa_ports::{DocumentStore, Filter, RecordFilter, Repository};

use crate::codec::{from_document, from_documents, id_filter, owner_only, push_down, to_document, upsert};

const CATEGORIES: &str = "categories";
const PRODUCTS: &str = "products";
const COUPONS: &str = "coupons";

/// 分类仓储
pub struct DocCategoryRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocCategoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Category, CategoryId> for DocCategoryRepository {
    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        match self.store.find_one(CATEGORIES, &id_filter(&id.to_string())).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: &Category) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), CATEGORIES, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &CategoryId) -> AppResult<()> {
        self.store.delete(CATEGORIES, &id.to_string()).await
    }
}

#[async_trait]
impl CategoryRepository for DocCategoryRepository {
    async fn find_filtered(
        &self,
        filter: &RecordFilter<ApprovalState>,
    ) -> AppResult<Vec<Category>> {
        let conditions = push_down(filter, "approval")?;
        from_documents(self.store.find_many(CATEGORIES, &conditions).await?)
    }

    async fn find_pending(&self) -> AppResult<Vec<Category>> {
        let conditions = Filter::new().eq("approval", to_document(&ApprovalState::Pending)?);
        from_documents(self.store.find_many(CATEGORIES, &conditions).await?)
    }
}

/// 商品仓储
pub struct DocProductRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocProductRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Product, ProductId> for DocProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        match self.store.find_one(PRODUCTS, &id_filter(&id.to_string())).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: &Product) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), PRODUCTS, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &ProductId) -> AppResult<()> {
        self.store.delete(PRODUCTS, &id.to_string()).await
    }
}

#[async_trait]
impl ProductRepository for DocProductRepository {
    async fn find_filtered(&self, filter: &RecordFilter<ProductStatus>) -> AppResult<Vec<Product>> {
        let conditions = push_down(filter, "status")?;
        from_documents(self.store.find_many(PRODUCTS, &conditions).await?)
    }
}

/// 优惠券仓储
pub struct DocCouponRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocCouponRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Coupon, CouponId> for DocCouponRepository {
    async fn find_by_id(&self, id: &CouponId) -> AppResult<Option<Coupon>> {
        match self.store.find_one(COUPONS, &id_filter(&id.to_string())).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: &Coupon) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), COUPONS, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &CouponId) -> AppResult<()> {
        self.store.delete(COUPONS, &id.to_string()).await
    }
}

#[async_trait]
impl CouponRepository for DocCouponRepository {
    async fn find_filtered(&self, filter: &RecordFilter<()>) -> AppResult<Vec<Coupon>> {
        let conditions = owner_only(filter)?;
        from_documents(self.store.find_many(COUPONS, &conditions).await?)
    }

    async fn find_by_code(&self, code: &CouponCode) -> AppResult<Option<Coupon>> {
        match self
            .store
            .find_one(COUPONS, &Filter::new().eq("code", code.as_str()))
            .await?
        {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }
}
