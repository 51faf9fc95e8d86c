//! 目录仓储接口
//!
//! 列表查询统一接受 RecordFilter，由适配器翻译为存储层条件

use async_trait::async_trait;
use mesa_errors::AppResult;
use mesa_ports::{RecordFilter, Repository};

use crate::category::{ApprovalState, Category, CategoryId};
use crate::coupon::{Coupon, CouponCode, CouponId};
use crate::product::{Product, ProductId, ProductStatus};

/// 分类仓储
#[async_trait]
pub trait CategoryRepository: Repository<Category, CategoryId> {
    /// 单一取数路径
    async fn find_filtered(&self, filter: &RecordFilter<ApprovalState>)
    -> AppResult<Vec<Category>>;

    /// 管理端审批队列
    async fn find_pending(&self) -> AppResult<Vec<Category>>;
}

/// 商品仓储
#[async_trait]
pub trait ProductRepository: Repository<Product, ProductId> {
    async fn find_filtered(&self, filter: &RecordFilter<ProductStatus>) -> AppResult<Vec<Product>>;
}

/// 优惠券仓储
#[async_trait]
pub trait CouponRepository: Repository<Coupon, CouponId> {
    async fn find_filtered(&self, filter: &RecordFilter<()>) -> AppResult<Vec<Coupon>>;

    /// 券码唯一性检查用
    async fn find_by_code(&self, code: &CouponCode) -> AppResult<Option<Coupon>>;
}
