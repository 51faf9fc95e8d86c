//! 列表端点的统一收窄
//!
//! 与 authorize 同源的归属规则应用在取数过滤器上：
//! 管理端原样下推，商家强制收窄到自身归属，顾客走可见子集过滤

use mesa_auth_core::{Principal, Role};
use mesa_common::OwnerId;
use mesa_errors::{AppError, AppResult};
use mesa_ports::RecordFilter;
use tracing::warn;

/// 列表的取数方式
#[derive(Debug)]
pub enum Listing<F> {
    /// 直接下推到存储层过滤
    Store(RecordFilter<F>),
    /// 全量取回后做可见子集过滤（顾客端）
    VisibleSubset,
}

/// 按角色收窄列表过滤器
///
/// 商家请求他人的归属直接拒绝而不是悄悄收窄
pub fn scope_listing<F>(actor: &Principal, requested: RecordFilter<F>) -> AppResult<Listing<F>> {
    if actor.is_administrative() {
        return Ok(Listing::Store(requested));
    }

    match actor.role {
        Role::Vendor => {
            let own = OwnerId::Vendor(
                actor
                    .vendor_id
                    .clone()
                    .ok_or_else(|| AppError::internal("vendor principal without vendor id"))?,
            );
            match requested {
                RecordFilter::All => Ok(Listing::Store(RecordFilter::ByOwner(own))),
                RecordFilter::ByOwner(owner) if owner == own => {
                    Ok(Listing::Store(RecordFilter::ByOwner(own)))
                }
                RecordFilter::ByOwnerAndFlag(owner, flag) if owner == own => {
                    Ok(Listing::Store(RecordFilter::ByOwnerAndFlag(own, flag)))
                }
                _ => Err(AppError::permission_denied(
                    "vendors may only list their own records",
                )),
            }
        }
        Role::Customer => Ok(Listing::VisibleSubset),
        Role::Admin | Role::MainAdmin => Ok(Listing::Store(requested)),
    }
}

/// 读路径瞬态存储错误降级为空结果并告警
pub fn degrade_reads<T>(result: AppResult<Vec<T>>, what: &str) -> AppResult<Vec<T>> {
    match result {
        Ok(items) => Ok(items),
        Err(err) if err.is_transient_store_error() => {
            warn!(error = %err, what, "Listing degraded to empty result");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}
