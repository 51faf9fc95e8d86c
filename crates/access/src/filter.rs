//! 资源归属过滤器
//!
//! 纯函数，O(n)，与点读共用同一条 Read 规则

use mesa_auth_core::Principal;

use crate::action::Action;
use crate::policy::evaluate;
use crate::resource::ProtectedResource;

/// 单条记录对该主体是否可见
pub fn is_visible<R: ProtectedResource>(principal: &Principal, record: &R) -> bool {
    evaluate(principal, Action::Read, record).is_allowed()
}

/// 计算主体可见的记录子集
pub fn filter_visible<R: ProtectedResource>(principal: &Principal, records: Vec<R>) -> Vec<R> {
    if principal.is_administrative() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| is_visible(principal, record))
        .collect()
}
