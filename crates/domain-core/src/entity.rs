//! 实体基础 trait

use mesa_common::AuditInfo;

/// 有稳定标识的领域实体
///
/// Id 统一为类型化的 uuid 新类型，归属与审批判断只做精确相等比较
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 聚合根
///
/// 携带审计信息的可持久化实体；商家、分类、商品、优惠券等
/// 状态字段各自独立可解释，写入以整文档覆盖
pub trait AggregateRoot: Entity {
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;

    /// 记录一次变更时间
    fn touch(&mut self) {
        self.audit_info_mut().touch();
    }
}
