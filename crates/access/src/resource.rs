//! 受保护资源的元数据视图
//!
//! 策略只看资源的种类、归属与可见性标志，不关心具体字段

use mesa_auth_core::Role;
use mesa_common::OwnerId;
use serde::{Deserialize, Serialize};

use crate::action::ResourceKind;

/// 通知的目标受众
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Customers,
    Vendors,
}

/// 受保护资源
pub trait ProtectedResource {
    fn kind(&self) -> ResourceKind;

    /// 归属（精确 ID 比较，无模糊匹配）
    fn owner(&self) -> OwnerId;

    /// 全局资源对所有商家与顾客可见（目前仅分类使用）
    fn is_global(&self) -> bool {
        false
    }

    /// 审批通过才对归属外角色可见（默认视为已通过）
    fn is_approved(&self) -> bool {
        true
    }

    /// 作者角色（仅反馈类资源提供）
    fn author_role(&self) -> Option<Role> {
        None
    }

    /// 目标受众（仅通知类资源提供）
    fn audience(&self) -> Option<Audience> {
        None
    }
}
