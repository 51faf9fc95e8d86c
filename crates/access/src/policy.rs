//! 授权策略
//!
//! 规则按序评估，首个命中生效，默认拒绝

use mesa_auth_core::{Principal, Role};
use mesa_errors::{AppError, AppResult};

use crate::action::{Action, ResourceKind};
use crate::resource::{Audience, ProtectedResource};

/// 授权决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn allow() -> Self {
        Self::Allow
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny(reason.into())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// 转换为操作结果，拒绝映射为 PermissionDenied
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(AppError::permission_denied(reason)),
        }
    }
}

/// 授权检查
///
/// 每次决策上报一次指标；列表过滤走 evaluate 以免按记录数膨胀计数
pub fn authorize<R: ProtectedResource + ?Sized>(
    principal: &Principal,
    action: Action,
    resource: &R,
) -> Decision {
    let decision = evaluate(principal, action, resource);
    mesa_telemetry::record_authz_decision(
        principal.role.as_str(),
        action.as_str(),
        decision.is_allowed(),
    );
    decision
}

pub(crate) fn evaluate<R: ProtectedResource + ?Sized>(
    principal: &Principal,
    action: Action,
    resource: &R,
) -> Decision {
    // 管理角色放行一切；保留给管理端的操作由能力表在应用服务层把关
    if principal.is_administrative() {
        return Decision::allow();
    }

    match principal.role {
        Role::Vendor => evaluate_vendor(principal, action, resource),
        Role::Customer => evaluate_customer(principal, action, resource),
        // is_administrative 已覆盖，此处不可达但保持封闭匹配
        Role::Admin | Role::MainAdmin => Decision::allow(),
    }
}

fn evaluate_vendor<R: ProtectedResource + ?Sized>(
    principal: &Principal,
    action: Action,
    resource: &R,
) -> Decision {
    let kind = resource.kind();
    let owner = resource.owner();
    let owns = principal.owns(&owner);

    match (action, kind) {
        // 创建仅限归属自身的目录类资源
        (Action::Create, ResourceKind::Product | ResourceKind::Category | ResourceKind::Coupon) => {
            if owns {
                Decision::allow()
            } else {
                Decision::deny("vendors may only create resources scoped to themselves")
            }
        }
        (Action::Create, ResourceKind::Feedback) => {
            if resource.author_role() == Some(Role::Vendor) {
                Decision::allow()
            } else {
                Decision::deny("vendor feedback must be vendor-authored")
            }
        }
        (Action::Read, ResourceKind::Category) => {
            if owns || resource.is_global() {
                Decision::allow()
            } else {
                Decision::deny("category belongs to another vendor")
            }
        }
        (Action::Read, ResourceKind::Feedback) => {
            if owns && resource.author_role() == Some(Role::Customer) {
                Decision::allow()
            } else {
                Decision::deny("vendors see only customer feedback addressed to them")
            }
        }
        (Action::Read, ResourceKind::Notification) => {
            if resource.audience() == Some(Audience::Vendors) {
                Decision::allow()
            } else {
                Decision::deny("notification is not addressed to vendors")
            }
        }
        (Action::Read, ResourceKind::Product | ResourceKind::Coupon | ResourceKind::Order) => {
            if owns {
                Decision::allow()
            } else {
                Decision::deny("resource belongs to another vendor")
            }
        }
        (
            Action::Update | Action::Delete,
            ResourceKind::Product | ResourceKind::Category | ResourceKind::Coupon,
        ) => {
            if owns {
                Decision::allow()
            } else {
                Decision::deny("only the owning vendor may modify this resource")
            }
        }
        _ => Decision::deny("operation not permitted for vendors"),
    }
}

fn evaluate_customer<R: ProtectedResource + ?Sized>(
    _principal: &Principal,
    action: Action,
    resource: &R,
) -> Decision {
    match (action, resource.kind()) {
        (Action::Read, ResourceKind::Product | ResourceKind::Category) => {
            if resource.is_approved() || resource.is_global() {
                Decision::allow()
            } else {
                Decision::deny("resource is awaiting approval")
            }
        }
        (Action::Create, ResourceKind::Feedback) => {
            if resource.author_role() == Some(Role::Customer) {
                Decision::allow()
            } else {
                Decision::deny("customer feedback must be customer-authored")
            }
        }
        (Action::Read, ResourceKind::Notification) => {
            if resource.audience() == Some(Audience::Customers) {
                Decision::allow()
            } else {
                Decision::deny("notification is not addressed to customers")
            }
        }
        _ => Decision::deny("operation not permitted for customers"),
    }
}
