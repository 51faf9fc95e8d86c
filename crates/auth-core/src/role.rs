//! 角色与能力表
//!
//! 角色是封闭集合，管理判定统一走 is_administrative，
//! 保留给管理员的操作通过显式能力表表达而不是散落的字符串比较

use serde::{Deserialize, Serialize};

/// 角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Vendor,
    Admin,
    MainAdmin,
}

/// 管理能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 审批商家入驻（pending → active）
    VendorApproval,
    /// 商家生命周期的其余流转（暂停/恢复/删除/驳回）
    VendorLifecycle,
    /// 审批商家提交的分类
    CategoryApproval,
    /// 发布平台广播通知
    NotificationBroadcast,
    /// 管理管理员账号
    AdminManagement,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::VendorApproval,
    Capability::VendorLifecycle,
    Capability::CategoryApproval,
    Capability::NotificationBroadcast,
];

const MAIN_ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::VendorApproval,
    Capability::VendorLifecycle,
    Capability::CategoryApproval,
    Capability::NotificationBroadcast,
    Capability::AdminManagement,
];

impl Role {
    /// 是否为管理类角色
    pub fn is_administrative(&self) -> bool {
        matches!(self, Self::Admin | Self::MainAdmin)
    }

    /// 角色持有的能力
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::MainAdmin => MAIN_ADMIN_CAPABILITIES,
            Self::Admin => ADMIN_CAPABILITIES,
            Self::Vendor | Self::Customer => &[],
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
            Self::MainAdmin => "main_admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_administrative() {
        assert!(Role::Admin.is_administrative());
        assert!(Role::MainAdmin.is_administrative());
        assert!(!Role::Vendor.is_administrative());
        assert!(!Role::Customer.is_administrative());
    }

    #[test]
    fn test_admin_management_is_main_admin_only() {
        assert!(Role::MainAdmin.has_capability(Capability::AdminManagement));
        assert!(!Role::Admin.has_capability(Capability::AdminManagement));
    }

    #[test]
    fn test_lifecycle_capabilities_require_at_least_admin() {
        for capability in [
            Capability::VendorApproval,
            Capability::VendorLifecycle,
            Capability::NotificationBroadcast,
        ] {
            assert!(Role::Admin.has_capability(capability));
            assert!(Role::MainAdmin.has_capability(capability));
            assert!(!Role::Vendor.has_capability(capability));
            assert!(!Role::Customer.has_capability(capability));
        }
    }
}
