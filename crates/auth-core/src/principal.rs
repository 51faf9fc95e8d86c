//! Principal - 请求主体
//!
//! 每个请求显式携带 Principal，不使用任何全局会话状态

use mesa_common::{OwnerId, VendorId};
use mesa_domain_core::Email;
use serde::{Deserialize, Serialize};

use crate::role::{Capability, Role};

/// Principal ID（跨会话稳定的不透明标识）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 超级管理员的合成标识，不对应凭证服务中的任何记录
    pub fn super_admin() -> Self {
        Self("main-admin".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已认证的请求主体
///
/// 不变式：vendor_id 当且仅当 role 为 Vendor 时存在，
/// 且仅在关联商家处于 Active 状态时由解析器产出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    pub vendor_id: Option<VendorId>,
    pub email: Email,
}

impl Principal {
    /// 合成的超级管理员主体（静态配置匹配时产生）
    pub fn main_admin(email: Email) -> Self {
        Self {
            id: PrincipalId::super_admin(),
            role: Role::MainAdmin,
            vendor_id: None,
            email,
        }
    }

    pub fn admin(id: PrincipalId, email: Email) -> Self {
        Self {
            id,
            role: Role::Admin,
            vendor_id: None,
            email,
        }
    }

    pub fn vendor(id: PrincipalId, email: Email, vendor_id: VendorId) -> Self {
        Self {
            id,
            role: Role::Vendor,
            vendor_id: Some(vendor_id),
            email,
        }
    }

    pub fn customer(id: PrincipalId, email: Email) -> Self {
        Self {
            id,
            role: Role::Customer,
            vendor_id: None,
            email,
        }
    }

    pub fn is_administrative(&self) -> bool {
        self.role.is_administrative()
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.role.has_capability(capability)
    }

    /// 是否拥有该资源归属（精确 ID 相等，无模糊匹配）
    pub fn owns(&self, owner: &OwnerId) -> bool {
        match (&self.vendor_id, owner) {
            (Some(own), OwnerId::Vendor(other)) => own == other,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    #[test]
    fn test_vendor_principal_carries_vendor_id() {
        let vendor_id = VendorId::new();
        let p = Principal::vendor(
            PrincipalId::new("cred-1"),
            email("shop@example.com"),
            vendor_id.clone(),
        );
        assert_eq!(p.role, Role::Vendor);
        assert_eq!(p.vendor_id.as_ref(), Some(&vendor_id));
    }

    #[test]
    fn test_ownership_is_exact() {
        let mine = VendorId::new();
        let theirs = VendorId::new();
        let p = Principal::vendor(
            PrincipalId::new("cred-1"),
            email("shop@example.com"),
            mine.clone(),
        );

        assert!(p.owns(&OwnerId::Vendor(mine)));
        assert!(!p.owns(&OwnerId::Vendor(theirs)));
        assert!(!p.owns(&OwnerId::Admin));
    }

    #[test]
    fn test_admin_does_not_own_vendor_resources() {
        // 管理员走角色规则而不是归属规则
        let p = Principal::admin(PrincipalId::new("cred-2"), email("ops@example.com"));
        assert!(!p.owns(&OwnerId::Vendor(VendorId::new())));
        assert!(p.is_administrative());
    }
}
