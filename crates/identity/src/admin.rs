//! 管理员实体

use mesa_common::{AdminId, AuditInfo, CredentialRef};
use mesa_domain_core::{AggregateRoot, Email, Entity};
use serde::{Deserialize, Serialize};

/// 管理员实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub email: Email,
    pub display_name: String,
    /// 外部凭证引用；过期链接在登录时自愈
    pub credential_ref: Option<CredentialRef>,
    pub audit_info: AuditInfo,
}

impl Admin {
    pub fn new(email: Email, display_name: impl Into<String>) -> Self {
        Self {
            id: AdminId::new(),
            email,
            display_name: display_name.into(),
            credential_ref: None,
            audit_info: AuditInfo::default(),
        }
    }

    /// 补写凭证链接（幂等）
    pub fn link_credential(&mut self, credential_ref: CredentialRef) {
        if self.credential_ref.as_ref() != Some(&credential_ref) {
            self.credential_ref = Some(credential_ref);
            self.audit_info.touch();
        }
    }
}

impl Entity for Admin {
    type Id = AdminId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Admin {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}
