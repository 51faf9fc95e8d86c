//! 商品分类
//!
//! 分类最多两级嵌套（子分类、次级子分类）；
//! 商家提交的分类在管理员审批前仅对提交者与管理端可见

use derive_more::{Display, From};
use mesa_access::{ProtectedResource, ResourceKind};
use mesa_common::{AuditInfo, OwnerId, VendorId};
use mesa_domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 分类 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct CategoryId(pub Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

/// 审批状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl ApprovalState {
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// 商品分类
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub owner: OwnerId,
    pub parent_id: Option<CategoryId>,
    pub is_global: bool,
    pub approval: ApprovalState,
    pub audit_info: AuditInfo,
}

impl Category {
    /// 商家提交的分类：归属提交者，待审批，不可全局
    pub fn vendor_submission(
        name: impl Into<String>,
        vendor_id: VendorId,
        parent_id: Option<CategoryId>,
    ) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            owner: OwnerId::Vendor(vendor_id),
            parent_id,
            is_global: false,
            approval: ApprovalState::Pending,
            audit_info: AuditInfo::default(),
        }
    }

    /// 管理端创建的分类：自动通过审批，可选全局
    pub fn admin_created(
        name: impl Into<String>,
        parent_id: Option<CategoryId>,
        is_global: bool,
    ) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            owner: OwnerId::Admin,
            parent_id,
            is_global,
            approval: ApprovalState::Approved,
            audit_info: AuditInfo::default(),
        }
    }

    pub fn approve(&mut self) {
        if self.approval != ApprovalState::Approved {
            self.approval = ApprovalState::Approved;
            self.audit_info.touch();
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.audit_info.touch();
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Category {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

impl ProtectedResource for Category {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Category
    }

    fn owner(&self) -> OwnerId {
        self.owner.clone()
    }

    fn is_global(&self) -> bool {
        self.is_global
    }

    fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }
}
