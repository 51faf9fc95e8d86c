//! 顾客/商家反馈

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use mesa_access::{ProtectedResource, ResourceKind};
use mesa_auth_core::Role;
use mesa_common::{OwnerId, VendorId};
use mesa_domain_core::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngagementError;

/// 反馈 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct FeedbackId(pub Uuid);

impl FeedbackId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

/// 作者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorKind {
    Customer,
    Vendor,
}

impl AuthorKind {
    pub fn as_role(self) -> Role {
        match self {
            Self::Customer => Role::Customer,
            Self::Vendor => Role::Vendor,
        }
    }
}

/// 反馈类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Complaint,
    Suggestion,
    Compliment,
    General,
}

/// 评分（1..=5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, EngagementError> {
        if !(1..=5).contains(&value) {
            return Err(EngagementError::RatingOutOfRange);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// 反馈
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub author: AuthorKind,
    /// 作者的 Principal ID
    pub author_id: String,
    /// 指向的商家（平台级反馈为空）
    pub vendor_id: Option<VendorId>,
    pub kind: FeedbackKind,
    pub rating: Option<Rating>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(
        author: AuthorKind,
        author_id: impl Into<String>,
        vendor_id: Option<VendorId>,
        kind: FeedbackKind,
        rating: Option<Rating>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: FeedbackId::new(),
            author,
            author_id: author_id.into(),
            vendor_id,
            kind,
            rating,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for Feedback {
    type Id = FeedbackId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProtectedResource for Feedback {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Feedback
    }

    /// 归属即反馈指向的商家；平台级反馈归属管理端
    fn owner(&self) -> OwnerId {
        match &self.vendor_id {
            Some(vendor_id) => OwnerId::Vendor(vendor_id.clone()),
            None => OwnerId::Admin,
        }
    }

    fn author_role(&self) -> Option<Role> {
        Some(self.author.as_role())
    }
}
