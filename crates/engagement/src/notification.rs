//! 平台广播通知
//!
//! 仅管理端可创建；read_by 按 Principal ID 去重，标记已读天然幂等

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use mesa_access::{Audience, ProtectedResource, ResourceKind};
use mesa_common::OwnerId;
use mesa_domain_core::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::EngagementError;

/// 通知 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// 平台通知
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub audience: Audience,
    pub expires_at: Option<DateTime<Utc>>,
    /// 已读主体集合
    pub read_by: HashSet<String>,
    /// 创建者的 Principal ID
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        audience: Audience,
        expires_at: Option<DateTime<Utc>>,
        created_by: impl Into<String>,
    ) -> Result<Self, EngagementError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(EngagementError::EmptyTitle);
        }

        Ok(Self {
            id: NotificationId::new(),
            title,
            body: body.into(),
            audience,
            expires_at,
            read_by: HashSet::new(),
            created_by: created_by.into(),
            created_at: Utc::now(),
        })
    }

    /// 某时刻是否仍然有效
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => at < expires_at,
            None => true,
        }
    }

    /// 标记已读；重复标记返回 false
    pub fn mark_read(&mut self, principal_id: impl Into<String>) -> bool {
        self.read_by.insert(principal_id.into())
    }

    pub fn is_read_by(&self, principal_id: &str) -> bool {
        self.read_by.contains(principal_id)
    }
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProtectedResource for Notification {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Notification
    }

    fn owner(&self) -> OwnerId {
        OwnerId::Admin
    }

    fn audience(&self) -> Option<Audience> {
        Some(self.audience)
    }
}
