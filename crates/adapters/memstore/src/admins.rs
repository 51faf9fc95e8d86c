//! 管理员仓储的文档存储实现

use std::sync::Arc;

use async_trait::async_trait;
use mesa_common::{AdminId, CredentialRef};
use mesa_domain_core::Email;
use mesa_errors::AppResult;
use mesa_identity::{Admin, AdminRepository};
use mesa_ports::{DocumentStore, Filter, Repository};

use crate::codec::{from_document, id_filter, to_document, upsert};

const COLLECTION: &str = "admins";

/// 管理员仓储
pub struct DocAdminRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocAdminRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find_one_by(&self, filter: Filter) -> AppResult<Option<Admin>> {
        match self.store.find_one(COLLECTION, &filter).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Repository<Admin, AdminId> for DocAdminRepository {
    async fn find_by_id(&self, id: &AdminId) -> AppResult<Option<Admin>> {
        self.find_one_by(id_filter(&id.to_string())).await
    }

    async fn save(&self, entity: &Admin) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), COLLECTION, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &AdminId) -> AppResult<()> {
        self.store.delete(COLLECTION, &id.to_string()).await
    }
}

#[async_trait]
impl AdminRepository for DocAdminRepository {
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Admin>> {
        self.find_one_by(Filter::new().eq("email", email.as_str()))
            .await
    }

    async fn find_by_credential(
        &self,
        credential_ref: &CredentialRef,
    ) -> AppResult<Option<Admin>> {
        self.find_one_by(Filter::new().eq("credential_ref", credential_ref.as_str()))
            .await
    }
}
