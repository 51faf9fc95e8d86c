//! 商家仓储的文档存储实现

use std::sync::Arc;

use async_trait::async_trait;
use mesa_common::{CredentialRef, PagedResult, Pagination, VendorId};
use mesa_domain_core::Email;
use mesa_errors::AppResult;
use mesa_ports::{DocumentStore, Filter, Repository};
use mesa_vendor::{Vendor, VendorRepository};

use crate::codec::{from_document, from_documents, id_filter, to_document, upsert};

const COLLECTION: &str = "vendors";

/// 商家仓储
pub struct DocVendorRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocVendorRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find_one_by(&self, filter: Filter) -> AppResult<Option<Vendor>> {
        match self.store.find_one(COLLECTION, &filter).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Repository<Vendor, VendorId> for DocVendorRepository {
    async fn find_by_id(&self, id: &VendorId) -> AppResult<Option<Vendor>> {
        self.find_one_by(id_filter(&id.to_string())).await
    }

    async fn save(&self, entity: &Vendor) -> AppResult<()> {
        let document = to_document(entity)?;
        upsert(self.store.as_ref(), COLLECTION, &entity.id.to_string(), document).await
    }

    async fn delete(&self, id: &VendorId) -> AppResult<()> {
        self.store.delete(COLLECTION, &id.to_string()).await
    }
}

#[async_trait]
impl VendorRepository for DocVendorRepository {
    async fn find_by_credential(
        &self,
        credential_ref: &CredentialRef,
    ) -> AppResult<Option<Vendor>> {
        self.find_one_by(Filter::new().eq("credential_ref", credential_ref.as_str()))
            .await
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Vendor>> {
        self.find_one_by(Filter::new().eq("email", email.as_str()))
            .await
    }

    async fn find_page(&self, pagination: &Pagination) -> AppResult<PagedResult<Vendor>> {
        let documents = self.store.find_many(COLLECTION, &Filter::new()).await?;
        let mut vendors: Vec<Vendor> = from_documents(documents)?;
        // 注册时间序，翻页结果稳定
        vendors.sort_by(|a, b| a.audit_info.created_at.cmp(&b.audit_info.created_at));

        let total = vendors.len() as u64;
        let items = vendors
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.page_size as usize)
            .collect();
        Ok(PagedResult::new(items, total, pagination))
    }
}
