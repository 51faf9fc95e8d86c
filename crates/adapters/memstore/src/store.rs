//! 内存文档存储

use std::collections::HashMap;

use async_trait::async_trait;
use mesa_errors::{AppError, AppResult};
use mesa_ports::{Document, DocumentStore, Filter};
use tokio::sync::RwLock;

/// 进程内文档存储
///
/// 集合按名称惰性创建。与托管后端一致：插入已存在的 ID 报冲突，
/// 更新与删除不存在的文档报 NotFound
#[derive(Default)]
pub struct MemDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl MemDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 无条件写入一个文档
    ///
    /// 播种只读集合用（订单由下单端生成，本后台没有写入口）
    pub async fn seed(&self, collection: &str, id: &str, document: Document) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
    }

    /// 集合内文档数
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.values().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .values()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, id: &str, document: Document) -> AppResult<String> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.contains_key(id) {
            return Err(AppError::already_exists(format!(
                "document {collection}/{id}"
            )));
        }

        documents.insert(id.to_string(), document);
        Ok(id.to_string())
    }

    async fn update(&self, collection: &str, id: &str, document: Document) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| AppError::not_found(format!("document {collection}/{id}")))?;

        *slot = document;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .ok_or_else(|| AppError::not_found(format!("document {collection}/{id}")))?;
        Ok(())
    }
}
