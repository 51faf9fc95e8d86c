//! 实体与存储文档间的转换

use mesa_errors::{AppError, AppResult};
use mesa_ports::{Document, DocumentStore, Filter, RecordFilter};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) fn to_document<T: Serialize>(entity: &T) -> AppResult<Document> {
    serde_json::to_value(entity)
        .map_err(|err| AppError::internal(format!("document encode failed: {err}")))
}

pub(crate) fn from_document<T: DeserializeOwned>(document: Document) -> AppResult<T> {
    serde_json::from_value(document)
        .map_err(|err| AppError::store(format!("malformed document: {err}")))
}

pub(crate) fn from_documents<T: DeserializeOwned>(documents: Vec<Document>) -> AppResult<Vec<T>> {
    documents.into_iter().map(from_document).collect()
}

/// RecordFilter → 存储层等值条件，标志下推到 flag_field
pub(crate) fn push_down<F: Serialize>(
    filter: &RecordFilter<F>,
    flag_field: &str,
) -> AppResult<Filter> {
    let mut conditions = owner_only(filter)?;
    if let Some(flag) = filter.flag() {
        conditions = conditions.eq(flag_field, to_document(flag)?);
    }
    Ok(conditions)
}

/// 仅下推归属条件（单元标志的仓储用）
pub(crate) fn owner_only<F>(filter: &RecordFilter<F>) -> AppResult<Filter> {
    let mut conditions = Filter::new();
    if let Some(owner) = filter.owner() {
        conditions = conditions.eq("owner", to_document(owner)?);
    }
    Ok(conditions)
}

/// 按 ID 覆盖或插入整文档
pub(crate) async fn upsert(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    document: Document,
) -> AppResult<()> {
    let existing = store
        .find_one(collection, &Filter::new().eq("id", id))
        .await?;
    if existing.is_some() {
        store.update(collection, id, document).await
    } else {
        store.insert(collection, id, document).await.map(|_| ())
    }
}

pub(crate) fn id_filter(id: &str) -> Filter {
    Filter::new().eq("id", id)
}
