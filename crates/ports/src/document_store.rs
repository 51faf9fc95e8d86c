//! 文档存储抽象
//!
//! 托管文档库的最小操作面：等值过滤的查询与整文档读写。
//! 没有跨文档事务，调用方必须保证每个状态字段独立可解释

use async_trait::async_trait;
use mesa_errors::AppResult;
use serde_json::Value;

/// 存储的文档（JSON 对象）
pub type Document = Value;

/// 等值过滤条件
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个等值条件
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// 文档是否满足所有条件
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

/// 文档存储接口
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 按条件查找单个文档
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>>;

    /// 按条件查找所有匹配文档
    async fn find_many(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>>;

    /// 插入文档，返回文档 ID
    async fn insert(&self, collection: &str, id: &str, document: Document) -> AppResult<String>;

    /// 整体覆盖指定文档
    async fn update(&self, collection: &str, id: &str, document: Document) -> AppResult<()>;

    /// 删除指定文档
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches_all_conditions() {
        let doc = json!({"owner": "vendor-1", "approved": true, "name": "Snacks"});

        let filter = Filter::new().eq("owner", "vendor-1").eq("approved", true);
        assert!(filter.matches(&doc));

        let filter = Filter::new().eq("owner", "vendor-1").eq("approved", false);
        assert!(!filter.matches(&doc));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let doc = json!({"anything": 1});
        assert!(Filter::new().matches(&doc));
    }

    #[test]
    fn test_missing_field_does_not_match() {
        let doc = json!({"owner": "vendor-1"});
        assert!(!Filter::new().eq("approved", true).matches(&doc));
    }
}
