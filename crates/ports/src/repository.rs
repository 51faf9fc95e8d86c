//! Repository trait 定义

use async_trait::async_trait;
use mesa_errors::AppResult;

/// 基础 Repository trait
#[async_trait]
pub trait Repository<T, ID: Sync>: Send + Sync {
    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 保存实体（插入或整体覆盖）
    async fn save(&self, entity: &T) -> AppResult<()>;

    /// 删除实体
    async fn delete(&self, id: &ID) -> AppResult<()>;

    /// 检查是否存在
    async fn exists(&self, id: &ID) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
