//! Blob 存储抽象
//!
//! 仅由外围的图片上传界面使用，策略核心不读写 blob

use async_trait::async_trait;
use mesa_errors::AppResult;

/// Blob 存储接口
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 上传一段字节，返回可公开访问的 URL
    async fn put_blob(&self, path: &str, bytes: Vec<u8>) -> AppResult<String>;
}
