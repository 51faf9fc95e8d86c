//! 内存 blob 存储
//!
//! 仅外围上传界面使用；URL 方案为 memblob://，不可公网访问

use std::collections::HashMap;

use async_trait::async_trait;
use mesa_errors::AppResult;
use mesa_ports::BlobStore;
use tokio::sync::RwLock;

/// 进程内 blob 存储
#[derive(Default)]
pub struct MemBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        let blobs = self.blobs.read().await;
        blobs.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        let blobs = self.blobs.read().await;
        blobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStore for MemBlobStore {
    async fn put_blob(&self, path: &str, bytes: Vec<u8>) -> AppResult<String> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(path.to_string(), bytes);
        Ok(format!("memblob://{path}"))
    }
}
