//! mesa-memstore - 进程内适配器
//!
//! 文档存储、凭证服务与 blob 存储的内存实现，供集成测试与
//! 本地开发使用；对外行为与托管后端保持一致

mod admins;
mod blob;
mod catalog;
mod codec;
mod credential;
mod engagement;
mod store;
mod vendors;

pub use admins::*;
pub use blob::*;
pub use catalog::*;
pub use credential::*;
pub use engagement::*;
pub use store::*;
pub use vendors::*;
