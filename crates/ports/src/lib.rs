//! mesa-ports - 抽象 trait 层
//!
//! 定义所有基础设施的抽象接口

mod blob;
mod credential;
mod document_store;
mod query;
mod repository;

pub use blob::*;
pub use credential::*;
pub use document_store::*;
pub use query::*;
pub use repository::*;
