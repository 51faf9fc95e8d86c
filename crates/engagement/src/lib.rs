//! mesa-engagement - 订单视图/反馈/平台通知

mod error;
mod feedback;
mod notification;
mod order;
mod repository;
mod service;

pub use error::*;
pub use feedback::*;
pub use notification::*;
pub use order::*;
pub use repository::*;
pub use service::*;
