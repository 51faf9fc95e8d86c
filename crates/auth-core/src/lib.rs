//! mesa-auth-core - 认证核心库
//!
//! 角色/能力表/Principal 核心逻辑

mod principal;
mod role;
mod secret;

pub use principal::*;
pub use role::*;
pub use secret::*;
