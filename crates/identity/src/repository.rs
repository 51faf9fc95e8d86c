//! 管理员仓储接口

use async_trait::async_trait;
use mesa_common::{AdminId, CredentialRef};
use mesa_domain_core::Email;
use mesa_errors::AppResult;
use mesa_ports::Repository;

use crate::admin::Admin;

/// 管理员仓储
#[async_trait]
pub trait AdminRepository: Repository<Admin, AdminId> {
    /// 按邮箱查找
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Admin>>;

    /// 按外部凭证引用查找
    async fn find_by_credential(&self, credential_ref: &CredentialRef) -> AppResult<Option<Admin>>;
}
