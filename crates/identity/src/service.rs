//! 管理员账号服务
//!
//! 仅 main_admin 可管理管理员账号

use std::sync::Arc;

use mesa_auth_core::{Capability, PlainSecret, Principal, SecretPolicy};
use mesa_domain_core::Email;
use mesa_errors::{AppError, AppResult};
use mesa_ports::{CredentialError, CredentialStore};
use tracing::{info, warn};

use crate::admin::Admin;
use crate::repository::AdminRepository;

/// 管理员账号服务
pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    credentials: Arc<dyn CredentialStore>,
    secret_policy: SecretPolicy,
}

impl AdminService {
    pub fn new(
        admins: Arc<dyn AdminRepository>,
        credentials: Arc<dyn CredentialStore>,
        secret_policy: SecretPolicy,
    ) -> Self {
        Self {
            admins,
            credentials,
            secret_policy,
        }
    }

    /// 创建管理员账号并开通凭证
    pub async fn create_admin(
        &self,
        actor: &Principal,
        email: Email,
        display_name: String,
        secret: String,
    ) -> AppResult<Admin> {
        if !actor.has_capability(Capability::AdminManagement) {
            return Err(AppError::permission_denied(
                "admin accounts are managed by the main admin only",
            ));
        }

        if self.admins.find_by_email(&email).await?.is_some() {
            return Err(AppError::already_exists(format!(
                "admin with email {email}"
            )));
        }

        let secret = PlainSecret::new(secret, &self.secret_policy)?;
        let mut admin = Admin::new(email.clone(), display_name);

        match self.credentials.create(&email, secret.expose()).await {
            Ok(credential_ref) => admin.link_credential(credential_ref),
            Err(CredentialError::AlreadyExists(_)) => {
                // 登录时的链接自愈会补上引用
                warn!(admin_id = %admin.id, "Credential already exists at provider, link left empty");
            }
            Err(err) => return Err(err.into()),
        }

        self.admins.save(&admin).await?;
        info!(admin_id = %admin.id, actor = %actor.id, "Admin account created");
        Ok(admin)
    }
}
