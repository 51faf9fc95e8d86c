//! 会话/身份解析器
//!
//! 解析顺序是契约的一部分：超级管理员引导凭证 → 外部凭证校验 →
//! 管理员记录 → 商家记录（先凭证链接后邮箱回退）。
//! 校验通过但没有任何角色记录的凭证一律拒绝，不再默认提升为管理员

use std::sync::Arc;

use mesa_auth_core::{Principal, PrincipalId};
use mesa_domain_core::Email;
use mesa_errors::{AppError, AppResult};
use mesa_ports::CredentialStore;
use mesa_vendor::VendorRepository;
use secrecy::{ExposeSecret, Secret};
use tracing::{info, warn};

use crate::repository::AdminRepository;

/// 超级管理员引导配置
///
/// 匹配时直接产出合成 MainAdmin 主体，不触达凭证服务
pub struct SuperAdminBootstrap {
    email: Email,
    secret: Secret<String>,
}

impl SuperAdminBootstrap {
    pub fn new(email: Email, secret: Secret<String>) -> Self {
        Self { email, secret }
    }

    fn matches(&self, email: &Email, secret: &str) -> bool {
        &self.email == email && self.secret.expose_secret() == secret
    }
}

/// 会话解析器
pub struct SessionResolver {
    super_admin: SuperAdminBootstrap,
    admins: Arc<dyn AdminRepository>,
    vendors: Arc<dyn VendorRepository>,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionResolver {
    pub fn new(
        super_admin: SuperAdminBootstrap,
        admins: Arc<dyn AdminRepository>,
        vendors: Arc<dyn VendorRepository>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            super_admin,
            admins,
            vendors,
            credentials,
        }
    }

    /// 解析 (email, secret) 为请求主体
    pub async fn resolve(&self, email: &Email, secret: &str) -> AppResult<Principal> {
        // 1. 静态配置的超级管理员
        if self.super_admin.matches(email, secret) {
            mesa_telemetry::record_identity_resolution("main_admin");
            return Ok(Principal::main_admin(email.clone()));
        }

        // 2. 外部凭证校验；失败与限流原样向上暴露
        let credential_ref = self.credentials.verify(email, secret).await?;

        // 3. 管理员记录，过期链接自愈
        if let Some(mut admin) = self.admins.find_by_email(email).await? {
            if admin.credential_ref.as_ref() != Some(&credential_ref) {
                admin.link_credential(credential_ref.clone());
                if let Err(err) = self.admins.save(&admin).await {
                    // 链接修复是幂等的，下次登录会重试，不拦截本次登录
                    warn!(admin_id = %admin.id, error = %err, "Admin credential link repair failed");
                }
            }

            mesa_telemetry::record_identity_resolution("admin");
            return Ok(Principal::admin(
                PrincipalId::new(credential_ref.as_str()),
                email.clone(),
            ));
        }

        // 4. 商家记录：先按凭证链接，再按邮箱回退
        let (vendor, found_by_email) = match self.vendors.find_by_credential(&credential_ref).await?
        {
            Some(vendor) => (Some(vendor), false),
            None => (self.vendors.find_by_email(email).await?, true),
        };

        if let Some(mut vendor) = vendor {
            if !vendor.permits_login() {
                mesa_telemetry::record_identity_resolution("not_approved");
                return Err(AppError::account_not_approved(format!(
                    "vendor account is {}",
                    vendor.lifecycle
                )));
            }

            if found_by_email {
                vendor.link_credential(credential_ref.clone());
                if let Err(err) = self.vendors.save(&vendor).await {
                    warn!(vendor_id = %vendor.id, error = %err, "Vendor credential link repair failed");
                }
            }

            info!(vendor_id = %vendor.id, "Vendor session resolved");
            mesa_telemetry::record_identity_resolution("vendor");
            return Ok(Principal::vendor(
                PrincipalId::new(credential_ref.as_str()),
                email.clone(),
                vendor.id.clone(),
            ));
        }

        // 5. 有凭证但无角色记录：闭合失败
        warn!(email = %email, "Verified credential has no matching role record");
        mesa_telemetry::record_identity_resolution("unmatched");
        Err(AppError::not_found("no role record for credential"))
    }
}
