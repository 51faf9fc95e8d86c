//! 外部凭证服务抽象
//!
//! 身份校验与凭证开通都委托给托管身份提供方

use async_trait::async_trait;
use mesa_common::CredentialRef;
use mesa_domain_core::Email;
use mesa_errors::AppError;
use thiserror::Error;

/// 凭证服务错误
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid credential")]
    InvalidCredential,

    /// 提供方上报的限流（连续失败过多）
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Credential already exists for {0}")]
    AlreadyExists(String),

    #[error("Weak secret: {0}")]
    WeakSecret(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidCredential => AppError::InvalidCredential,
            CredentialError::RateLimited(msg) => AppError::too_many_attempts(msg),
            CredentialError::AlreadyExists(msg) => AppError::already_exists(msg),
            CredentialError::WeakSecret(msg) => AppError::weak_secret(msg),
            CredentialError::InvalidEmail(msg) => AppError::validation(msg),
            CredentialError::Provider(msg) => AppError::store(msg),
        }
    }
}

/// 凭证服务接口
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 校验 (email, secret)，成功返回提供方的凭证引用
    async fn verify(&self, email: &Email, secret: &str) -> Result<CredentialRef, CredentialError>;

    /// 开通新凭证
    async fn create(&self, email: &Email, secret: &str) -> Result<CredentialRef, CredentialError>;
}
