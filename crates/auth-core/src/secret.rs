//! 登录密钥值对象
//!
//! 平台本地只校验最小长度并在需要落盘处使用 Argon2 哈希；
//! 更严格的强度策略由外部凭证服务执行并以 WeakSecret 形式返回

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 密钥策略
#[derive(Debug, Clone)]
pub struct SecretPolicy {
    /// 最小长度
    pub min_length: usize,
    /// 最大长度
    pub max_length: usize,
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 128,
        }
    }
}

impl SecretPolicy {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }
}

/// 明文密钥（仅存活于单次请求内，永不落盘）
pub struct PlainSecret(Secret<String>);

impl PlainSecret {
    /// 创建并按策略校验
    pub fn new(secret: impl Into<String>, policy: &SecretPolicy) -> Result<Self, SecretError> {
        let secret = secret.into();

        if secret.len() < policy.min_length {
            return Err(SecretError::TooShort(policy.min_length));
        }

        if secret.len() > policy.max_length {
            return Err(SecretError::TooLong(policy.max_length));
        }

        Ok(Self(Secret::new(secret)))
    }

    /// 获取字符串引用
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for PlainSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlainSecret([REDACTED])")
    }
}

/// 哈希后的密钥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedSecret(pub String);

impl HashedSecret {
    /// 从明文密钥创建哈希
    pub fn from_plain(plain: &PlainSecret) -> Result<Self, SecretError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(plain.expose().as_bytes(), &salt)
            .map_err(|e| SecretError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(Self(hash))
    }

    /// 验证明文密钥是否匹配
    pub fn verify(&self, plain: &str) -> Result<bool, SecretError> {
        let parsed_hash =
            PasswordHash::new(&self.0).map_err(|e| SecretError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// 密钥错误
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Secret is too short (minimum {0} characters)")]
    TooShort(usize),

    #[error("Secret is too long (maximum {0} characters)")]
    TooLong(usize),

    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid secret hash: {0}")]
    InvalidHash(String),
}

impl From<SecretError> for mesa_errors::AppError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::TooShort(_) | SecretError::TooLong(_) => {
                mesa_errors::AppError::weak_secret(err.to_string())
            }
            other => mesa_errors::AppError::internal(other.to_string()),
        }
    }
}
