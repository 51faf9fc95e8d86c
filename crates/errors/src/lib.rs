//! mesa-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Too many attempts: {0}")]
    TooManyAttempts(String),

    #[error("Account not approved: {0}")]
    AccountNotApproved(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Weak secret: {0}")]
    WeakSecret(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_credential() -> Self {
        Self::InvalidCredential
    }

    pub fn too_many_attempts(msg: impl Into<String>) -> Self {
        Self::TooManyAttempts(msg.into())
    }

    pub fn account_not_approved(msg: impl Into<String>) -> Self {
        Self::AccountNotApproved(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn weak_secret(msg: impl Into<String>) -> Self {
        Self::WeakSecret(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 存储层错误是否可视为瞬态（读路径可降级为空结果）
    pub fn is_transient_store_error(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredential => 401,
            Self::TooManyAttempts(_) => 429,
            Self::AccountNotApproved(_) => 403,
            Self::PermissionDenied(_) => 403,
            Self::NotFound(_) => 404,
            Self::AlreadyExists(_) => 409,
            Self::WeakSecret(_) => 400,
            Self::Validation(_) => 400,
            Self::Store(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::InvalidCredential => "invalid-credential",
            Self::TooManyAttempts(_) => "too-many-attempts",
            Self::AccountNotApproved(_) => "account-not-approved",
            Self::PermissionDenied(_) => "permission-denied",
            Self::NotFound(_) => "not-found",
            Self::AlreadyExists(_) => "already-exists",
            Self::WeakSecret(_) => "weak-secret",
            Self::Validation(_) => "validation",
            Self::Store(_) => "store",
            Self::Internal(_) => "internal",
        };
        format!("https://api.mesa-platform.dev/problems/{}", slug)
    }

    fn problem_title(&self) -> String {
        match self {
            Self::InvalidCredential => "Invalid Credential".to_string(),
            Self::TooManyAttempts(_) => "Too Many Attempts".to_string(),
            Self::AccountNotApproved(_) => "Account Not Approved".to_string(),
            Self::PermissionDenied(_) => "Permission Denied".to_string(),
            Self::NotFound(_) => "Resource Not Found".to_string(),
            Self::AlreadyExists(_) => "Already Exists".to_string(),
            Self::WeakSecret(_) => "Weak Secret".to_string(),
            Self::Validation(_) => "Validation Error".to_string(),
            Self::Store(_) => "Store Error".to_string(),
            Self::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
