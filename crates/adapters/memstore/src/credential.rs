//! 内存凭证服务
//!
//! 托管身份提供方的进程内复刻：密钥以 Argon2 哈希保存，
//! 连续失败达到阈值后锁定并以限流错误上报

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mesa_auth_core::{HashedSecret, PlainSecret, SecretPolicy};
use mesa_common::CredentialRef;
use mesa_domain_core::Email;
use mesa_ports::{CredentialError, CredentialStore};
use tokio::sync::Mutex;
use uuid::Uuid;

/// 连续失败锁定策略
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// 触发锁定的连续失败次数
    pub max_failed_attempts: u32,
    /// 锁定时长（分钟）
    pub lockout_minutes: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_minutes: 30,
        }
    }
}

struct Account {
    secret: HashedSecret,
    credential_ref: CredentialRef,
}

#[derive(Default)]
struct Attempts {
    failed: u32,
    locked_until: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    attempts: HashMap<String, Attempts>,
}

/// 进程内凭证服务
pub struct MemCredentialStore {
    state: Mutex<State>,
    /// 提供方自身的密钥策略，违反时以 WeakSecret 拒绝开通
    secret_policy: SecretPolicy,
    lockout: LockoutPolicy,
}

impl Default for MemCredentialStore {
    fn default() -> Self {
        Self::new(SecretPolicy::default(), LockoutPolicy::default())
    }
}

impl MemCredentialStore {
    pub fn new(secret_policy: SecretPolicy, lockout: LockoutPolicy) -> Self {
        Self {
            state: Mutex::new(State::default()),
            secret_policy,
            lockout,
        }
    }

    /// 某邮箱在提供方的凭证引用（断言播种结果用）
    pub async fn credential_ref_of(&self, email: &Email) -> Option<CredentialRef> {
        let state = self.state.lock().await;
        state
            .accounts
            .get(email.as_str())
            .map(|account| account.credential_ref.clone())
    }
}

#[async_trait]
impl CredentialStore for MemCredentialStore {
    async fn verify(&self, email: &Email, secret: &str) -> Result<CredentialRef, CredentialError> {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        let now = Utc::now();

        let attempts = state.attempts.entry(email.as_str().to_string()).or_default();
        if let Some(until) = attempts.locked_until {
            if now < until {
                return Err(CredentialError::RateLimited(format!(
                    "too many failed attempts, locked until {until}"
                )));
            }
            attempts.locked_until = None;
            attempts.failed = 0;
        }

        let matched = match state.accounts.get(email.as_str()) {
            Some(account) => account
                .secret
                .verify(secret)
                .map_err(|err| CredentialError::Provider(err.to_string()))?,
            None => false,
        };

        if !matched {
            attempts.failed += 1;
            if attempts.failed >= self.lockout.max_failed_attempts {
                let until = now + Duration::minutes(self.lockout.lockout_minutes);
                attempts.locked_until = Some(until);
                return Err(CredentialError::RateLimited(format!(
                    "too many failed attempts, locked until {until}"
                )));
            }
            return Err(CredentialError::InvalidCredential);
        }

        state.attempts.remove(email.as_str());
        Ok(state.accounts[email.as_str()].credential_ref.clone())
    }

    async fn create(&self, email: &Email, secret: &str) -> Result<CredentialRef, CredentialError> {
        let plain = PlainSecret::new(secret, &self.secret_policy)
            .map_err(|err| CredentialError::WeakSecret(err.to_string()))?;

        let mut state = self.state.lock().await;
        if state.accounts.contains_key(email.as_str()) {
            return Err(CredentialError::AlreadyExists(email.to_string()));
        }

        let hashed = HashedSecret::from_plain(&plain)
            .map_err(|err| CredentialError::Provider(err.to_string()))?;
        let credential_ref = CredentialRef::new(format!("mem-{}", Uuid::now_v7()));

        state.accounts.insert(
            email.as_str().to_string(),
            Account {
                secret: hashed,
                credential_ref: credential_ref.clone(),
            },
        );
        Ok(credential_ref)
    }
}
