//! 토큰 클레임 빌더
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::models::token::token::TokenClaims;
use crate::errors::{AuthError, AuthResult};

/// [`TokenClaims`]를 단계적으로 구성하는 빌더
///
/// 기본값: `issued_at = now`, `token_id = UUID v4`, `expires_in_seconds = 3600`.
///
/// ```rust,ignore
/// let claims = TokenClaimsBuilder::new("svc", "api")
///     .subject("u1")
///     .expires_in_seconds(900)
///     .roles(vec!["user".into()])
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct TokenClaimsBuilder {
    issuer: String,
    audience: String,
    subject: String,
    expires_in_seconds: i64,
    not_before: Option<DateTime<Utc>>,
    issued_at: DateTime<Utc>,
    token_id: String,
    roles: Vec<String>,
    permissions: Vec<String>,
}

impl TokenClaimsBuilder {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            subject: String::new(),
            expires_in_seconds: 3600,
            not_before: None,
            issued_at: Utc::now(),
            token_id: Uuid::new_v4().to_string(),
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn expires_in_seconds(mut self, seconds: i64) -> Self {
        self.expires_in_seconds = seconds;
        self
    }

    pub fn not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    pub fn token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = token_id.into();
        self
    }

    pub fn roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    /// 클레임을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidArgument` - issuer/subject/audience가 비어 있거나
    ///   유효 기간이 0 이하인 경우
    pub fn build(self) -> AuthResult<TokenClaims> {
        if self.issuer.trim().is_empty() {
            return Err(AuthError::InvalidArgument("issuer는 비어 있을 수 없습니다".to_string()));
        }
        if self.subject.trim().is_empty() {
            return Err(AuthError::InvalidArgument("subject는 비어 있을 수 없습니다".to_string()));
        }
        if self.audience.trim().is_empty() {
            return Err(AuthError::InvalidArgument("audience는 비어 있을 수 없습니다".to_string()));
        }
        if self.expires_in_seconds <= 0 {
            return Err(AuthError::InvalidArgument("TTL은 양수여야 합니다".to_string()));
        }

        let lifetime = Duration::try_seconds(self.expires_in_seconds)
            .ok_or_else(|| AuthError::InvalidArgument("TTL 범위를 벗어났습니다".to_string()))?;
        let expiration = self
            .issued_at
            .checked_add_signed(lifetime)
            .ok_or_else(|| AuthError::InvalidArgument("TTL 범위를 벗어났습니다".to_string()))?;

        Ok(TokenClaims {
            issuer: self.issuer,
            subject: self.subject,
            audience: self.audience,
            expiration,
            not_before: self.not_before,
            issued_at: self.issued_at,
            token_id: self.token_id,
            roles: self.roles,
            permissions: self.permissions,
        })
    }
}
