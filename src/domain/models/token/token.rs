//! PASETO 토큰 클레임, 푸터, 토큰 종류
//!
//! 토큰 안에 담기는 신원/권한 정보와 무결성만 보장되는 푸터 메타데이터를
//! 정의합니다. 클레임은 발급 때마다 새로 만들어지고, 검증 시에는
//! 역직렬화된 값이 모든 검사를 통과하기 전까지 신뢰되지 않습니다.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, AuthResult};

/// v4.local 토큰 접두사
pub const LOCAL_PREFIX: &str = "v4.local.";
/// v4.public 토큰 접두사
pub const PUBLIC_PREFIX: &str = "v4.public.";

/// 토큰의 클레임(Payload) 구조체
///
/// 등록 클레임 이름(`iss`, `sub`, `aud`, `exp`, `nbf`, `iat`, `jti`)으로
/// 직렬화되며 시간 값은 RFC 3339 문자열입니다.
///
/// `not_before`를 제외한 모든 필드는 필수이고, `expiration`은 항상
/// `issued_at`보다 뒤입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 토큰 발급자
    #[serde(rename = "iss")]
    pub issuer: String,
    /// 토큰의 주체 (불투명한 사용자 식별자)
    #[serde(rename = "sub")]
    pub subject: String,
    /// 토큰 대상 서비스
    #[serde(rename = "aud")]
    pub audience: String,
    /// 만료 시각
    #[serde(rename = "exp")]
    pub expiration: DateTime<Utc>,
    /// 이 시각 이전에는 유효하지 않음 (선택사항)
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
    /// 발급 시각
    #[serde(rename = "iat")]
    pub issued_at: DateTime<Utc>,
    /// 토큰 고유 ID
    #[serde(rename = "jti")]
    pub token_id: String,
    /// 역할 목록 (순서 유지)
    #[serde(default)]
    pub roles: Vec<String>,
    /// 권한 목록 (순서 유지)
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl TokenClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    pub fn has_all_roles(&self, roles: &[&str]) -> bool {
        roles.iter().all(|role| self.has_role(role))
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.has_permission(p))
    }

    /// `now`가 만료 시각을 지났는지 확인
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }

    /// `now`가 `nbf`보다 이른지 확인 (`nbf`가 없으면 항상 false)
    pub fn is_not_yet_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before.is_some_and(|nbf| now < nbf)
    }

    /// 남은 유효 시간 (초, 음수가 되지 않음)
    pub fn remaining_ttl(&self) -> i64 {
        (self.expiration - Utc::now()).num_seconds().max(0)
    }

    /// 역직렬화된 클레임의 구조적 불변식 확인
    ///
    /// # Errors
    ///
    /// * `AuthError::MalformedClaims` - 빈 subject, 또는 `exp`가 `iat` 이후가 아님
    pub fn ensure_well_formed(&self) -> AuthResult<()> {
        if self.subject.trim().is_empty() {
            return Err(AuthError::MalformedClaims("subject가 비어 있습니다".to_string()));
        }
        if self.token_id.trim().is_empty() {
            return Err(AuthError::MalformedClaims("jti가 비어 있습니다".to_string()));
        }
        if self.expiration <= self.issued_at {
            return Err(AuthError::MalformedClaims(
                "exp가 iat보다 이후여야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 토큰 푸터
///
/// 암호화되지 않지만 연관 데이터로 묶여 변조가 감지되는 메타데이터입니다.
/// 키 로테이션 힌트로만 사용하며, 인가 판단에는 절대 사용하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFooter {
    #[serde(rename = "kid")]
    pub key_id: String,
    #[serde(rename = "ver", default = "TokenFooter::default_version")]
    pub version: String,
    #[serde(rename = "typ", default = "TokenFooter::default_type")]
    pub token_type: String,
}

impl TokenFooter {
    pub const ACCESS: &'static str = "access";
    pub const REFRESH: &'static str = "refresh";

    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            version: Self::default_version(),
            token_type: Self::default_type(),
        }
    }

    pub fn access(key_id: impl Into<String>) -> Self {
        Self::new(key_id)
    }

    pub fn refresh(key_id: impl Into<String>) -> Self {
        Self {
            token_type: Self::REFRESH.to_string(),
            ..Self::new(key_id)
        }
    }

    fn default_version() -> String {
        "1.0".to_string()
    }

    fn default_type() -> String {
        Self::ACCESS.to_string()
    }
}

/// 토큰 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    /// 대칭키 인증 암호화 (기밀성 + 무결성)
    #[default]
    Local,
    /// Ed25519 서명 (무결성만)
    Public,
}

impl TokenKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            TokenKind::Local => LOCAL_PREFIX,
            TokenKind::Public => PUBLIC_PREFIX,
        }
    }

    /// 토큰 문자열의 접두사로 종류를 판별합니다
    pub fn detect(token: &str) -> Option<Self> {
        if token.starts_with(LOCAL_PREFIX) {
            Some(TokenKind::Local)
        } else if token.starts_with(PUBLIC_PREFIX) {
            Some(TokenKind::Public)
        } else {
            None
        }
    }
}

/// 토큰 쌍 구조체
///
/// 로그인/갱신 응답으로 클라이언트에게 전달되는 토큰 집합입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// 액세스 토큰 (단기, 역할/권한 포함)
    pub access_token: String,
    /// 리프레시 토큰 (장기, 신원만 포함)
    pub refresh_token: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
    pub token_type: TokenKind,
}
