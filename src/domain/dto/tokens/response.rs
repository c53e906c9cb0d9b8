use serde::Serialize;

use crate::domain::models::token::{TokenClaims, TokenKind, TokenPair};

/// 로그인/갱신 응답
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: TokenKind,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            token_type: pair.token_type,
        }
    }
}

/// 토큰 검증 응답
///
/// 검증 실패는 호출 오류가 아니라 `valid: false`로 전달됩니다.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ValidateResponse {
    pub valid: bool,
    pub subject: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl ValidateResponse {
    pub fn invalid() -> Self {
        Self::default()
    }
}

impl From<TokenClaims> for ValidateResponse {
    fn from(claims: TokenClaims) -> Self {
        Self {
            valid: true,
            subject: claims.subject,
            roles: claims.roles,
            permissions: claims.permissions,
        }
    }
}

/// 로그아웃 응답
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}
