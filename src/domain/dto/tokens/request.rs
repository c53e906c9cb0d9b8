//! 인증 RPC 요청 DTO
use serde::Deserialize;
use validator::Validate;

use crate::domain::models::token::TokenKind;

/// 로그인 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_not_blank", message = "사용자명을 입력해주세요"))]
    pub username: String,

    #[validate(custom(function = "validate_not_blank", message = "비밀번호를 입력해주세요"))]
    pub password: String,

    /// 발급할 토큰 종류 (`LOCAL` | `PUBLIC`, 기본값 `LOCAL`)
    #[serde(default)]
    pub token_type: TokenKind,
}

/// 토큰 검증 요청 구조체
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

/// 토큰 갱신 요청 DTO
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
