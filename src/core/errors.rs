//! # Application Error Handling System
//!
//! RPC 엔드포인트를 위한 통합 에러 처리 시스템입니다.
//! 각 에러는 `actix_web::ResponseError` 구현을 통해 일관된 JSON 응답과
//! HTTP 상태 코드로 자동 변환됩니다.
//!
//! ## 인증 실패의 처리
//!
//! 토큰 서비스의 구체적인 실패([`AuthError`])는 `From` 변환에서
//! 하나의 [`AppError::AuthenticationError`]로 합쳐집니다.
//! 구체적인 사유는 `warn` 로그에만 남고 응답 본문에는 실리지 않습니다.
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult};
//!
//! fn refresh(&self, token: &str) -> AppResult<TokenPair> {
//!     // 만료, 서명 오류, 잘못된 형식 모두 동일한 401 응답이 됩니다
//!     let claims = self.token_service.validate_local_token(token, key)?;
//!     // ...
//! }
//! ```

use thiserror::Error;

use crate::errors::AuthError;

/// 인증 실패 시 호출자에게 전달되는 유일한 메시지
pub const GENERIC_AUTH_FAILURE: &str = "유효한 인증 토큰이 필요합니다";

/// 애플리케이션 전역 에러 타입
///
/// ## 에러 카테고리
///
/// - `ValidationError`: 입력값 검증 실패 (400)
/// - `AuthenticationError`: 인증 실패 (401)
/// - `ConfigError`: 시작 시 설정 오류 (500)
/// - `InternalError`: 예상하지 못한 시스템 오류 (500)
#[derive(Error, Debug)]
pub enum AppError {
    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    ///
    /// 메시지는 항상 일반적인 문구여야 합니다. 토큰이 왜 거부되었는지는
    /// 응답에 포함하지 않습니다.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 설정 에러 (500 Internal Server Error)
    ///
    /// 누락되었거나 형식이 잘못된 환경 변수, 키 파일 등
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 일반 메시지를 가진 인증 실패
    pub fn unauthenticated() -> Self {
        AppError::AuthenticationError(GENERIC_AUTH_FAILURE.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidArgument(msg) => AppError::ValidationError(msg),
            AuthError::KeyFormatError(msg) => AppError::ConfigError(msg),
            AuthError::TokenIssuanceError(msg) => AppError::InternalError(msg),
            other => {
                log::warn!("토큰 검증 실패: {}", other.diagnostic());
                AppError::unauthenticated()
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 500 계열은 내부 메시지를 숨기고 고정 문구만 반환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let body = match self {
            AppError::AuthenticationError(msg) => serde_json::json!({
                "error": "unauthenticated",
                "message": msg,
            }),
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                log::error!("❌ {}", self);
                serde_json::json!({
                    "error": "internal",
                    "message": "요청을 처리하는 중 오류가 발생했습니다",
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
            }),
        };

        actix_web::HttpResponse::build(self.status_code()).json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClaimsRejection;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("username required".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::unauthenticated();
        assert_eq!(error.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("signing key missing".to_string());
        assert_eq!(
            error.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_failures_collapse_to_generic_message() {
        let failures = vec![
            AuthError::InvalidTokenFormat("prefix".into()),
            AuthError::CryptoValidationError("bad tag".into()),
            AuthError::MalformedClaims("missing sub".into()),
            AuthError::ClaimsRejected(ClaimsRejection::TokenExpired),
        ];

        for failure in failures {
            match AppError::from(failure) {
                AppError::AuthenticationError(msg) => assert_eq!(msg, GENERIC_AUTH_FAILURE),
                other => panic!("Expected AuthenticationError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_issuance_errors_are_not_authentication_errors() {
        assert!(matches!(
            AppError::from(AuthError::InvalidArgument("ttl".into())),
            AppError::ValidationError(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::TokenIssuanceError("sign".into())),
            AppError::InternalError(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::KeyFormatError("len".into())),
            AppError::ConfigError(_)
        ));
    }
}
