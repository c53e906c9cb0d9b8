//! 토큰 인증 실패 분류
//!
//! 키 관리와 토큰 서비스가 반환하는 구체적인 실패 유형입니다.
//! 호출자에게는 절대 그대로 노출되지 않으며, 인터셉터가 하나의
//! "unauthenticated" 결과로 합친 뒤 내부 진단 로그에만 남깁니다.

use std::fmt;

use thiserror::Error;

/// 토큰 인증 서브시스템의 실패 유형
///
/// 검증 단계의 순서(형식 → 암호 → 역직렬화 → 클레임)에 그대로 대응합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// 발급 입력값 오류 (빈 subject, 0 이하 TTL 등)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 키 형식 오류 (잘못된 base64, 32바이트가 아닌 대칭키, 잘못된 PKCS8/X.509)
    #[error("Key format error: {0}")]
    KeyFormatError(String),

    /// 인식할 수 없는 토큰 접두사나 구조
    #[error("Invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// 인증 태그 불일치, 서명 오류, 손상된 암호문
    #[error("Crypto validation error: {0}")]
    CryptoValidationError(String),

    /// 복호화된 페이로드를 클레임으로 해석할 수 없음
    #[error("Malformed claims: {0}")]
    MalformedClaims(String),

    /// issuer/audience/만료/nbf 검사 실패
    #[error("Claims rejected: {0}")]
    ClaimsRejected(ClaimsRejection),

    /// 토큰 발급 중 예기치 못한 실패
    #[error("Token issuance error: {0}")]
    TokenIssuanceError(String),
}

/// 클레임 검증이 거부된 구체적인 사유
///
/// 로그에만 기록되는 값입니다. 실패 사유를 구분할 수 있게 되면
/// 호출자가 "만료"와 "서명 오류"를 구별하는 오라클이 생기기 때문입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsRejection {
    IssuerMismatch { expected: String, actual: String },
    AudienceMismatch { expected: String, actual: String },
    TokenExpired,
    TokenNotYetValid,
}

impl fmt::Display for ClaimsRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimsRejection::IssuerMismatch { .. } => write!(f, "issuer mismatch"),
            ClaimsRejection::AudienceMismatch { .. } => write!(f, "audience mismatch"),
            ClaimsRejection::TokenExpired => write!(f, "token expired"),
            ClaimsRejection::TokenNotYetValid => write!(f, "token not yet valid"),
        }
    }
}

impl AuthError {
    /// 로그용 상세 설명 (기대값/실제값 포함)
    ///
    /// `Display`는 사유만 담고, 이 메서드는 진단에 필요한 값까지 포함합니다.
    pub fn diagnostic(&self) -> String {
        match self {
            AuthError::ClaimsRejected(ClaimsRejection::IssuerMismatch { expected, actual })
            | AuthError::ClaimsRejected(ClaimsRejection::AudienceMismatch { expected, actual }) => {
                format!("{} (expected={}, actual={})", self, expected, actual)
            }
            _ => self.to_string(),
        }
    }

    /// 토큰 검증 단계에서 발생한 실패인지 여부
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidTokenFormat(_)
                | AuthError::CryptoValidationError(_)
                | AuthError::MalformedClaims(_)
                | AuthError::ClaimsRejected(_)
        )
    }
}

/// 인증 서브시스템 전용 Result 별칭
pub type AuthResult<T> = Result<T, AuthError>;
