//! 호출 단위 인증 결과
use std::fmt;

use crate::domain::models::token::TokenClaims;
use crate::errors::AuthError;

/// 인터셉터가 한 번의 호출에 대해 내린 판정
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// 인증 우회 대상 메서드. 자격 증명을 확인하지 않고 통과
    Bypassed,
    /// 검증된 클레임과 함께 통과
    Authorized(TokenClaims),
    /// 거부. 사유는 로그에만 남고 호출자는 일반 오류만 받습니다
    Rejected(RejectReason),
}

impl AuthState {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, AuthState::Rejected(_))
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            AuthState::Authorized(claims) => Some(claims),
            _ => None,
        }
    }
}

/// 거부 사유 (내부 진단용)
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// 헤더가 없거나 `Bearer ` 형식이 아님
    MissingOrInvalidHeader,
    /// 알려진 PASETO 접두사가 아님. 암호 연산 전에 거부됨
    InvalidTokenFormat,
    /// 토큰 서비스 검증 실패
    TokenRejected(AuthError),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingOrInvalidHeader => write!(f, "missing/invalid authorization header"),
            RejectReason::InvalidTokenFormat => write!(f, "invalid token format"),
            RejectReason::TokenRejected(err) => write!(f, "{}", err.diagnostic()),
        }
    }
}
