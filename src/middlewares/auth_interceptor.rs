//! 호출 단위 인증 판정
//!
//! 전송 계층과 무관하게 "메서드 이름 + authorization 헤더 값"만으로
//! 통과/거부를 결정합니다. 키와 우회 목록은 생성 시 주입되며 이후 변경되지
//! 않으므로 동시 호출에서 잠금 없이 공유됩니다.
//!
//! ```text
//! 호출 ─┬─ 우회 메서드 ───────────────────────────→ Bypassed
//!       └─ 헤더 확인 ─┬─ 없음/형식 오류 ─────────→ Rejected
//!                     └─ 접두사 ─┬─ 알 수 없음 ──→ Rejected (암호 연산 없음)
//!                                └─ 검증 ─┬─ 성공 ─┬─ 액세스 토큰 → Authorized(claims)
//!                                         │        └─ 리프레시 토큰 → Rejected
//!                                         └─ 실패 → Rejected
//! ```
//!
//! 리프레시 토큰(푸터 `typ=refresh`)은 갱신 메서드 본문으로만 쓰이며
//! 보호된 메서드의 자격 증명으로는 받아들이지 않습니다.
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::AuthPolicyConfig;
use crate::domain::models::auth::{AuthState, RejectReason};
use crate::domain::models::token::{TokenFooter, TokenKind};
use crate::errors::AuthError;
use crate::services::auth::{KeyStore, TokenVerifier};
use crate::utils::extract_footer;

/// 자격 증명이 담기는 헤더 이름
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// 베어러 토큰 접두사
pub const BEARER_PREFIX: &str = "Bearer ";

/// 암호 연산 전 1차 판정 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Screening {
    /// 검증 없이 결론이 난 경우 (우회 또는 거부)
    Decided(AuthState),
    /// 토큰 검증이 필요한 경우
    Verify { token: String, kind: TokenKind },
}

pub struct AuthInterceptor {
    verifier: Arc<dyn TokenVerifier>,
    key_store: Arc<KeyStore>,
    public_methods: HashSet<String>,
}

impl AuthInterceptor {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        key_store: Arc<KeyStore>,
        policy: &AuthPolicyConfig,
    ) -> Self {
        Self {
            verifier,
            key_store,
            public_methods: policy.public_methods.iter().cloned().collect(),
        }
    }

    /// 인증 우회 대상 메서드인지 확인합니다
    pub fn is_bypassed(&self, method: &str) -> bool {
        self.public_methods.contains(method)
    }

    /// `Bearer <token>` 헤더 값에서 토큰을 꺼냅니다
    pub fn extract_bearer(authorization: Option<&str>) -> Option<&str> {
        authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// 암호 연산 없이 판정할 수 있는 부분을 처리합니다.
    ///
    /// # Arguments
    ///
    /// * `method` - 전체 메서드 이름 (`package.Service/method`)
    /// * `authorization` - authorization 헤더 값
    pub fn screen(&self, method: &str, authorization: Option<&str>) -> Screening {
        if self.is_bypassed(method) {
            return Screening::Decided(AuthState::Bypassed);
        }

        let Some(token) = Self::extract_bearer(authorization) else {
            return Screening::Decided(AuthState::Rejected(RejectReason::MissingOrInvalidHeader));
        };

        match TokenKind::detect(token) {
            Some(kind) => Screening::Verify {
                token: token.to_string(),
                kind,
            },
            None => Screening::Decided(AuthState::Rejected(RejectReason::InvalidTokenFormat)),
        }
    }

    /// 토큰 종류에 맞는 키로 검증합니다
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthState {
        let result = match kind {
            TokenKind::Local => self.verifier.verify_local(token, self.key_store.symmetric_key()),
            TokenKind::Public => self.verifier.verify_public(token, self.key_store.verifying_key()),
        };

        match result {
            Ok(_) if Self::is_refresh_token(token) => AuthState::Rejected(RejectReason::TokenRejected(
                AuthError::InvalidTokenFormat("리프레시 토큰은 호출 자격 증명으로 쓸 수 없습니다".to_string()),
            )),
            Ok(claims) => AuthState::Authorized(claims),
            Err(err) => AuthState::Rejected(RejectReason::TokenRejected(err)),
        }
    }

    /// 검증이 끝난 토큰의 푸터가 리프레시 토큰을 가리키는지 확인합니다
    fn is_refresh_token(token: &str) -> bool {
        extract_footer(token)
            .ok()
            .filter(|footer| !footer.is_empty())
            .and_then(|footer| serde_json::from_str::<TokenFooter>(&footer).ok())
            .is_some_and(|footer| footer.token_type == TokenFooter::REFRESH)
    }

    /// 한 번의 호출에 대한 전체 판정
    pub fn intercept(&self, method: &str, authorization: Option<&str>) -> AuthState {
        match self.screen(method, authorization) {
            Screening::Decided(state) => state,
            Screening::Verify { token, kind } => self.verify(&token, kind),
        }
    }
}
