//! 호출 컨텍스트에 저장된 검증 클레임 접근
//!
//! 인증 미들웨어는 토큰 검증에 성공하면 [`VerifiedClaims`]를 요청 확장
//! (request extensions)에 넣습니다. 이 값은 해당 호출에만 속하며,
//! 핸들러는 추출자나 헬퍼 함수로 읽습니다.
use std::future::{ready, Ready};
use std::ops::Deref;
use std::sync::Arc;

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};

use crate::core::errors::AppError;
use crate::domain::models::token::TokenClaims;

/// 요청 확장에 저장되는 검증된 클레임
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub Arc<TokenClaims>);

/// 현재 호출의 검증된 클레임을 반환합니다 (없으면 `None`)
pub fn current_claims(req: &HttpRequest) -> Option<Arc<TokenClaims>> {
    req.extensions().get::<VerifiedClaims>().map(|c| c.0.clone())
}

/// 현재 호출의 검증된 클레임을 반환합니다.
///
/// # Errors
///
/// * `AppError::AuthenticationError` - 인증되지 않은 호출 (우회 메서드 포함)
pub fn require_claims(req: &HttpRequest) -> Result<Arc<TokenClaims>, AppError> {
    current_claims(req).ok_or_else(AppError::unauthenticated)
}

/// 인증 필수 추출자
///
/// ```rust,ignore
/// #[post("/me")]
/// async fn me(claims: AuthenticatedClaims) -> impl Responder {
///     HttpResponse::Ok().json(&claims.subject)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedClaims(pub Arc<TokenClaims>);

impl Deref for AuthenticatedClaims {
    type Target = TokenClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedClaims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(require_claims(req).map(AuthenticatedClaims).map_err(Error::from))
    }
}

/// 선택적 클레임 추출자
#[derive(Debug, Clone)]
pub struct OptionalClaims(pub Option<Arc<TokenClaims>>);

impl FromRequest for OptionalClaims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(OptionalClaims(current_claims(req))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::token::TokenClaimsBuilder;
    use actix_web::test::TestRequest;

    #[test]
    fn test_claims_absent_by_default() {
        let req = TestRequest::default().to_http_request();

        assert!(current_claims(&req).is_none());
        assert!(matches!(
            require_claims(&req),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_claims_visible_after_insert() {
        let claims = TokenClaimsBuilder::new("svc", "api")
            .subject("u1")
            .build()
            .unwrap();
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(VerifiedClaims(Arc::new(claims)));

        let found = require_claims(&req).unwrap();
        assert_eq!(found.subject, "u1");
    }
}
