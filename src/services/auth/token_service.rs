//! PASETO v4 토큰 발급/검증 서비스
//!
//! `v4.local`(XChaCha20 기반 인증 암호화)과 `v4.public`(Ed25519 서명) 두 종류의
//! 토큰을 발급하고 검증합니다. 암호 연산 자체는 `rusty_paseto`가 담당하며,
//! 이 모듈은 클레임 구성, 푸터/암묵적 단언(implicit assertion) 바인딩,
//! 그리고 검증 순서를 책임집니다.
//!
//! # 검증 순서
//!
//! 1. 접두사 확인 (`InvalidTokenFormat`)
//! 2. 푸터 추출 후 연관 데이터로 바인딩
//! 3. 본문 길이 확인 후 복호화 또는 서명 검증 (`CryptoValidationError`)
//! 4. 클레임 역직렬화 (`MalformedClaims`)
//! 5. issuer → audience → 만료 → nbf (`ClaimsRejected`)

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use rusty_paseto::core::{
    Footer, ImplicitAssertion, Key, Local, Paseto, PasetoAsymmetricPrivateKey,
    PasetoAsymmetricPublicKey, PasetoNonce, PasetoSymmetricKey, Payload, Public, V4,
};

use crate::config::PasetoConfig;
use crate::domain::models::token::{TokenClaims, TokenClaimsBuilder, TokenFooter, TokenKind};
use crate::errors::{AuthError, AuthResult, ClaimsRejection};
use crate::services::auth::key_manager::SymmetricKey;
use crate::utils::extract_footer;

/// 봉인된 본문의 최소 바이트 수
const MIN_SEALED_BODY_LEN: usize = 64;

/// 토큰 발급 요청
///
/// ```rust,ignore
/// let request = TokenRequest::new("u1", 900)
///     .with_roles(vec!["user".into()])
///     .with_footer(TokenFooter::access("key-2024"));
/// let token = token_service.create_local_token(&request, key_store.symmetric_key())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenRequest {
    pub subject: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub ttl_seconds: i64,
    pub footer: Option<TokenFooter>,
    pub implicit_assertion: Option<String>,
}

impl TokenRequest {
    pub fn new(subject: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            subject: subject.into(),
            ttl_seconds,
            ..Self::default()
        }
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_footer(mut self, footer: TokenFooter) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn with_implicit_assertion(mut self, assertion: impl Into<String>) -> Self {
        self.implicit_assertion = Some(assertion.into());
        self
    }
}

/// 토큰 검증 인터페이스
///
/// 인증 인터셉터는 이 트레이트에만 의존합니다.
pub trait TokenVerifier: Send + Sync {
    fn verify_local(&self, token: &str, key: &SymmetricKey) -> AuthResult<TokenClaims>;

    fn verify_public(&self, token: &str, key: &VerifyingKey) -> AuthResult<TokenClaims>;
}

/// PASETO 토큰 서비스
///
/// 기대 issuer/audience만 보유하며 키는 호출마다 인자로 받습니다.
/// 내부 상태가 없으므로 여러 호출에서 동시에 안전하게 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct TokenService {
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn from_config(config: &PasetoConfig) -> Self {
        Self::new(config.issuer.clone(), config.audience.clone())
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// `v4.local` 토큰을 발급합니다.
    ///
    /// # Arguments
    ///
    /// * `request` - subject, 역할/권한, TTL, 선택적 푸터와 암묵적 단언
    /// * `key` - 32바이트 대칭키
    ///
    /// # Returns
    ///
    /// * `v4.local.`로 시작하는 토큰 문자열
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidArgument` - 빈 subject 또는 0 이하 TTL
    /// * `AuthError::TokenIssuanceError` - 직렬화/암호화 실패
    pub fn create_local_token(&self, request: &TokenRequest, key: &SymmetricKey) -> AuthResult<String> {
        let claims = self.build_claims(request)?;
        self.create_local_token_from_claims(
            &claims,
            request.footer.as_ref(),
            request.implicit_assertion.as_deref(),
            key,
        )
    }

    /// `v4.public` 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidArgument` - 빈 subject 또는 0 이하 TTL
    /// * `AuthError::TokenIssuanceError` - 직렬화/서명 실패
    pub fn create_public_token(&self, request: &TokenRequest, key: &SigningKey) -> AuthResult<String> {
        let claims = self.build_claims(request)?;
        self.create_public_token_from_claims(
            &claims,
            request.footer.as_ref(),
            request.implicit_assertion.as_deref(),
            key,
        )
    }

    /// 이미 구성된 클레임으로 `v4.local` 토큰을 만듭니다.
    ///
    /// [`TokenClaimsBuilder`]로 발급 시각이나 nbf를 직접 지정할 때 사용합니다.
    pub fn create_local_token_from_claims(
        &self,
        claims: &TokenClaims,
        footer: Option<&TokenFooter>,
        implicit_assertion: Option<&str>,
        key: &SymmetricKey,
    ) -> AuthResult<String> {
        let payload = encode_json(claims, "클레임")?;
        let footer = footer.map(|f| encode_json(f, "푸터")).transpose()?;

        let token = seal_local(&payload, footer.as_deref(), implicit_assertion, key)?;
        log::debug!("🎫 v4.local 토큰 발급 - subject: {}, jti: {}", claims.subject, claims.token_id);
        Ok(token)
    }

    /// 이미 구성된 클레임으로 `v4.public` 토큰을 만듭니다.
    pub fn create_public_token_from_claims(
        &self,
        claims: &TokenClaims,
        footer: Option<&TokenFooter>,
        implicit_assertion: Option<&str>,
        key: &SigningKey,
    ) -> AuthResult<String> {
        let payload = encode_json(claims, "클레임")?;
        let footer = footer.map(|f| encode_json(f, "푸터")).transpose()?;

        let token = sign_public(&payload, footer.as_deref(), implicit_assertion, key)?;
        log::debug!("🎫 v4.public 토큰 발급 - subject: {}, jti: {}", claims.subject, claims.token_id);
        Ok(token)
    }

    /// `v4.local` 토큰을 검증합니다.
    ///
    /// # Errors
    ///
    /// 모듈 문서의 검증 순서대로 첫 번째 실패를 반환합니다.
    pub fn validate_local_token(&self, token: &str, key: &SymmetricKey) -> AuthResult<TokenClaims> {
        self.validate_local_token_with_assertion(token, key, "")
    }

    /// 발급 때 사용한 암묵적 단언과 함께 `v4.local` 토큰을 검증합니다
    pub fn validate_local_token_with_assertion(
        &self,
        token: &str,
        key: &SymmetricKey,
        implicit_assertion: &str,
    ) -> AuthResult<TokenClaims> {
        self.validate(token, TokenKind::Local, |footer| {
            let paseto_key = PasetoSymmetricKey::<V4, Local>::from(Key::<32>::from(*key.as_bytes()));
            Paseto::<V4, Local>::try_decrypt(
                token,
                &paseto_key,
                Footer::from(footer),
                ImplicitAssertion::from(implicit_assertion),
            )
            .map_err(|e| AuthError::CryptoValidationError(e.to_string()))
        })
    }

    /// `v4.public` 토큰을 검증합니다.
    pub fn validate_public_token(&self, token: &str, key: &VerifyingKey) -> AuthResult<TokenClaims> {
        self.validate_public_token_with_assertion(token, key, "")
    }

    /// 발급 때 사용한 암묵적 단언과 함께 `v4.public` 토큰을 검증합니다
    pub fn validate_public_token_with_assertion(
        &self,
        token: &str,
        key: &VerifyingKey,
        implicit_assertion: &str,
    ) -> AuthResult<TokenClaims> {
        self.validate(token, TokenKind::Public, |footer| {
            let public_key = Key::<32>::from(key.to_bytes());
            let paseto_key = PasetoAsymmetricPublicKey::<V4, Public>::from(&public_key);
            Paseto::<V4, Public>::try_verify(
                token,
                &paseto_key,
                Footer::from(footer),
                ImplicitAssertion::from(implicit_assertion),
            )
            .map_err(|e| AuthError::CryptoValidationError(e.to_string()))
        })
    }

    fn build_claims(&self, request: &TokenRequest) -> AuthResult<TokenClaims> {
        TokenClaimsBuilder::new(&self.issuer, &self.audience)
            .subject(&request.subject)
            .expires_in_seconds(request.ttl_seconds)
            .roles(request.roles.clone())
            .permissions(request.permissions.clone())
            .build()
    }

    fn validate<F>(&self, token: &str, kind: TokenKind, open: F) -> AuthResult<TokenClaims>
    where
        F: FnOnce(&str) -> AuthResult<String>,
    {
        if !token.starts_with(kind.prefix()) {
            return Err(AuthError::InvalidTokenFormat(format!(
                "{} 접두사가 아닙니다",
                kind.prefix()
            )));
        }

        let footer = extract_footer(token)?;
        ensure_sealed_body_len(token, kind)?;
        let payload = open(&footer)?;

        let claims: TokenClaims = serde_json::from_str(&payload)
            .map_err(|e| AuthError::MalformedClaims(e.to_string()))?;
        claims.ensure_well_formed()?;

        self.check_claims(&claims, Utc::now())?;
        Ok(claims)
    }

    /// issuer → audience → 만료 → nbf 순서로 확인합니다
    fn check_claims(&self, claims: &TokenClaims, now: DateTime<Utc>) -> AuthResult<()> {
        if claims.issuer != self.issuer {
            return Err(AuthError::ClaimsRejected(ClaimsRejection::IssuerMismatch {
                expected: self.issuer.clone(),
                actual: claims.issuer.clone(),
            }));
        }
        if claims.audience != self.audience {
            return Err(AuthError::ClaimsRejected(ClaimsRejection::AudienceMismatch {
                expected: self.audience.clone(),
                actual: claims.audience.clone(),
            }));
        }
        if claims.is_expired_at(now) {
            return Err(AuthError::ClaimsRejected(ClaimsRejection::TokenExpired));
        }
        if claims.is_not_yet_valid_at(now) {
            return Err(AuthError::ClaimsRejected(ClaimsRejection::TokenNotYetValid));
        }
        Ok(())
    }
}

impl TokenVerifier for TokenService {
    fn verify_local(&self, token: &str, key: &SymmetricKey) -> AuthResult<TokenClaims> {
        self.validate_local_token(token, key)
    }

    fn verify_public(&self, token: &str, key: &VerifyingKey) -> AuthResult<TokenClaims> {
        self.validate_public_token(token, key)
    }
}

/// 본문(nonce + 암호문 + 태그, 또는 메시지 + 서명)의 최소 길이를 확인합니다.
///
/// `v4.local`은 32바이트 nonce와 32바이트 태그, `v4.public`은 64바이트 서명을
/// 담아야 하므로 둘 다 최소 64바이트입니다. 이보다 짧은 본문은 암호 연산에
/// 넘기지 않습니다.
fn ensure_sealed_body_len(token: &str, kind: TokenKind) -> AuthResult<()> {
    let body = token
        .strip_prefix(kind.prefix())
        .and_then(|rest| rest.split('.').next())
        .unwrap_or_default();

    let decoded = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|e| AuthError::CryptoValidationError(format!("본문 디코딩 실패: {}", e)))?;

    if decoded.len() < MIN_SEALED_BODY_LEN {
        return Err(AuthError::CryptoValidationError(format!(
            "본문이 너무 짧습니다 ({}바이트, 최소 {}바이트)",
            decoded.len(),
            MIN_SEALED_BODY_LEN
        )));
    }
    Ok(())
}

fn encode_json<T: serde::Serialize>(value: &T, what: &str) -> AuthResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AuthError::TokenIssuanceError(format!("{} 직렬화 실패: {}", what, e)))
}

fn seal_local(
    payload: &str,
    footer: Option<&str>,
    implicit_assertion: Option<&str>,
    key: &SymmetricKey,
) -> AuthResult<String> {
    let paseto_key = PasetoSymmetricKey::<V4, Local>::from(Key::<32>::from(*key.as_bytes()));

    let mut nonce_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce_key = Key::<32>::from(nonce_bytes);
    let nonce = PasetoNonce::<V4, Local>::from(&nonce_key);

    let mut builder = Paseto::<V4, Local>::builder();
    builder.set_payload(Payload::from(payload));
    if let Some(footer) = footer {
        builder.set_footer(Footer::from(footer));
    }
    if let Some(assertion) = implicit_assertion {
        builder.set_implicit_assertion(ImplicitAssertion::from(assertion));
    }

    builder
        .try_encrypt(&paseto_key, &nonce)
        .map_err(|e| AuthError::TokenIssuanceError(format!("v4.local 암호화 실패: {}", e)))
}

fn sign_public(
    payload: &str,
    footer: Option<&str>,
    implicit_assertion: Option<&str>,
    key: &SigningKey,
) -> AuthResult<String> {
    let keypair = Key::<64>::from(key.to_keypair_bytes());
    let private_key = PasetoAsymmetricPrivateKey::<V4, Public>::from(&keypair);

    let mut builder = Paseto::<V4, Public>::builder();
    builder.set_payload(Payload::from(payload));
    if let Some(footer) = footer {
        builder.set_footer(Footer::from(footer));
    }
    if let Some(assertion) = implicit_assertion {
        builder.set_implicit_assertion(ImplicitAssertion::from(assertion));
    }

    builder
        .try_sign(&private_key)
        .map_err(|e| AuthError::TokenIssuanceError(format!("v4.public 서명 실패: {}", e)))
}
