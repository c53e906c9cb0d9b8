//! `auth.v1.AuthService` 비즈니스 로직
//!
//! 로그인(토큰 쌍 발급), 토큰 검증, 토큰 갱신, 로그아웃을 담당합니다.
//! 자격 증명 확인은 [`CredentialVerifier`]에 위임하며 사용자 저장소는
//! 이 서비스의 관심사가 아닙니다.
use std::sync::Arc;

use crate::config::PasetoConfig;
use crate::domain::models::token::{TokenClaims, TokenFooter, TokenKind, TokenPair};
use crate::errors::{AuthError, AuthResult};
use crate::services::auth::key_store::KeyStore;
use crate::services::auth::token_service::{TokenRequest, TokenService};
use crate::utils::{extract_footer, mask_token};

/// 자격 증명 확인 결과로 얻는 주체 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl Principal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }
}

/// 외부 사용자 저장소와의 경계
pub trait CredentialVerifier: Send + Sync {
    /// 사용자명/비밀번호를 확인하고 주체 정보를 반환합니다
    fn verify(&self, username: &str, password: &str) -> AuthResult<Principal>;

    /// 토큰 갱신 시 subject의 현재 역할/권한을 다시 조회합니다
    fn resolve(&self, subject: &str) -> AuthResult<Principal>;
}

/// 비어 있지 않은 자격 증명을 모두 받아들이는 검증기
///
/// 사용자명이 그대로 subject가 되고 역할/권한은 비어 있습니다.
/// 실제 사용자 저장소가 연결되기 전까지의 기본 구현입니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughCredentialVerifier;

impl CredentialVerifier for PassthroughCredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> AuthResult<Principal> {
        if username.trim().is_empty() {
            return Err(AuthError::InvalidArgument("username required".to_string()));
        }
        if password.trim().is_empty() {
            return Err(AuthError::InvalidArgument("password required".to_string()));
        }
        Ok(Principal::new(username.trim()))
    }

    fn resolve(&self, subject: &str) -> AuthResult<Principal> {
        Ok(Principal::new(subject))
    }
}

/// 인증 RPC 서비스
pub struct AuthService {
    token_service: Arc<TokenService>,
    key_store: Arc<KeyStore>,
    credentials: Arc<dyn CredentialVerifier>,
    access_token_ttl: i64,
    refresh_token_ttl: i64,
}

impl AuthService {
    pub fn new(
        token_service: Arc<TokenService>,
        key_store: Arc<KeyStore>,
        credentials: Arc<dyn CredentialVerifier>,
        config: &PasetoConfig,
    ) -> Self {
        Self {
            token_service,
            key_store,
            credentials,
            access_token_ttl: config.access_token_ttl,
            refresh_token_ttl: config.refresh_token_ttl,
        }
    }

    /// 자격 증명을 확인하고 토큰 쌍을 발급합니다.
    ///
    /// # Arguments
    ///
    /// * `username`, `password` - 비어 있으면 안 되는 자격 증명
    /// * `kind` - 발급할 토큰 종류
    ///
    /// # Returns
    ///
    /// * 액세스 토큰(역할/권한 포함, 푸터 `typ=access`)과
    ///   리프레시 토큰(신원만, 푸터 `typ=refresh`)
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidArgument` - 빈 자격 증명
    /// * `AuthError::TokenIssuanceError` - 발급 실패 (검증 전용 키로 PUBLIC 요청 포함)
    pub fn login(&self, username: &str, password: &str, kind: TokenKind) -> AuthResult<TokenPair> {
        let principal = self.credentials.verify(username, password)?;
        log::info!("🔐 로그인 - subject: {}, 토큰 종류: {:?}", principal.subject, kind);

        self.issue_pair(&principal, kind)
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// 접두사로 종류를 판별합니다. 실패 사유는 로그에만 남습니다.
    pub fn validate_token(&self, token: &str) -> Option<TokenClaims> {
        match self.validate_any(token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                log::warn!("⚠️ 토큰 검증 실패 ({}): {}", mask_token(token), err.diagnostic());
                None
            }
        }
    }

    /// 리프레시 토큰으로 같은 종류의 새 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * 검증 실패 전체 - 호출 경계에서 unauthenticated로 합쳐집니다
    /// * `AuthError::InvalidTokenFormat` - 푸터 `typ`이 `refresh`가 아닌 토큰
    pub fn refresh_token(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.validate_any(refresh_token)?;

        // 푸터는 검증이 끝난 뒤에만 읽습니다 (연관 데이터로 이미 인증됨)
        let footer = extract_footer(refresh_token)?;
        let footer: TokenFooter = serde_json::from_str(&footer)
            .map_err(|_| AuthError::InvalidTokenFormat("리프레시 토큰 푸터가 없습니다".to_string()))?;
        if footer.token_type != TokenFooter::REFRESH {
            return Err(AuthError::InvalidTokenFormat(format!(
                "리프레시 토큰이 아닙니다 (typ={})",
                footer.token_type
            )));
        }

        let kind = TokenKind::detect(refresh_token)
            .ok_or_else(|| AuthError::InvalidTokenFormat("알 수 없는 토큰 접두사".to_string()))?;
        let principal = self.credentials.resolve(&claims.subject)?;
        log::info!("🔄 토큰 갱신 - subject: {}", principal.subject);

        self.issue_pair(&principal, kind)
    }

    /// 로그아웃 처리
    ///
    /// 토큰은 상태 없이 검증되므로 서버에 폐기할 세션이 없습니다.
    /// 액세스 토큰은 만료될 때까지 유효합니다.
    pub fn logout(&self, claims: &TokenClaims) {
        log::info!("👋 로그아웃 - subject: {}, jti: {}", claims.subject, claims.token_id);
    }

    fn validate_any(&self, token: &str) -> AuthResult<TokenClaims> {
        match TokenKind::detect(token) {
            Some(TokenKind::Local) => self
                .token_service
                .validate_local_token(token, self.key_store.symmetric_key()),
            Some(TokenKind::Public) => self
                .token_service
                .validate_public_token(token, self.key_store.verifying_key()),
            None => Err(AuthError::InvalidTokenFormat("알 수 없는 토큰 접두사".to_string())),
        }
    }

    fn issue_pair(&self, principal: &Principal, kind: TokenKind) -> AuthResult<TokenPair> {
        let key_id = self.key_store.key_id();

        let access = TokenRequest::new(&principal.subject, self.access_token_ttl)
            .with_roles(principal.roles.clone())
            .with_permissions(principal.permissions.clone())
            .with_footer(TokenFooter::access(key_id));
        let refresh = TokenRequest::new(&principal.subject, self.refresh_token_ttl)
            .with_footer(TokenFooter::refresh(key_id));

        let (access_token, refresh_token) = match kind {
            TokenKind::Local => {
                let key = self.key_store.symmetric_key();
                (
                    self.token_service.create_local_token(&access, key)?,
                    self.token_service.create_local_token(&refresh, key)?,
                )
            }
            TokenKind::Public => {
                let key = self.key_store.signing_key()?;
                (
                    self.token_service.create_public_token(&access, key)?,
                    self.token_service.create_public_token(&refresh, key)?,
                )
            }
        };

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_ttl,
            token_type: kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::key_manager::{KeyManager, SymmetricKey};

    struct FixedRoles;

    impl CredentialVerifier for FixedRoles {
        fn verify(&self, username: &str, _password: &str) -> AuthResult<Principal> {
            self.resolve(username)
        }

        fn resolve(&self, subject: &str) -> AuthResult<Principal> {
            Ok(Principal {
                subject: subject.to_string(),
                roles: vec!["user".to_string()],
                permissions: vec!["chat:write".to_string()],
            })
        }
    }

    fn auth_service_with(credentials: Arc<dyn CredentialVerifier>, can_sign: bool) -> AuthService {
        let signing_key = KeyManager::generate_asymmetric_key_pair();
        let symmetric = SymmetricKey::new([9u8; 32]);
        let key_store = if can_sign {
            KeyStore::new(symmetric, signing_key, Some("k1".to_string()))
        } else {
            KeyStore::verify_only(symmetric, signing_key.verifying_key(), Some("k1".to_string()))
        };

        AuthService::new(
            Arc::new(TokenService::new("svc", "api")),
            Arc::new(key_store),
            credentials,
            &PasetoConfig::new("svc", "api"),
        )
    }

    fn auth_service() -> AuthService {
        auth_service_with(Arc::new(PassthroughCredentialVerifier), true)
    }

    #[test]
    fn test_login_issues_local_pair() {
        let service = auth_service();
        let pair = service.login("alice", "pw", TokenKind::Local).unwrap();

        assert!(pair.access_token.starts_with("v4.local."));
        assert!(pair.refresh_token.starts_with("v4.local."));
        assert_eq!(pair.expires_in, 900);
        assert_eq!(pair.token_type, TokenKind::Local);

        let claims = service.validate_token(&pair.access_token).unwrap();
        assert_eq!(claims.subject, "alice");
    }

    #[test]
    fn test_login_issues_public_pair_with_typed_footers() {
        let service = auth_service();
        let pair = service.login("alice", "pw", TokenKind::Public).unwrap();

        assert!(pair.access_token.starts_with("v4.public."));
        let access_footer: TokenFooter =
            serde_json::from_str(&extract_footer(&pair.access_token).unwrap()).unwrap();
        let refresh_footer: TokenFooter =
            serde_json::from_str(&extract_footer(&pair.refresh_token).unwrap()).unwrap();

        assert_eq!(access_footer.token_type, "access");
        assert_eq!(access_footer.key_id, "k1");
        assert_eq!(refresh_footer.token_type, "refresh");
    }

    #[test]
    fn test_refresh_token_carries_identity_only() {
        let service = auth_service_with(Arc::new(FixedRoles), true);
        let pair = service.login("bob", "pw", TokenKind::Local).unwrap();

        let access = service.validate_token(&pair.access_token).unwrap();
        let refresh = service.validate_token(&pair.refresh_token).unwrap();

        assert_eq!(access.roles, vec!["user".to_string()]);
        assert!(refresh.roles.is_empty());
        assert!(refresh.permissions.is_empty());
        assert_eq!((refresh.expiration - refresh.issued_at).num_seconds(), 604_800);
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let service = auth_service();

        assert!(matches!(
            service.login("", "pw", TokenKind::Local),
            Err(AuthError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.login("alice", " ", TokenKind::Local),
            Err(AuthError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_public_login_on_verify_only_store_fails() {
        let service = auth_service_with(Arc::new(PassthroughCredentialVerifier), false);

        assert!(service.login("alice", "pw", TokenKind::Local).is_ok());
        assert!(matches!(
            service.login("alice", "pw", TokenKind::Public),
            Err(AuthError::TokenIssuanceError(_))
        ));
    }

    #[test]
    fn test_refresh_keeps_kind_and_subject() {
        let service = auth_service_with(Arc::new(FixedRoles), true);
        let pair = service.login("carol", "pw", TokenKind::Public).unwrap();

        let refreshed = service.refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refreshed.token_type, TokenKind::Public);

        let claims = service.validate_token(&refreshed.access_token).unwrap();
        assert_eq!(claims.subject, "carol");
        assert_eq!(claims.roles, vec!["user".to_string()]);
    }

    #[test]
    fn test_access_token_cannot_refresh() {
        let service = auth_service();
        let pair = service.login("alice", "pw", TokenKind::Local).unwrap();

        assert!(matches!(
            service.refresh_token(&pair.access_token),
            Err(AuthError::InvalidTokenFormat(_))
        ));
    }

    #[test]
    fn test_validate_garbage_is_none() {
        let service = auth_service();

        assert!(service.validate_token("garbage").is_none());
        assert!(service.validate_token("v4.local.AAAA").is_none());
        assert!(service.validate_token("v4.public.AAAA").is_none());
    }

    #[test]
    fn test_truncated_refresh_token_is_rejected() {
        let service = auth_service();

        assert!(matches!(
            service.refresh_token("v4.local.AAAA"),
            Err(AuthError::CryptoValidationError(_))
        ));
    }
}
