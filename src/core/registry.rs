//! # Service Container - 명시적 구성 루트
//!
//! 애플리케이션의 객체 그래프를 한 곳에서 조립합니다. 타입 기반 동적 조회나
//! 전역 싱글톤 없이, 설정 값 하나로부터 모든 서비스를 생성자 주입으로
//! 만들고 `Arc`로 공유합니다.
//!
//! ```text
//! AppConfig
//!   ├─ KeyStore ──────────────┬──────────────┐
//!   ├─ TokenService ──────────┤              │
//!   │                         ▼              ▼
//!   ├─ AuthService(TokenService, KeyStore, CredentialVerifier)
//!   └─ AuthInterceptor(TokenService, KeyStore, AuthPolicyConfig)
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let container = ServiceContainer::build(config)?;
//!
//! HttpServer::new(move || {
//!     App::new().configure(|cfg| configure_all_routes(cfg, &container))
//! })
//! ```

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::errors::AppResult;
use crate::middlewares::AuthInterceptor;
use crate::services::auth::{
    AuthService, CredentialVerifier, KeyStore, PassthroughCredentialVerifier, TokenService,
};

/// 조립된 서비스 묶음
///
/// 모든 필드는 생성 이후 읽기 전용이며, 워커 스레드마다 `Clone`해서
/// 사용합니다 (`Arc` 복제만 일어납니다).
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<AppConfig>,
    pub key_store: Arc<KeyStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub auth_interceptor: Arc<AuthInterceptor>,
}

impl ServiceContainer {
    /// 기본 자격 증명 검증기로 컨테이너를 조립합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 키 구성 실패
    pub fn build(config: AppConfig) -> AppResult<Self> {
        Self::build_with(config, Arc::new(PassthroughCredentialVerifier))
    }

    /// 지정한 자격 증명 검증기로 컨테이너를 조립합니다
    pub fn build_with(config: AppConfig, credentials: Arc<dyn CredentialVerifier>) -> AppResult<Self> {
        let key_store = Arc::new(KeyStore::from_config(&config.paseto, config.environment)?);
        Ok(Self::assemble(config, key_store, credentials))
    }

    /// 이미 준비된 키 저장소로 컨테이너를 조립합니다 (키 파일 없이 테스트할 때 사용)
    pub fn with_key_store(
        config: AppConfig,
        key_store: Arc<KeyStore>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self::assemble(config, key_store, credentials)
    }

    fn assemble(
        config: AppConfig,
        key_store: Arc<KeyStore>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let token_service = Arc::new(TokenService::from_config(&config.paseto));

        let auth_service = Arc::new(AuthService::new(
            token_service.clone(),
            key_store.clone(),
            credentials,
            &config.paseto,
        ));

        let auth_interceptor = Arc::new(AuthInterceptor::new(
            token_service.clone(),
            key_store.clone(),
            &config.auth_policy,
        ));

        log::info!(
            "🧩 서비스 조립 완료 (issuer={}, audience={}, 우회 메서드 {}개)",
            config.paseto.issuer,
            config.paseto.audience,
            config.auth_policy.public_methods.len()
        );

        Self {
            config: Arc::new(config),
            key_store,
            token_service,
            auth_service,
            auth_interceptor,
        }
    }
}
