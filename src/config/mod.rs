//! # Configuration Module
//!
//! 서비스 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값을 시작 시 한 번 읽어 [`AppConfig`] 값으로 만들고,
//! 이후에는 생성자 주입으로만 전달합니다. 전역 상태는 두지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, Rate Limiting, 실행 환경 설정
//! - [`auth_config`] - PASETO 키/TTL, 인증 우회 메서드 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! println!("issuer = {}", config.paseto.issuer);
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;

use crate::core::errors::AppResult;

/// 애플리케이션 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub paseto: PasetoConfig,
    pub auth_policy: AuthPolicyConfig,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정을 읽습니다
    pub fn from_env() -> AppResult<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        Self::from_lookup(&lookup)
    }

    /// 임의의 조회 함수로부터 설정을 읽습니다 (테스트용 주입 지점)
    pub fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|name| Environment::from_name(&name))
            .unwrap_or(Environment::Production);

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(lookup)?,
            rate_limit: RateLimitConfig::from_lookup(lookup)?,
            paseto: PasetoConfig::from_lookup(lookup)?,
            auth_policy: AuthPolicyConfig::from_lookup(lookup),
        })
    }
}
