//! 서버 및 실행 환경 설정 관리 모듈
//!
//! 바인딩 주소, Rate Limiting, 실행 환경(Profile) 관련 설정을 관리합니다.

use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 개발/테스트 환경에서만 임시 키 생성 같은 편의 기능을 허용합니다
    pub fn allows_ephemeral_keys(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

/// HTTP 서버 바인딩 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or_default(lookup, "PORT", 8080u16)?;

        Ok(Self { host, port })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rate Limiting 설정
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            per_second: parse_or_default(lookup, "RATE_LIMIT_PER_SECOND", 100u64)?,
            burst_size: parse_or_default(lookup, "RATE_LIMIT_BURST_SIZE", 200u32)?,
        })
    }
}

/// 환경 변수 값을 파싱하고, 없으면 기본값을 사용합니다.
///
/// 값이 존재하지만 파싱에 실패하면 조용히 기본값으로 넘어가지 않고
/// `ConfigError`를 반환합니다.
pub(crate) fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("{} 파싱 실패 ({}): {}", key, raw, e))),
        None => Ok(default),
    }
}
