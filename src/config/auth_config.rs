//! # Authentication Configuration Module
//!
//! PASETO 토큰의 issuer/audience, 키 재료, TTL, 인증 우회 메서드 목록을
//! 관리하는 모듈입니다. 시작 시 한 번 읽어 값으로 전달되며, 이후에는
//! 읽기 전용으로만 사용됩니다.
//!
//! ## 환경 변수
//!
//! ### 토큰 설정
//! ```bash
//! export PASETO_ISSUER="grpc-chat"
//! export PASETO_AUDIENCE="grpc-chat-api"
//! export PASETO_ACCESS_TOKEN_TTL="900"
//! export PASETO_REFRESH_TOKEN_TTL="604800"
//! ```
//!
//! ### 키 설정
//! ```bash
//! # v4.local 대칭키 (base64, 32바이트)
//! export PASETO_SYMMETRIC_KEY="AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="
//!
//! # v4.public 키 쌍 (base64 PKCS8 / X.509). 둘 다 없으면 키 파일을 사용합니다
//! export PASETO_PRIVATE_KEY="MC4CAQAwBQYDK2VwBCIEI..."
//! export PASETO_PUBLIC_KEY="MCowBQYDK2VwAyEA..."
//!
//! # 키 파일 경로 (없으면 최초 실행 시 생성)
//! export PASETO_PRIVATE_KEY_PATH="./secrets/paseto_ed25519_private.b64"
//! export PASETO_PUBLIC_KEY_PATH="./secrets/paseto_ed25519_public.b64"
//! ```
//!
//! ### 인증 우회 메서드
//! ```bash
//! export AUTH_PUBLIC_METHODS="auth.v1.AuthService/login,auth.v1.AuthService/refreshToken"
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::config::data_config::parse_or_default;
use crate::core::errors::{AppError, AppResult};

pub const DEFAULT_ISSUER: &str = "grpc-chat";
pub const DEFAULT_AUDIENCE: &str = "grpc-chat-api";
pub const DEFAULT_ACCESS_TOKEN_TTL: i64 = 900;
pub const DEFAULT_REFRESH_TOKEN_TTL: i64 = 604_800;
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "./secrets/paseto_ed25519_private.b64";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "./secrets/paseto_ed25519_public.b64";

/// 인증 없이 호출 가능한 기본 메서드 목록
pub const DEFAULT_PUBLIC_METHODS: [&str; 2] = [
    "auth.v1.AuthService/login",
    "auth.v1.AuthService/refreshToken",
];

/// v4.public 키 쌍을 어디서 가져올지
#[derive(Clone, PartialEq, Eq)]
pub enum AsymmetricKeySource {
    /// 환경 변수로 전달된 키 쌍 (base64 PKCS8 / X.509)
    Inline {
        private_key: String,
        public_key: String,
    },
    /// 공개키만 전달됨. 검증만 가능하고 v4.public 발급은 불가능합니다
    VerifyOnly { public_key: String },
    /// 키 파일. 파일이 없으면 생성 후 저장합니다
    Files {
        private_key_path: PathBuf,
        public_key_path: PathBuf,
    },
}

impl fmt::Debug for AsymmetricKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsymmetricKeySource::Inline { .. } => write!(f, "Inline(<redacted>)"),
            AsymmetricKeySource::VerifyOnly { .. } => write!(f, "VerifyOnly(<public key>)"),
            AsymmetricKeySource::Files {
                private_key_path,
                public_key_path,
            } => f
                .debug_struct("Files")
                .field("private_key_path", private_key_path)
                .field("public_key_path", public_key_path)
                .finish(),
        }
    }
}

/// PASETO 토큰 설정
#[derive(Clone)]
pub struct PasetoConfig {
    pub issuer: String,
    pub audience: String,
    /// base64 인코딩된 32바이트 대칭키
    pub symmetric_key: Option<String>,
    pub asymmetric_keys: AsymmetricKeySource,
    /// 푸터 `kid`. 없으면 공개키 지문에서 파생합니다
    pub key_id: Option<String>,
    pub access_token_ttl: i64,
    pub refresh_token_ttl: i64,
}

impl fmt::Debug for PasetoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasetoConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field(
                "symmetric_key",
                &self.symmetric_key.as_ref().map(|_| "<redacted>"),
            )
            .field("asymmetric_keys", &self.asymmetric_keys)
            .field("key_id", &self.key_id)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

impl PasetoConfig {
    /// 주어진 issuer/audience와 기본값으로 설정을 만듭니다 (키 파일 사용)
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            symmetric_key: None,
            asymmetric_keys: AsymmetricKeySource::Files {
                private_key_path: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
                public_key_path: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            },
            key_id: None,
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }

    /// 환경 변수 조회 함수로부터 설정을 읽습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - TTL 파싱 실패, 0 이하 TTL,
    ///   공개키 없이 개인키만 전달된 경우
    pub fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let asymmetric_keys = match (non_empty("PASETO_PRIVATE_KEY"), non_empty("PASETO_PUBLIC_KEY")) {
            (Some(private_key), Some(public_key)) => AsymmetricKeySource::Inline {
                private_key,
                public_key,
            },
            (None, Some(public_key)) => AsymmetricKeySource::VerifyOnly { public_key },
            (Some(_), None) => {
                return Err(AppError::ConfigError(
                    "PASETO_PRIVATE_KEY는 PASETO_PUBLIC_KEY와 함께 설정해야 합니다".to_string(),
                ));
            }
            (None, None) => AsymmetricKeySource::Files {
                private_key_path: non_empty("PASETO_PRIVATE_KEY_PATH")
                    .unwrap_or_else(|| DEFAULT_PRIVATE_KEY_PATH.to_string())
                    .into(),
                public_key_path: non_empty("PASETO_PUBLIC_KEY_PATH")
                    .unwrap_or_else(|| DEFAULT_PUBLIC_KEY_PATH.to_string())
                    .into(),
            },
        };

        let access_token_ttl =
            parse_or_default(lookup, "PASETO_ACCESS_TOKEN_TTL", DEFAULT_ACCESS_TOKEN_TTL)?;
        let refresh_token_ttl =
            parse_or_default(lookup, "PASETO_REFRESH_TOKEN_TTL", DEFAULT_REFRESH_TOKEN_TTL)?;

        if access_token_ttl <= 0 || refresh_token_ttl <= 0 {
            return Err(AppError::ConfigError("토큰 TTL은 양수여야 합니다".to_string()));
        }

        Ok(Self {
            issuer: non_empty("PASETO_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            audience: non_empty("PASETO_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            symmetric_key: non_empty("PASETO_SYMMETRIC_KEY"),
            asymmetric_keys,
            key_id: non_empty("PASETO_KEY_ID"),
            access_token_ttl,
            refresh_token_ttl,
        })
    }
}

/// 인증 인터셉터 정책
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicyConfig {
    /// 인증 없이 통과시키는 전체 메서드 이름 (`package.Service/method`)
    pub public_methods: Vec<String>,
}

impl Default for AuthPolicyConfig {
    fn default() -> Self {
        Self {
            public_methods: DEFAULT_PUBLIC_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl AuthPolicyConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("AUTH_PUBLIC_METHODS") {
            Some(raw) => Self {
                public_methods: raw
                    .split(',')
                    .map(|m| m.trim().trim_start_matches('/').to_string())
                    .filter(|m| !m.is_empty())
                    .collect(),
            },
            None => Self::default(),
        }
    }
}
