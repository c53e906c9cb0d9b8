//! 인증 및 보안 서비스 모듈
//!
//! PASETO v4 토큰 기반 인증을 담당하는 서비스들을 제공합니다.
//!
//! # Modules
//!
//! - [`key_manager`] - 키 생성/인코딩 (상태 없음)
//! - [`key_store`] - 시작 시 구성되는 읽기 전용 활성 키
//! - [`token_service`] - 토큰 발급과 검증
//! - [`auth_service`] - 로그인, 검증, 갱신, 로그아웃 RPC
//!
//! # Examples
//!
//! ```rust,ignore
//! let token_service = TokenService::new("svc", "api");
//! let token = token_service.create_local_token(
//!     &TokenRequest::new("u1", 900),
//!     key_store.symmetric_key(),
//! )?;
//! let claims = token_service.validate_local_token(&token, key_store.symmetric_key())?;
//! ```

pub mod auth_service;
pub mod key_manager;
pub mod key_store;
pub mod token_service;

pub use auth_service::*;
pub use key_manager::*;
pub use key_store::*;
pub use token_service::*;
