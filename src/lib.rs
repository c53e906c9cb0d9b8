//! PASETO 인증 서비스
//!
//! RPC 서비스 호출자를 위한 베어러 토큰을 발급/검증하고, 들어오는 모든 호출을
//! 토큰으로 인증하는 서비스입니다.
//!
//! # Features
//!
//! - **v4.local 토큰**: 대칭키 인증 암호화 (기밀성 + 무결성)
//! - **v4.public 토큰**: Ed25519 서명 (여러 서비스가 공개키로 검증)
//! - **호출 단위 인증**: 미들웨어가 비즈니스 로직 이전에 통과/거부를 결정
//! - **실패 사유 은닉**: 호출자는 항상 동일한 unauthenticated 응답만 받음
//! - **명시적 구성**: 전역 상태 없이 [`core::ServiceContainer`]에서 생성자 주입
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  AuthMiddleware │ ← 호출마다 AuthInterceptor 판정 적용
//! └─────────────────┘
//!          │ (검증된 클레임 → 요청 확장)
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← login / validateToken / refreshToken / logout
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  AuthService    │ ← 토큰 쌍 발급, 갱신
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  TokenService   │ ← PASETO v4 발급/검증 + 클레임 검사
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    KeyStore     │ ← 읽기 전용 활성 키 (KeyManager로 생성/디코딩)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use paseto_auth_service::services::auth::{TokenRequest, TokenService, KeyManager};
//!
//! let key = KeyManager::generate_symmetric_key();
//! let service = TokenService::new("svc", "api");
//!
//! let token = service.create_local_token(&TokenRequest::new("u1", 900), &key)?;
//! let claims = service.validate_local_token(&token, &key)?;
//! assert_eq!(claims.subject, "u1");
//! ```

pub mod core;
pub mod config;
pub mod domain;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
