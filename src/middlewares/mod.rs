//! # Middlewares
//!
//! - [`auth_interceptor`] - 메서드 이름과 헤더로 통과/거부를 결정하는 판정기
//! - [`auth_middleware`] - 판정을 ActixWeb 파이프라인에 적용하는 미들웨어

pub mod auth_interceptor;
pub mod auth_middleware;
mod auth_inner;

pub use auth_interceptor::{AuthInterceptor, Screening, AUTHORIZATION_HEADER, BEARER_PREFIX};
pub use auth_middleware::AuthMiddleware;
