//! HTTP 핸들러 모듈
//!
//! - [`auth`] - `auth.v1.AuthService` RPC (login, validateToken, refreshToken, logout)

pub mod auth;
