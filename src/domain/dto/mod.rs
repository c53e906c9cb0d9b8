//! 데이터 전송 객체 (DTO)
//!
//! `auth.v1.AuthService` RPC의 요청/응답 본문입니다.

pub mod tokens;

pub use tokens::*;
