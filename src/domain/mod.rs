//! # Domain Layer
//!
//! 토큰 인증의 값 객체([`models`])와 RPC 전송 객체([`dto`])를 정의합니다.

pub mod dto;
pub mod models;

pub use dto::*;
pub use models::*;
