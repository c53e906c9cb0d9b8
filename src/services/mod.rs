//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 [`crate::core::ServiceContainer`]에서 생성자 주입으로
//! 한 번 만들어지고 `Arc`로 공유됩니다.

pub mod auth;
