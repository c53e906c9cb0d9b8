//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 토큰 푸터 추출, 로그용 토큰 마스킹

pub mod string_utils;

pub use string_utils::*;
