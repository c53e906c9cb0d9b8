//! 인증 에러 분류 모듈

pub mod errors;

pub use errors::*;
