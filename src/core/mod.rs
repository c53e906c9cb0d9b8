//! # Core Module
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 구성 루트
//! - **ServiceContainer**: 설정으로부터 전체 서비스 그래프를 생성자 주입으로 조립
//! - 전역 상태나 타입 기반 조회 없음
//!
//! ### [`errors`] - HTTP 경계 에러 처리
//! - **AppError**: 호출자에게 노출되는 에러 타입
//! - **ResponseError**: Actix-Web 응답 자동 변환
//! - **AuthError 변환**: 토큰 검증 실패는 모두 일반 unauthenticated 응답으로 합쳐짐

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
