//! # Domain Models Module
//!
//! 토큰 클레임, 푸터, 호출 단위 인증 결과 같은 값 객체를 정의합니다.
//! 모두 불변 값으로 취급되며 저장소에 영속화되지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`token`] - 클레임, 푸터, 토큰 종류, 클레임 빌더
//! - [`auth`] - 인증 판정과 요청 컨텍스트의 클레임 접근

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;
