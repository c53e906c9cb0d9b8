//! # 토큰 문자열 유틸리티
//!
//! PASETO 토큰 문자열을 다루는 공통 함수들입니다.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::errors::{AuthError, AuthResult};

/// 로그에 남길 때 노출하는 토큰 앞부분 길이 (접두사 제외)
const MASK_VISIBLE_CHARS: usize = 8;

/// 토큰에서 푸터 문자열을 추출합니다.
///
/// 토큰은 `version.purpose.payload[.footer]` 형식이며, 푸터는
/// base64url(패딩 없음)로 인코딩되어 있습니다.
///
/// # Arguments
///
/// * `token` - PASETO 토큰 문자열
///
/// # Returns
///
/// * 디코딩된 푸터 문자열. 푸터가 없거나 비어 있으면 빈 문자열
///
/// # Errors
///
/// * `AuthError::InvalidTokenFormat` - 세그먼트 수가 맞지 않거나,
///   푸터가 base64url/UTF-8로 디코딩되지 않는 경우
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(extract_footer("v4.local.payload")?, "");
/// assert_eq!(extract_footer("v4.local.payload.eyJraWQiOiJrMSJ9")?, r#"{"kid":"k1"}"#);
/// ```
pub fn extract_footer(token: &str) -> AuthResult<String> {
    let segments: Vec<&str> = token.split('.').collect();

    match segments.as_slice() {
        [_, _, _] => Ok(String::new()),
        [_, _, _, ""] => Ok(String::new()),
        [_, _, _, footer] => {
            let bytes = URL_SAFE_NO_PAD
                .decode(footer)
                .map_err(|e| AuthError::InvalidTokenFormat(format!("footer base64 디코딩 실패: {}", e)))?;
            String::from_utf8(bytes)
                .map_err(|_| AuthError::InvalidTokenFormat("footer가 UTF-8이 아닙니다".to_string()))
        }
        _ => Err(AuthError::InvalidTokenFormat(format!(
            "토큰 세그먼트 수가 올바르지 않습니다: {}",
            segments.len()
        ))),
    }
}

/// 로그 출력용으로 토큰을 가립니다.
///
/// `v4.local.` / `v4.public.` 접두사와 본문 앞 몇 글자만 남깁니다.
pub fn mask_token(token: &str) -> String {
    let prefix_len = token
        .match_indices('.')
        .nth(1)
        .map(|(idx, _)| idx + 1)
        .unwrap_or(0);

    let visible: String = token[prefix_len..].chars().take(MASK_VISIBLE_CHARS).collect();
    format!("{}{}...", &token[..prefix_len], visible)
}
