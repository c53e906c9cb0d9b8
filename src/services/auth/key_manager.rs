//! PASETO 키 생성 및 인코딩
//!
//! 상태가 없는 순수 함수 모음입니다. 대칭키(v4.local)는 32바이트 원시값,
//! 비대칭키(v4.public)는 Ed25519 키 쌍이며 설정 파일이나 환경 변수와는
//! base64 텍스트로 주고받습니다.
//!
//! | 키 | 텍스트 형식 |
//! |----|-------------|
//! | 대칭키 | base64(32바이트) |
//! | 개인키 | base64(PKCS#8 DER) |
//! | 공개키 | base64(X.509 SubjectPublicKeyInfo DER) |
use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::errors::{AuthError, AuthResult};

/// v4.local 대칭키 길이 (바이트)
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// 32바이트 대칭키
///
/// 길이는 타입으로 보장되므로 암호 연산 안에서 길이 오류가 발생하지 않습니다.
/// 외부 입력은 [`SymmetricKey::from_slice`] 또는
/// [`KeyManager::symmetric_key_from_base64`]에서 검사됩니다.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LEN]);

impl SymmetricKey {
    pub const fn new(bytes: [u8; SYMMETRIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// 임의 길이 바이트열에서 키를 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::KeyFormatError` - 길이가 32바이트가 아닌 경우
    pub fn from_slice(bytes: &[u8]) -> AuthResult<Self> {
        let array: [u8; SYMMETRIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            AuthError::KeyFormatError(format!(
                "대칭키는 {}바이트여야 합니다 (입력: {}바이트)",
                SYMMETRIC_KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey(<redacted>)")
    }
}

/// 키 생성/인코딩/디코딩 함수 모음
pub struct KeyManager;

impl KeyManager {
    /// 암호학적으로 안전한 난수로 대칭키를 생성합니다
    pub fn generate_symmetric_key() -> SymmetricKey {
        let mut bytes = [0u8; SYMMETRIC_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        SymmetricKey(bytes)
    }

    /// Ed25519 키 쌍을 생성합니다
    pub fn generate_asymmetric_key_pair() -> SigningKey {
        SigningKey::generate(&mut OsRng)
    }

    pub fn symmetric_key_to_base64(key: &SymmetricKey) -> String {
        STANDARD.encode(key.as_bytes())
    }

    /// base64 텍스트에서 대칭키를 복원합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::KeyFormatError` - base64 디코딩 실패 또는 32바이트가 아닌 경우
    pub fn symmetric_key_from_base64(encoded: &str) -> AuthResult<SymmetricKey> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::KeyFormatError(format!("대칭키 base64 디코딩 실패: {}", e)))?;
        SymmetricKey::from_slice(&bytes)
    }

    /// 개인키를 base64(PKCS#8 DER)로 인코딩합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::KeyFormatError` - PKCS#8 인코딩 실패
    pub fn private_key_to_base64(key: &SigningKey) -> AuthResult<String> {
        let document = key
            .to_pkcs8_der()
            .map_err(|e| AuthError::KeyFormatError(format!("개인키 PKCS#8 인코딩 실패: {}", e)))?;
        Ok(STANDARD.encode(document.as_bytes()))
    }

    /// 공개키를 base64(X.509 DER)로 인코딩합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::KeyFormatError` - X.509 인코딩 실패
    pub fn public_key_to_base64(key: &VerifyingKey) -> AuthResult<String> {
        let document = key
            .to_public_key_der()
            .map_err(|e| AuthError::KeyFormatError(format!("공개키 X.509 인코딩 실패: {}", e)))?;
        Ok(STANDARD.encode(document.as_bytes()))
    }

    /// base64(X.509 DER) 텍스트에서 공개키를 복원합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::KeyFormatError` - base64 또는 X.509 형식 오류
    pub fn public_key_from_base64(encoded: &str) -> AuthResult<VerifyingKey> {
        let der = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::KeyFormatError(format!("공개키 base64 디코딩 실패: {}", e)))?;
        VerifyingKey::from_public_key_der(&der)
            .map_err(|e| AuthError::KeyFormatError(format!("공개키 X.509 파싱 실패: {}", e)))
    }

    /// base64 텍스트 쌍에서 키 쌍을 복원합니다.
    ///
    /// 공개키가 개인키에서 파생된 값과 다르면 거부합니다. 서로 다른 쌍이
    /// 섞이면 발급된 토큰이 검증되지 않기 때문입니다.
    ///
    /// # Arguments
    ///
    /// * `private_key` - base64(PKCS#8 DER) 개인키
    /// * `public_key` - base64(X.509 DER) 공개키
    ///
    /// # Errors
    ///
    /// * `AuthError::KeyFormatError` - 형식 오류 또는 키 쌍 불일치
    pub fn key_pair_from_base64(private_key: &str, public_key: &str) -> AuthResult<SigningKey> {
        let der = STANDARD
            .decode(private_key.trim())
            .map_err(|e| AuthError::KeyFormatError(format!("개인키 base64 디코딩 실패: {}", e)))?;
        let signing_key = SigningKey::from_pkcs8_der(&der)
            .map_err(|e| AuthError::KeyFormatError(format!("개인키 PKCS#8 파싱 실패: {}", e)))?;

        let verifying_key = Self::public_key_from_base64(public_key)?;
        if signing_key.verifying_key() != verifying_key {
            return Err(AuthError::KeyFormatError(
                "공개키가 개인키와 짝이 맞지 않습니다".to_string(),
            ));
        }

        Ok(signing_key)
    }
}
