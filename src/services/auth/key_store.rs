//! 활성 키 저장소
//!
//! 시작 시 한 번 구성되어 토큰 서비스와 인증 인터셉터에 `Arc`로 공유되는
//! 읽기 전용 값입니다. 구성 이후에는 아무도 키를 변경하지 않으므로
//! 동시 호출 사이에 잠금이 필요하지 않습니다.
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use ed25519_dalek::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::config::{AsymmetricKeySource, Environment, PasetoConfig};
use crate::core::errors::{AppError, AppResult};
use crate::errors::{AuthError, AuthResult};
use crate::services::auth::key_manager::{KeyManager, SymmetricKey};

/// 한 쌍의 활성 키 (대칭키 + Ed25519)
pub struct KeyStore {
    symmetric_key: SymmetricKey,
    /// 검증 전용 저장소에서는 `None`
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
    key_id: String,
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("key_id", &self.key_id)
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}

impl KeyStore {
    /// 서명 가능한 키 저장소를 만듭니다.
    ///
    /// `key_id`가 없으면 공개키 지문에서 파생합니다.
    pub fn new(symmetric_key: SymmetricKey, signing_key: SigningKey, key_id: Option<String>) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            symmetric_key,
            key_id: key_id.unwrap_or_else(|| fingerprint(&verifying_key)),
            signing_key: Some(signing_key),
            verifying_key,
        }
    }

    /// 공개키만 가진 검증 전용 저장소를 만듭니다.
    pub fn verify_only(
        symmetric_key: SymmetricKey,
        verifying_key: VerifyingKey,
        key_id: Option<String>,
    ) -> Self {
        Self {
            symmetric_key,
            key_id: key_id.unwrap_or_else(|| fingerprint(&verifying_key)),
            signing_key: None,
            verifying_key,
        }
    }

    /// 설정으로부터 키 저장소를 구성합니다.
    ///
    /// # Arguments
    ///
    /// * `config` - PASETO 설정
    /// * `environment` - 실행 환경 (대칭키 임시 생성 허용 여부 결정)
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 키 형식 오류, 운영 환경에서 대칭키 누락,
    ///   키 파일 읽기/쓰기 실패
    pub fn from_config(config: &PasetoConfig, environment: Environment) -> AppResult<Self> {
        let symmetric_key = match &config.symmetric_key {
            Some(encoded) => KeyManager::symmetric_key_from_base64(encoded)?,
            None if environment.allows_ephemeral_keys() => {
                log::warn!("⚠️ PASETO_SYMMETRIC_KEY가 없어 임시 대칭키를 생성합니다. 재시작하면 기존 v4.local 토큰은 무효가 됩니다");
                KeyManager::generate_symmetric_key()
            }
            None => {
                return Err(AppError::ConfigError(
                    "PASETO_SYMMETRIC_KEY가 설정되지 않았습니다".to_string(),
                ));
            }
        };

        let store = match &config.asymmetric_keys {
            AsymmetricKeySource::Inline {
                private_key,
                public_key,
            } => {
                let signing_key = KeyManager::key_pair_from_base64(private_key, public_key)?;
                Self::new(symmetric_key, signing_key, config.key_id.clone())
            }
            AsymmetricKeySource::VerifyOnly { public_key } => {
                log::warn!("⚠️ 공개키만 설정되어 v4.public 토큰은 검증만 가능합니다");
                let verifying_key = KeyManager::public_key_from_base64(public_key)?;
                Self::verify_only(symmetric_key, verifying_key, config.key_id.clone())
            }
            AsymmetricKeySource::Files {
                private_key_path,
                public_key_path,
            } => {
                let signing_key = load_or_generate_key_files(private_key_path, public_key_path)?;
                Self::new(symmetric_key, signing_key, config.key_id.clone())
            }
        };

        log::info!("🔑 키 저장소 준비 완료 (kid={}, 서명 가능={})", store.key_id, store.can_sign());
        Ok(store)
    }

    pub fn symmetric_key(&self) -> &SymmetricKey {
        &self.symmetric_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// 서명 키를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::TokenIssuanceError` - 검증 전용 저장소인 경우
    pub fn signing_key(&self) -> AuthResult<&SigningKey> {
        self.signing_key.as_ref().ok_or_else(|| {
            AuthError::TokenIssuanceError("개인키가 없어 v4.public 토큰을 발급할 수 없습니다".to_string())
        })
    }

    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    /// 푸터 `kid`로 사용되는 키 식별자
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

/// 공개키의 SHA-256 지문 앞 8바이트로 키 식별자를 만듭니다
fn fingerprint(verifying_key: &VerifyingKey) -> String {
    let digest = Sha256::digest(verifying_key.as_bytes());
    let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
    format!("ed25519-{}", hex)
}

/// 키 파일에서 키 쌍을 읽고, 없으면 생성해서 저장합니다.
fn load_or_generate_key_files(private_key_path: &Path, public_key_path: &Path) -> AppResult<SigningKey> {
    if !private_key_path.exists() || !public_key_path.exists() {
        log::info!("🔑 PASETO 키 파일이 없습니다. 새 Ed25519 키 쌍을 생성합니다...");
        let signing_key = KeyManager::generate_asymmetric_key_pair();
        write_key_files(&signing_key, private_key_path, public_key_path)?;
        log::info!("✅ PASETO Ed25519 키 쌍 생성 완료");
        return Ok(signing_key);
    }

    log::info!("🔑 기존 PASETO 키 파일을 불러옵니다");
    let private_b64 = fs::read_to_string(private_key_path).map_err(|e| {
        AppError::ConfigError(format!("개인키 파일 읽기 실패 '{}': {}", private_key_path.display(), e))
    })?;
    let public_b64 = fs::read_to_string(public_key_path).map_err(|e| {
        AppError::ConfigError(format!("공개키 파일 읽기 실패 '{}': {}", public_key_path.display(), e))
    })?;

    Ok(KeyManager::key_pair_from_base64(&private_b64, &public_b64)?)
}

fn write_key_files(signing_key: &SigningKey, private_key_path: &Path, public_key_path: &Path) -> AppResult<()> {
    let io_error = |path: &Path, e: std::io::Error| {
        AppError::ConfigError(format!("키 파일 저장 실패 '{}': {}", path.display(), e))
    };

    for path in [private_key_path, public_key_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }

    let private_b64 = KeyManager::private_key_to_base64(signing_key)?;
    let public_b64 = KeyManager::public_key_to_base64(&signing_key.verifying_key())?;

    write_key_file(private_key_path, &private_b64, 0o600).map_err(|e| io_error(private_key_path, e))?;
    write_key_file(public_key_path, &public_b64, 0o644).map_err(|e| io_error(public_key_path, e))?;

    log::info!("📁 Private key saved: {}", private_key_path.display());
    log::info!("📁 Public key saved: {}", public_key_path.display());

    Ok(())
}

/// 지정한 권한으로 새 파일을 만들어 내용을 씁니다.
///
/// 기존 파일은 지우고 다시 만들어서, 파일이 처음부터 `mode` 권한으로만 존재하게 합니다.
fn write_key_file(path: &Path, contents: &str, mode: u32) -> std::io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("paseto-keystore-{}-{}", label, uuid::Uuid::new_v4()))
    }

    fn config_with(asymmetric_keys: AsymmetricKeySource, symmetric_key: Option<String>) -> PasetoConfig {
        PasetoConfig {
            symmetric_key,
            asymmetric_keys,
            ..PasetoConfig::new("svc", "api")
        }
    }

    #[test]
    fn test_key_files_generated_then_reloaded() {
        let dir = temp_dir("files");
        let source = AsymmetricKeySource::Files {
            private_key_path: dir.join("private.b64"),
            public_key_path: dir.join("public.b64"),
        };
        let config = config_with(source, None);

        let first = KeyStore::from_config(&config, Environment::Test).unwrap();
        let second = KeyStore::from_config(&config, Environment::Test).unwrap();

        assert!(first.can_sign());
        assert_eq!(first.verifying_key(), second.verifying_key());
        assert_eq!(first.key_id(), second.key_id());
        assert!(first.key_id().starts_with("ed25519-"));

        let _ = fs::remove_dir_all(dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_key_files_created_with_restricted_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = temp_dir("mode");
        let private_key_path = dir.join("private.b64");
        let public_key_path = dir.join("public.b64");
        fs::create_dir_all(&dir).unwrap();
        // 권한이 넓은 기존 파일이 남아 있어도 새로 만들어져야 함
        fs::write(&private_key_path, "stale").unwrap();
        fs::set_permissions(&private_key_path, fs::Permissions::from_mode(0o644)).unwrap();

        let signing_key = KeyManager::generate_asymmetric_key_pair();
        write_key_files(&signing_key, &private_key_path, &public_key_path).unwrap();

        let private_mode = fs::metadata(&private_key_path).unwrap().permissions().mode() & 0o777;
        let public_mode = fs::metadata(&public_key_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(private_mode, 0o600);
        assert_eq!(public_mode & 0o600, 0o600);

        let reloaded = load_or_generate_key_files(&private_key_path, &public_key_path).unwrap();
        assert_eq!(reloaded.verifying_key(), signing_key.verifying_key());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_symmetric_key_fails_in_production() {
        let signing_key = KeyManager::generate_asymmetric_key_pair();
        let source = AsymmetricKeySource::Inline {
            private_key: KeyManager::private_key_to_base64(&signing_key).unwrap(),
            public_key: KeyManager::public_key_to_base64(&signing_key.verifying_key()).unwrap(),
        };

        let result = KeyStore::from_config(&config_with(source, None), Environment::Production);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_wrong_length_symmetric_key_is_config_error() {
        let signing_key = KeyManager::generate_asymmetric_key_pair();
        let source = AsymmetricKeySource::Inline {
            private_key: KeyManager::private_key_to_base64(&signing_key).unwrap(),
            public_key: KeyManager::public_key_to_base64(&signing_key.verifying_key()).unwrap(),
        };
        let config = config_with(source, Some("c2hvcnQ=".to_string()));

        let result = KeyStore::from_config(&config, Environment::Development);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_verify_only_store_cannot_sign() {
        let signing_key = KeyManager::generate_asymmetric_key_pair();
        let source = AsymmetricKeySource::VerifyOnly {
            public_key: KeyManager::public_key_to_base64(&signing_key.verifying_key()).unwrap(),
        };
        let symmetric = KeyManager::symmetric_key_to_base64(&KeyManager::generate_symmetric_key());

        let store = KeyStore::from_config(&config_with(source, Some(symmetric)), Environment::Production)
            .unwrap();

        assert!(!store.can_sign());
        assert!(matches!(store.signing_key(), Err(AuthError::TokenIssuanceError(_))));
    }

    #[test]
    fn test_explicit_key_id_wins() {
        let store = KeyStore::new(
            SymmetricKey::new([0u8; 32]),
            KeyManager::generate_asymmetric_key_pair(),
            Some("key-2024".to_string()),
        );
        assert_eq!(store.key_id(), "key-2024");
    }

    #[test]
    fn test_debug_hides_key_material() {
        let store = KeyStore::new(
            SymmetricKey::new([0u8; 32]),
            KeyManager::generate_asymmetric_key_pair(),
            None,
        );
        let rendered = format!("{:?}", store);

        assert!(rendered.contains("key_id"));
        assert!(!rendered.contains("signing_key"));
    }
}
