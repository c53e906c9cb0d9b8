//! `auth.v1.AuthService` 전체 흐름 통합 테스트
//!
//! 실제 라우트 구성([`configure_all_routes`])과 인증 미들웨어를 그대로 띄워
//! 로그인부터 로그아웃까지 호출 단위 인증 동작을 확인합니다.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use paseto_auth_service::config::AppConfig;
use paseto_auth_service::core::ServiceContainer;
use paseto_auth_service::domain::models::token::{TokenClaimsBuilder, TokenFooter};
use paseto_auth_service::routes::configure_all_routes;
use paseto_auth_service::services::auth::{
    KeyManager, KeyStore, PassthroughCredentialVerifier, SymmetricKey, TokenRequest, TokenService,
};

const LOGIN: &str = "/auth.v1.AuthService/login";
const VALIDATE: &str = "/auth.v1.AuthService/validateToken";
const REFRESH: &str = "/auth.v1.AuthService/refreshToken";
const LOGOUT: &str = "/auth.v1.AuthService/logout";

fn test_container() -> ServiceContainer {
    let env: HashMap<&str, &str> = [
        ("ENVIRONMENT", "test"),
        ("PASETO_ISSUER", "grpc-chat"),
        ("PASETO_AUDIENCE", "grpc-chat-api"),
    ]
    .into_iter()
    .collect();
    let config = AppConfig::from_lookup(&|key: &str| env.get(key).map(|v| v.to_string()))
        .expect("test config");

    let key_store = Arc::new(KeyStore::new(
        SymmetricKey::new([7u8; 32]),
        KeyManager::generate_asymmetric_key_pair(),
        Some("test-key".to_string()),
    ));

    ServiceContainer::with_key_store(config, key_store, Arc::new(PassthroughCredentialVerifier))
}

macro_rules! init_app {
    ($container:expr) => {{
        let container = $container.clone();
        test::init_service(App::new().configure(move |cfg| configure_all_routes(cfg, &container)))
            .await
    }};
}

macro_rules! login {
    ($app:expr, $token_type:expr) => {{
        let req = test::TestRequest::post()
            .uri(LOGIN)
            .set_json(json!({"username": "alice", "password": "secret", "token_type": $token_type}))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

fn assert_generic_unauthenticated(body: &Value) {
    assert_eq!(body["error"], "unauthenticated");
    assert_eq!(body["message"], "유효한 인증 토큰이 필요합니다");
}

#[actix_web::test]
async fn test_health_check_is_reachable_without_token() {
    let container = test_container();
    let app = init_app!(container);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_bypasses_authentication() {
    let container = test_container();
    let app = init_app!(container);

    let body = login!(app, "LOCAL");

    assert!(body["access_token"].as_str().unwrap().starts_with("v4.local."));
    assert!(body["refresh_token"].as_str().unwrap().starts_with("v4.local."));
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["token_type"], "LOCAL");
}

#[actix_web::test]
async fn test_login_rejects_blank_credentials() {
    let container = test_container();
    let app = init_app!(container);

    let req = test::TestRequest::post()
        .uri(LOGIN)
        .set_json(json!({"username": "  ", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_protected_methods_reject_missing_header() {
    let container = test_container();
    let app = init_app!(container);

    for uri in [VALIDATE, LOGOUT] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({"token": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} must require a token", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_generic_unauthenticated(&body);
    }
}

#[actix_web::test]
async fn test_garbage_bearer_token_is_rejected() {
    let container = test_container();
    let app = init_app!(container);

    for header in ["Bearer garbage", "Basic abc", "Bearer ", "v4.local.abc"] {
        let req = test::TestRequest::post()
            .uri(LOGOUT)
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
    }
}

#[actix_web::test]
async fn test_valid_local_token_passes_and_reaches_handler() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let access = tokens["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(VALIDATE)
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .set_json(json!({"token": access}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["subject"], "alice");
}

#[actix_web::test]
async fn test_validate_token_reports_invalid_body_token_without_failing() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let access = tokens["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(VALIDATE)
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .set_json(json!({"token": "v4.local.not-a-token"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["subject"], "");
}

#[actix_web::test]
async fn test_logout_with_valid_token() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let access = tokens["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(LOGOUT)
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn test_public_token_round_trip() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "PUBLIC");
    let access = tokens["access_token"].as_str().unwrap();
    assert!(access.starts_with("v4.public."));
    assert_eq!(tokens["token_type"], "PUBLIC");

    let req = test::TestRequest::post()
        .uri(LOGOUT)
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_issues_new_pair() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(REFRESH)
        .set_json(json!({"refresh_token": refresh}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let new_access = body["access_token"].as_str().unwrap();
    assert!(new_access.starts_with("v4.local."));
    assert_ne!(new_access, tokens["access_token"].as_str().unwrap());
}

#[actix_web::test]
async fn test_access_token_cannot_be_used_as_refresh_token() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let access = tokens["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(REFRESH)
        .set_json(json!({"refresh_token": access}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_generic_unauthenticated(&body);
}

#[actix_web::test]
async fn test_expired_token_is_rejected() {
    let container = test_container();
    let app = init_app!(container);

    let claims = TokenClaimsBuilder::new("grpc-chat", "grpc-chat-api")
        .subject("alice")
        .issued_at(Utc::now() - Duration::hours(2))
        .expires_in_seconds(60)
        .build()
        .unwrap();
    let token = container
        .token_service
        .create_local_token_from_claims(&claims, None, None, container.key_store.symmetric_key())
        .unwrap();

    let req = test::TestRequest::post()
        .uri(LOGOUT)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_generic_unauthenticated(&body);
}

#[actix_web::test]
async fn test_token_for_other_audience_is_rejected() {
    let container = test_container();
    let app = init_app!(container);

    let foreign = TokenService::new("grpc-chat", "other-api");
    let token = foreign
        .create_local_token(&TokenRequest::new("alice", 900), container.key_store.symmetric_key())
        .unwrap();

    let req = test::TestRequest::post()
        .uri(LOGOUT)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_tampered_footer_is_rejected() {
    let container = test_container();
    let app = init_app!(container);

    let request = TokenRequest::new("alice", 900).with_footer(TokenFooter::access("test-key"));
    let token = container
        .token_service
        .create_local_token(&request, container.key_store.symmetric_key())
        .unwrap();

    let forged_footer = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&TokenFooter::access("attacker-key")).unwrap(),
    );
    let mut segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 4);
    segments[3] = &forged_footer;
    let tampered = segments.join(".");

    let req = test::TestRequest::post()
        .uri(LOGOUT)
        .insert_header(("Authorization", format!("Bearer {}", tampered)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_truncated_token_bodies_are_unauthenticated_not_server_errors() {
    let container = test_container();
    let app = init_app!(container);

    for token in ["v4.local.AAAA", "v4.public.AAAA", "v4.local.", "v4.public.AAAA.e30"] {
        let req = test::TestRequest::post()
            .uri(LOGOUT)
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "token {:?}", token);
        let body: Value = test::read_body_json(resp).await;
        assert_generic_unauthenticated(&body);
    }
}

#[actix_web::test]
async fn test_truncated_refresh_token_is_unauthenticated() {
    let container = test_container();
    let app = init_app!(container);

    let req = test::TestRequest::post()
        .uri(REFRESH)
        .set_json(json!({"refresh_token": "v4.local.AAAA"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_generic_unauthenticated(&body);
}

#[actix_web::test]
async fn test_validate_token_reports_truncated_token_as_invalid() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let access = tokens["access_token"].as_str().unwrap();

    for token in ["v4.local.AAAA", "v4.public.AAAA"] {
        let req = test::TestRequest::post()
            .uri(VALIDATE)
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .set_json(json!({"token": token}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "token {:?}", token);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["valid"], false);
    }
}

#[actix_web::test]
async fn test_refresh_token_is_not_a_bearer_credential() {
    let container = test_container();
    let app = init_app!(container);

    let tokens = login!(app, "LOCAL");
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(LOGOUT)
        .insert_header(("Authorization", format!("Bearer {}", refresh)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_generic_unauthenticated(&body);
}
