//! `auth.v1.AuthService` HTTP 핸들러
//!
//! 각 RPC는 `POST /auth.v1.AuthService/<method>`로 노출됩니다.
//! 토큰 발급/검증은 CPU 작업이므로 `web::block`으로 블로킹 풀에서 실행합니다.
//!
//! | 메서드 | 인증 |
//! |--------|------|
//! | `login` | 우회 |
//! | `refreshToken` | 우회 (본문의 리프레시 토큰으로 인증) |
//! | `validateToken` | 필요 |
//! | `logout` | 필요 |
use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::core::AppError;
use crate::domain::dto::{
    LoginRequest, LogoutResponse, RefreshRequest, TokenResponse, ValidateRequest, ValidateResponse,
};
use crate::domain::models::auth::AuthenticatedClaims;
use crate::services::auth::AuthService;

/// 블로킹 풀 작업 실패를 내부 오류로 변환
fn blocking_failed(e: actix_web::error::BlockingError) -> AppError {
    AppError::InternalError(format!("블로킹 작업 실패: {}", e))
}

/// 로그인 핸들러
///
/// # Endpoint
/// `POST /auth.v1.AuthService/login`
#[post("/login")]
pub async fn login(
    auth_service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let request = payload.into_inner();
    let service = auth_service.into_inner();
    let pair = web::block(move || {
        service.login(&request.username, &request.password, request.token_type)
    })
    .await
    .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// 토큰 검증 핸들러
///
/// 검증 실패는 호출 실패가 아니라 `valid: false` 응답입니다.
///
/// # Endpoint
/// `POST /auth.v1.AuthService/validateToken`
#[post("/validateToken")]
pub async fn validate_token(
    auth_service: web::Data<AuthService>,
    payload: web::Json<ValidateRequest>,
) -> Result<HttpResponse, AppError> {
    let token = payload.into_inner().token;
    let service = auth_service.into_inner();
    let claims = web::block(move || service.validate_token(&token))
        .await
        .map_err(blocking_failed)?;

    let response = claims
        .map(ValidateResponse::from)
        .unwrap_or_else(ValidateResponse::invalid);
    Ok(HttpResponse::Ok().json(response))
}

/// 토큰 갱신 핸들러
///
/// # Endpoint
/// `POST /auth.v1.AuthService/refreshToken`
#[post("/refreshToken")]
pub async fn refresh_token(
    auth_service: web::Data<AuthService>,
    payload: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let refresh_token = payload.into_inner().refresh_token;
    let service = auth_service.into_inner();
    let pair = web::block(move || service.refresh_token(&refresh_token))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// 로그아웃 핸들러
///
/// # Endpoint
/// `POST /auth.v1.AuthService/logout`
#[post("/logout")]
pub async fn logout(
    auth_service: web::Data<AuthService>,
    claims: AuthenticatedClaims,
) -> Result<HttpResponse, AppError> {
    auth_service.logout(&claims);

    Ok(HttpResponse::Ok().json(LogoutResponse {
        success: true,
        message: "로그아웃되었습니다".to_string(),
    }))
}
