//! 라우트 구성
//!
//! 모든 RPC 스코프는 [`AuthMiddleware`]로 감싸집니다. 우회 여부는
//! 미들웨어가 설정된 메서드 목록으로 판단합니다.

use crate::core::ServiceContainer;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// RPC 서비스 경로 접두사
pub const AUTH_SERVICE_SCOPE: &str = "/auth.v1.AuthService";

pub fn configure_all_routes(cfg: &mut web::ServiceConfig, container: &ServiceContainer) {
    cfg.app_data(web::Data::from(container.auth_service.clone()));
    cfg.service(health_check);

    configure_auth_routes(cfg, container);
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig, container: &ServiceContainer) {
    cfg.service(
        web::scope(AUTH_SERVICE_SCOPE)
            .wrap(AuthMiddleware::new(container.auth_interceptor.clone()))
            .service(handlers::auth::login)
            .service(handlers::auth::validate_token)
            .service(handlers::auth::refresh_token)
            .service(handlers::auth::logout),
    );
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
