//! PASETO 인증 서비스 메인 애플리케이션
//!
//! 설정을 읽고 서비스 그래프를 조립한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::path::PathBuf;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};
use paseto_auth_service::config::AppConfig;
use paseto_auth_service::core::ServiceContainer;
use paseto_auth_service::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // .env 로드 → 로깅 초기화 → 로드 결과 출력
    let env_file = load_env_file();
    init_logging();
    env_file.report();

    info!("🚀 PASETO 인증 서비스 시작중...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("❌ 설정 로드 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    info!("⚙️ 실행 환경: {:?}", config.environment);

    let container = ServiceContainer::build(config).map_err(|e| {
        error!("❌ 서비스 초기화 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(container).await
}

async fn start_http_server(container: ServiceContainer) -> std::io::Result<()> {
    let bind_address = container.config.server.bind_address();
    let rate_limit = container.config.rate_limit;

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다 (0 값 불가)"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second,
        rate_limit.burst_size
    );

    HttpServer::new(move || {
        let container = container.clone();

        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .configure(|cfg| configure_all_routes(cfg, &container))
    })
    .bind(bind_address)?
    .run()
    .await
}

/// 프로필별 `.env` 파일 로드 결과
struct EnvFileLoad {
    profile: String,
    file: &'static str,
    result: dotenv::Result<PathBuf>,
}

impl EnvFileLoad {
    fn report(&self) {
        info!("Current profile: {}", self.profile);
        match &self.result {
            Ok(path) => info!("{} 파일 로드 됨 ({})", self.file, path.display()),
            Err(e) => warn!("{} 파일 로드 실패: {}", self.file, e),
        }
    }
}

fn env_file_for_profile(profile: &str) -> &'static str {
    match profile {
        "prod" => ".env.prod",
        "dev" => ".env.dev",
        _ => ".env",
    }
}

fn load_env_file() -> EnvFileLoad {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());
    let file = env_file_for_profile(&profile);
    let result = dotenv::from_filename(file);

    EnvFileLoad {
        profile,
        file,
        result,
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        // Preflight 요청 캐시 시간 (초)
        .max_age(3600)
}
