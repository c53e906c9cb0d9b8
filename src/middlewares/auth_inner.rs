//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::AppError;
use crate::domain::models::auth::{AuthState, VerifiedClaims};
use crate::middlewares::auth_interceptor::{AuthInterceptor, Screening, AUTHORIZATION_HEADER};

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub interceptor: Arc<AuthInterceptor>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let interceptor = self.interceptor.clone();

        Box::pin(async move {
            let method = req.path().trim_start_matches('/').to_string();
            let authorization = req
                .headers()
                .get(AUTHORIZATION_HEADER)
                .and_then(|h| h.to_str().ok());

            // 암호 연산은 블로킹 스레드 풀에서 수행
            let state = match interceptor.screen(&method, authorization) {
                Screening::Decided(state) => state,
                Screening::Verify { token, kind } => {
                    let verifier = interceptor.clone();
                    web::block(move || verifier.verify(&token, kind))
                        .await
                        .map_err(|e| AppError::InternalError(format!("토큰 검증 작업 실패: {}", e)))?
                }
            };

            match state {
                AuthState::Bypassed => {
                    log::debug!("인증 우회: {}", method);
                }
                AuthState::Authorized(claims) => {
                    log::debug!("인증 성공: {} (subject: {})", method, claims.subject);
                    req.extensions_mut().insert(VerifiedClaims(Arc::new(claims)));
                }
                AuthState::Rejected(reason) => {
                    log::warn!("🚫 인증 거부: {} - {}", method, reason);
                    let response = AppError::unauthenticated().error_response();
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    return Ok(res);
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
