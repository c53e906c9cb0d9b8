//! PASETO 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 [`AuthInterceptor`]의 판정을 호출마다 한 번
//! 적용합니다. 요청 경로에서 앞의 `/`를 뗀 값이 메서드 이름입니다.
//!
//! ```rust,ignore
//! web::scope("/auth.v1.AuthService")
//!     .wrap(AuthMiddleware::new(container.auth_interceptor.clone()))
//!     .service(handlers::logout)
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::middlewares::auth_inner::AuthMiddlewareService;
use crate::middlewares::auth_interceptor::AuthInterceptor;

pub struct AuthMiddleware {
    interceptor: Arc<AuthInterceptor>,
}

impl AuthMiddleware {
    pub fn new(interceptor: Arc<AuthInterceptor>) -> Self {
        Self { interceptor }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            interceptor: self.interceptor.clone(),
        }))
    }
}
