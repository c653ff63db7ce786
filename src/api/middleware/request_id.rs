//! X-Request-ID propagation
//!
//! 负载均衡器已经带了 ID 就沿用，否则生成 UUID。
//! ID 进入请求的 tracing span，并写回响应头。

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 超长的传入 ID 不采用
const MAX_INCOMING_ID_LEN: usize = 128;

/// 返回 (id, 是否来自请求头)
fn resolve_request_id(headers: &HeaderMap) -> (String, bool) {
    let incoming = headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_INCOMING_ID_LEN);

    match incoming {
        Some(id) => (id.to_string(), true),
        None => (Uuid::new_v4().to_string(), false),
    }
}

#[derive(Clone, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService {
            inner: Rc::new(service),
        }))
    }
}

pub struct RequestIdService<S> {
    inner: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inner = Rc::clone(&self.inner);
        let (id, propagated) = resolve_request_id(req.headers());

        let span = info_span!(
            "http",
            id = %id,
            propagated,
            method = %req.method(),
            uri = %req.uri(),
        );

        Box::pin(
            async move {
                let mut res = inner.call(req).await?;
                if let Ok(value) = HeaderValue::from_str(&id) {
                    res.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}
