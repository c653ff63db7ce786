use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, trace};

use crate::errors::GeoProxyError;
use crate::services::LookupService;

/// 失败响应体：`{"error": "..."}`
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

pub struct LookupHandler;

impl LookupHandler {
    pub async fn lookup_ip(
        path: web::Path<String>,
        service: web::Data<Arc<LookupService>>,
    ) -> impl Responder {
        let ip = path.into_inner();
        trace!("Received lookup request for {}", ip);

        match service.resolve(&ip).await {
            Ok(record) => HttpResponse::Ok().json(record),
            Err(e) => Self::error_response(&ip, e),
        }
    }

    /// 所有请求级错误都返回 500
    fn error_response(ip: &str, err: GeoProxyError) -> HttpResponse {
        error!("Lookup for {} failed [{}]: {}", ip, err.code(), err);

        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).json(ErrorBody {
            error: err.message(),
        })
    }
}

/// Lookup 路由配置
pub fn lookup_routes() -> actix_web::Scope {
    web::scope("/ip").route("/{ip}", web::get().to(LookupHandler::lookup_ip))
}
