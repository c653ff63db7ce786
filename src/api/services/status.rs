use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

pub struct StatusService;

impl StatusService {
    // 存活检查，不检查缓存和上游
    pub async fn status() -> impl Responder {
        trace!("Received status check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }
}

/// Status 路由配置
pub fn status_routes() -> actix_web::Resource {
    web::resource("/status")
        .route(web::get().to(StatusService::status))
        .route(web::head().to(StatusService::status))
}
