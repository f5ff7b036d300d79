//! Simple liveness / readiness check

use actix_web::{get, web, HttpResponse, Responder};

use crate::db::Store;

#[get("/healthz")]
pub async fn healthz(db: web::Data<dyn Store>) -> impl Responder {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().body("ok"),
        Err(e) => {
            log::warn!("health check failed: {e:?}");
            HttpResponse::ServiceUnavailable().body("db")
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
