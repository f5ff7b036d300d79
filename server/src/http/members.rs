//! Roster endpoints.

use actix_web::{get, post, web, HttpResponse};

use crate::{
    db::Store,
    error::ApiResult,
    game::{members, stats, types::NewMemberRequest},
    rank::RankResolver,
};

/// GET /api/members
#[get("/members")]
pub async fn list(db: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(stats::roster(&**db).await?))
}

/// POST /api/members
#[post("/members")]
pub async fn create(
    info: web::Json<NewMemberRequest>,
    db: web::Data<dyn Store>,
    ranks: web::Data<dyn RankResolver>,
) -> ApiResult<HttpResponse> {
    let member = members::register(&**db, &**ranks, info.into_inner()).await?;
    Ok(HttpResponse::Created().json(member))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create);
}
