use actix_web::{post, web, HttpResponse};

use crate::{
    db::Store,
    error::ApiResult,
    game::{balance, tiers::TierTable, types::TeamBalanceRequest},
};

/// POST /api/team-balance
#[post("/team-balance")]
pub async fn balance_teams(
    info: web::Json<TeamBalanceRequest>,
    db: web::Data<dyn Store>,
    tiers: web::Data<TierTable>,
) -> ApiResult<HttpResponse> {
    let split = balance::balance(&**db, &info.member_ids, &tiers).await?;
    Ok(HttpResponse::Ok().json(split))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(balance_teams);
}
