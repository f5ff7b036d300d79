//! Match creation, listing, detail and result endpoints.

use actix_web::{delete, get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::Store,
    error::ApiResult,
    game::{
        result,
        types::{Match, MatchResultRequest, NewMatchRequest, TeamSide, WinSide},
    },
};

//////////////////////////////////////////////////
// Data transfer objects
//////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummaryResponse {
    pub match_id: Uuid,
    pub played_at: DateTime<Utc>,
    pub info: Option<String>,
    pub win_side: WinSide,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayerResponse {
    pub participation_id: Uuid,
    pub member_id: Uuid,
    pub name: Option<String>,
    pub riot_id: Option<String>,
    pub team_side: TeamSide,
    pub is_win: bool,
    pub position: Option<String>,
    pub champion_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetailResponse {
    pub match_id: Uuid,
    pub played_at: DateTime<Utc>,
    pub info: Option<String>,
    pub win_side: WinSide,
    pub players: Vec<MatchPlayerResponse>,
}

#[derive(Deserialize)]
pub struct ListParams {
    /// Only matches still waiting for a result.
    #[serde(default)]
    pub pending: bool,
}

impl From<&Match> for MatchSummaryResponse {
    fn from(m: &Match) -> Self {
        MatchSummaryResponse {
            match_id: m.id,
            played_at: m.played_at,
            info: m.info.clone(),
            win_side: m.win_side,
        }
    }
}

/// Join the participations with the roster for display.
async fn detail(db: &dyn Store, m: Match) -> ApiResult<MatchDetailResponse> {
    let ids: Vec<Uuid> = m.participations.iter().map(|p| p.member_id).collect();
    let members = db.find_members_by_ids(&ids).await?;

    let players = m
        .participations
        .into_iter()
        .map(|p| {
            let member = members.iter().find(|mem| mem.id == p.member_id);
            MatchPlayerResponse {
                participation_id: p.id,
                member_id: p.member_id,
                name: member.map(|mem| mem.name.clone()),
                riot_id: member.map(|mem| mem.riot_id.clone()),
                team_side: p.team_side,
                is_win: p.win,
                position: p.position,
                champion_name: p.champion_name,
            }
        })
        .collect();

    Ok(MatchDetailResponse {
        match_id: m.id,
        played_at: m.played_at,
        info: m.info,
        win_side: m.win_side,
        players,
    })
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/matches
#[post("/matches")]
pub async fn create(
    info: web::Json<NewMatchRequest>,
    db: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let created = result::create_match(&**db, info.into_inner()).await?;
    Ok(HttpResponse::Created().json(detail(&**db, created).await?))
}

/// GET /api/matches
#[get("/matches")]
pub async fn list(
    web::Query(params): web::Query<ListParams>,
    db: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let rows: Vec<MatchSummaryResponse> = result::list_matches(&**db, params.pending)
        .await?
        .iter()
        .map(MatchSummaryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/matches/{match_id}
#[get("/matches/{match_id}")]
pub async fn get_one(path: web::Path<Uuid>, db: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let m = result::get_match(&**db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail(&**db, m).await?))
}

/// POST /api/matches/{match_id}/result
#[post("/matches/{match_id}/result")]
pub async fn set_result(
    path: web::Path<Uuid>,
    info: web::Json<MatchResultRequest>,
    db: web::Data<dyn Store>,
) -> ApiResult<HttpResponse> {
    let m = result::set_result(&**db, path.into_inner(), info.win_side).await?;
    Ok(HttpResponse::Ok().json(detail(&**db, m).await?))
}

/// DELETE /api/matches/{match_id}
#[delete("/matches/{match_id}")]
pub async fn remove(path: web::Path<Uuid>, db: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    result::delete_match(&**db, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(list)
        .service(get_one)
        .service(set_result)
        .service(remove);
}
