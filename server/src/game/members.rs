//! Roster registration.

use super::{
    stats::{MemberSummary, WinLoss},
    types::{NewMember, NewMemberRequest, UNRANKED},
};
use crate::{
    db::{DuplicateRiotId, Store},
    error::{ApiError, ApiResult},
    rank::RankResolver,
};

/// Register a player by Riot handle. The tier is looked up once, here.
pub async fn register(
    store: &dyn Store,
    resolver: &dyn RankResolver,
    req: NewMemberRequest,
) -> ApiResult<MemberSummary> {
    let name = req.name.trim();
    let game_name = req.game_name.trim();
    let tag_line = req.tag_line.trim().trim_start_matches('#');
    if name.is_empty() || game_name.is_empty() || tag_line.is_empty() {
        return Err(ApiError::invalid("name, gameName and tagLine are required"));
    }

    let account = resolver.resolve(game_name, tag_line).await?;

    if store.find_member_by_riot_id(&account.riot_id).await?.is_some() {
        return Err(ApiError::invalid(DuplicateRiotId(account.riot_id).to_string()));
    }

    let tier = account
        .tier
        .map(|t| t.trim().to_ascii_uppercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNRANKED.to_string());

    // A concurrent registration of the same handle can still win the race.
    let member = store
        .insert_member(NewMember {
            name: name.to_string(),
            riot_id: account.riot_id,
            riot_puuid: account.puuid,
            tier,
        })
        .await
        .map_err(|e| match e.downcast::<DuplicateRiotId>() {
            Ok(dup) => ApiError::invalid(dup.to_string()),
            Err(e) => ApiError::from(e),
        })?;
    log::info!("member {} registered as {} ({})", member.name, member.riot_id, member.tier);

    Ok(MemberSummary::new(member, WinLoss::default()))
}
