//! Greedy 5v5 split by tier score.

use std::{cmp::Reverse, collections::HashSet};

use serde::Serialize;
use uuid::Uuid;

use super::{tiers::TierTable, types::Member};
use crate::{
    db::Store,
    error::{ApiError, ApiResult},
};

pub const TEAM_SIZE: usize = 5;
pub const REQUIRED_PLAYERS: usize = TEAM_SIZE * 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMember {
    pub member_id: Uuid,
    pub name: String,
    pub riot_id: String,
    pub tier: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSplit {
    pub blue_team: Vec<ScoredMember>,
    pub blue_team_score: i32,
    pub red_team: Vec<ScoredMember>,
    pub red_team_score: i32,
}

fn count_error() -> ApiError {
    ApiError::invalid(format!(
        "Exactly {REQUIRED_PLAYERS} members are required for team balancing."
    ))
}

/// Split exactly ten members into two teams of five.
///
/// Members are taken highest score first (ties keep input order) and each one
/// joins the team with the lower running total, blue on a tie, unless that
/// team is already full.
pub fn balance_members(members: Vec<Member>, table: &TierTable) -> ApiResult<TeamSplit> {
    if members.len() != REQUIRED_PLAYERS {
        return Err(count_error());
    }

    let mut scored: Vec<ScoredMember> = members
        .into_iter()
        .map(|m| ScoredMember {
            score: table.score(Some(&m.tier)),
            member_id: m.id,
            name: m.name,
            riot_id: m.riot_id,
            tier: m.tier,
        })
        .collect();
    // stable
    scored.sort_by_key(|s| Reverse(s.score));

    let mut split = TeamSplit {
        blue_team: Vec::with_capacity(TEAM_SIZE),
        blue_team_score: 0,
        red_team: Vec::with_capacity(TEAM_SIZE),
        red_team_score: 0,
    };
    for s in scored {
        let to_blue = split.blue_team.len() < TEAM_SIZE
            && (split.blue_team_score <= split.red_team_score || split.red_team.len() >= TEAM_SIZE);
        if to_blue {
            split.blue_team_score += s.score;
            split.blue_team.push(s);
        } else {
            split.red_team_score += s.score;
            split.red_team.push(s);
        }
    }
    Ok(split)
}

/// Resolve `member_ids` and balance them. The request order decides ties.
pub async fn balance(
    store: &dyn Store,
    member_ids: &[Uuid],
    table: &TierTable,
) -> ApiResult<TeamSplit> {
    let distinct: HashSet<Uuid> = member_ids.iter().copied().collect();
    if member_ids.len() != REQUIRED_PLAYERS || distinct.len() != REQUIRED_PLAYERS {
        return Err(count_error());
    }

    // The store does not preserve order; restore the request's.
    let mut found = store.find_members_by_ids(member_ids).await?;
    let mut ordered = Vec::with_capacity(REQUIRED_PLAYERS);
    for id in member_ids {
        let pos = found
            .iter()
            .position(|m| m.id == *id)
            .ok_or_else(|| ApiError::member_not_found(id))?;
        ordered.push(found.swap_remove(pos));
    }

    let split = balance_members(ordered, table)?;
    log::info!(
        "balanced teams: blue {} vs red {}",
        split.blue_team_score,
        split.red_team_score
    );
    Ok(split)
}
