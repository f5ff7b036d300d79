//! Per-member win/loss aggregation over completed matches.

use futures::future::try_join_all;
use serde::Serialize;
use uuid::Uuid;

use super::types::{CompletedParticipation, Member};
use crate::{db::Store, error::ApiResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLoss {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage, `0.0` when no games were completed.
    pub win_rate: f64,
}

/// One roster row as listed by `GET /api/members`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: Uuid,
    pub name: String,
    pub riot_id: String,
    pub tier: String,
    #[serde(flatten)]
    pub stats: WinLoss,
}

impl MemberSummary {
    pub fn new(member: Member, stats: WinLoss) -> Self {
        MemberSummary {
            id: member.id,
            name: member.name,
            riot_id: member.riot_id,
            tier: member.tier,
            stats,
        }
    }
}

/// Count wins and losses. Participations of pending matches are ignored; an
/// unset win flag on a completed match counts as a loss.
pub fn summarize(participations: &[CompletedParticipation]) -> WinLoss {
    let mut stats = WinLoss::default();
    for p in participations.iter().filter(|p| p.win_side.is_completed()) {
        stats.total_games += 1;
        match p.win {
            Some(true) => stats.wins += 1,
            Some(false) => stats.losses += 1,
            None => {
                log::warn!(
                    "participation {} in match {} has no win flag; counting as a loss",
                    p.participation_id,
                    p.match_id
                );
                stats.losses += 1;
            }
        }
    }
    if stats.total_games > 0 {
        stats.win_rate = f64::from(stats.wins) / f64::from(stats.total_games) * 100.0;
    }
    stats
}

pub async fn summarize_member(store: &dyn Store, member_id: Uuid) -> ApiResult<WinLoss> {
    let completed = store
        .find_completed_participations_by_member(member_id)
        .await?;
    let stats = summarize(&completed);
    log::debug!(
        "member {member_id}: {} games, {}W {}L ({:.2}%)",
        stats.total_games,
        stats.wins,
        stats.losses,
        stats.win_rate
    );
    Ok(stats)
}

/// Whole roster with each member's stats.
pub async fn roster(store: &dyn Store) -> ApiResult<Vec<MemberSummary>> {
    let members = store.list_members().await?;
    let stats = try_join_all(members.iter().map(|m| summarize_member(store, m.id))).await?;
    Ok(members
        .into_iter()
        .zip(stats)
        .map(|(m, s)| MemberSummary::new(m, s))
        .collect())
}
