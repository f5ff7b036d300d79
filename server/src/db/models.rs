use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::game::types::{
    CompletedParticipation, Match, Member, Participation, TeamSide, WinSide,
};

#[derive(Debug, FromRow)]
pub struct MemberRow {
    pub id: Uuid,
    pub name: String,
    pub riot_id: String,
    pub riot_puuid: String,
    pub tier: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub info: Option<String>,
    pub win_side: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct MatchPlayerRow {
    pub id: Uuid,
    pub match_id: Uuid,
    pub member_id: Uuid,
    pub team_side: String,
    pub win: Option<bool>,
    pub position: Option<String>,
    pub champion_name: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct CompletedParticipationRow {
    pub participation_id: Uuid,
    pub match_id: Uuid,
    pub win_side: String,
    pub team_side: String,
    pub win: Option<bool>,
}

impl From<MemberRow> for Member {
    fn from(r: MemberRow) -> Self {
        Member {
            id: r.id,
            name: r.name,
            riot_id: r.riot_id,
            riot_puuid: r.riot_puuid,
            tier: r.tier,
            created_at: r.created_at,
        }
    }
}

impl TryFrom<MatchPlayerRow> for Participation {
    type Error = anyhow::Error;

    fn try_from(r: MatchPlayerRow) -> Result<Self> {
        Ok(Participation {
            id: r.id,
            match_id: r.match_id,
            member_id: r.member_id,
            team_side: r
                .team_side
                .parse::<TeamSide>()
                .with_context(|| format!("match_players.team_side of {}", r.id))?,
            // NULL only survives in legacy rows; the aggregator sees the raw value.
            win: r.win.unwrap_or(false),
            position: r.position,
            champion_name: r.champion_name,
        })
    }
}

impl MatchRow {
    /// Attach the already-loaded participation rows of this match.
    pub fn into_match(self, players: Vec<MatchPlayerRow>) -> Result<Match> {
        let participations = players
            .into_iter()
            .map(Participation::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Match {
            id: self.id,
            played_at: self.played_at,
            info: self.info,
            win_side: self
                .win_side
                .parse::<WinSide>()
                .with_context(|| format!("matches.win_side of {}", self.id))?,
            participations,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<CompletedParticipationRow> for CompletedParticipation {
    type Error = anyhow::Error;

    fn try_from(r: CompletedParticipationRow) -> Result<Self> {
        Ok(CompletedParticipation {
            participation_id: r.participation_id,
            match_id: r.match_id,
            win_side: r.win_side.parse().context("matches.win_side")?,
            team_side: r.team_side.parse().context("match_players.team_side")?,
            win: r.win,
        })
    }
}
