//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use sungbok_server::{
    db::{MemoryStore, Store},
    game::types::{
        CompletedParticipation, Match, Member, NewMatchRequest, NewMember, ParticipantRequest,
        TeamSide,
    },
    rank::{RankError, RankResolver, ResolvedAccount},
};
use uuid::Uuid;

/// Register `name` directly in the store, skipping rank resolution.
pub async fn seed_member(store: &MemoryStore, name: &str, tier: &str) -> Member {
    store
        .insert_member(NewMember {
            name: name.to_string(),
            riot_id: format!("{name}#KR1"),
            riot_puuid: format!("puuid-{name}"),
            tier: tier.to_string(),
        })
        .await
        .expect("seed member")
}

/// One request participant per `(member, side)`.
pub fn match_request(players: &[(&Member, TeamSide)]) -> NewMatchRequest {
    NewMatchRequest {
        played_at: None,
        info: Some("scrim".into()),
        win_side: None,
        players: players
            .iter()
            .map(|(m, side)| ParticipantRequest {
                member_id: m.id,
                team_side: *side,
                position: Some("MID".into()),
                champion_name: None,
            })
            .collect(),
    }
}

/// Build a bare member (not stored) for pure balancer tests.
pub fn member(name: &str, tier: &str) -> Member {
    Member {
        id: Uuid::new_v4(),
        name: name.to_string(),
        riot_id: format!("{name}#KR1"),
        riot_puuid: format!("puuid-{name}"),
        tier: tier.to_string(),
        created_at: chrono::Utc::now(),
    }
}

/// Rank service double: every handle resolves except `ghost`.
pub struct StubRanks {
    pub tier: Option<&'static str>,
}

#[async_trait]
impl RankResolver for StubRanks {
    async fn resolve(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<ResolvedAccount, RankError> {
        if game_name == "ghost" {
            return Err(RankError::AccountNotFound(format!("{game_name}#{tag_line}")));
        }
        Ok(ResolvedAccount {
            puuid: format!("puuid-{game_name}-{tag_line}"),
            riot_id: format!("{game_name}#{tag_line}"),
            tier: self.tier.map(str::to_string),
        })
    }
}

/// [`MemoryStore`] wrapper that replays lost races deterministically.
#[derive(Default)]
pub struct RacingStore {
    pub inner: MemoryStore,
    /// Another request deletes the match right after it is loaded.
    pub delete_after_load: bool,
    /// Another request registers the same handle right after the duplicate
    /// check, so the check never sees it.
    pub miss_riot_id_lookups: bool,
}

#[async_trait]
impl Store for RacingStore {
    async fn ping(&self) -> anyhow::Result<()> {
        self.inner.ping().await
    }

    async fn find_member_by_id(&self, id: Uuid) -> anyhow::Result<Option<Member>> {
        self.inner.find_member_by_id(id).await
    }

    async fn find_members_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Member>> {
        self.inner.find_members_by_ids(ids).await
    }

    async fn find_member_by_riot_id(&self, riot_id: &str) -> anyhow::Result<Option<Member>> {
        if self.miss_riot_id_lookups {
            return Ok(None);
        }
        self.inner.find_member_by_riot_id(riot_id).await
    }

    async fn list_members(&self) -> anyhow::Result<Vec<Member>> {
        self.inner.list_members().await
    }

    async fn insert_member(&self, member: NewMember) -> anyhow::Result<Member> {
        self.inner.insert_member(member).await
    }

    async fn insert_match(&self, m: &Match) -> anyhow::Result<Match> {
        self.inner.insert_match(m).await
    }

    async fn update_match(&self, m: &Match) -> anyhow::Result<Option<Match>> {
        self.inner.update_match(m).await
    }

    async fn find_match_by_id(&self, id: Uuid) -> anyhow::Result<Option<Match>> {
        let found = self.inner.find_match_by_id(id).await?;
        if self.delete_after_load {
            self.inner.delete_match(id).await?;
        }
        Ok(found)
    }

    async fn find_all_matches(&self) -> anyhow::Result<Vec<Match>> {
        self.inner.find_all_matches().await
    }

    async fn delete_match(&self, id: Uuid) -> anyhow::Result<bool> {
        self.inner.delete_match(id).await
    }

    async fn find_completed_participations_by_member(
        &self,
        member_id: Uuid,
    ) -> anyhow::Result<Vec<CompletedParticipation>> {
        self.inner
            .find_completed_participations_by_member(member_id)
            .await
    }
}
