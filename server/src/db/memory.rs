//! In-process store. Used when no `DATABASE_URL` is configured and by tests.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DuplicateRiotId, Store};
use crate::game::types::{CompletedParticipation, Match, Member, NewMember};

/// All state lives behind a single lock so a match and its participations
/// are always replaced together.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Registration order.
    members: Vec<Member>,
    matches: HashMap<Uuid, Match>,
}

impl Inner {
    /// Same integrity rules the Postgres schema enforces.
    fn check_participations(&self, m: &Match) -> Result<()> {
        for p in &m.participations {
            if p.match_id != m.id {
                anyhow::bail!("participation {} belongs to match {}", p.id, p.match_id);
            }
            if !self.members.iter().any(|mem| mem.id == p.member_id) {
                anyhow::bail!("participation {} references unknown member {}", p.id, p.member_id);
            }
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_member_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let inner = self.inner.read().await;
        Ok(inner.members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_members_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Member>> {
        let inner = self.inner.read().await;
        Ok(inner
            .members
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn find_member_by_riot_id(&self, riot_id: &str) -> Result<Option<Member>> {
        let inner = self.inner.read().await;
        Ok(inner.members.iter().find(|m| m.riot_id == riot_id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        Ok(self.inner.read().await.members.clone())
    }

    async fn insert_member(&self, member: NewMember) -> Result<Member> {
        let mut inner = self.inner.write().await;
        if inner.members.iter().any(|m| m.riot_id == member.riot_id) {
            return Err(DuplicateRiotId(member.riot_id).into());
        }
        let stored = Member {
            id: Uuid::new_v4(),
            name: member.name,
            riot_id: member.riot_id,
            riot_puuid: member.riot_puuid,
            tier: member.tier,
            created_at: Utc::now(),
        };
        inner.members.push(stored.clone());
        Ok(stored)
    }

    async fn insert_match(&self, m: &Match) -> Result<Match> {
        let mut inner = self.inner.write().await;
        if inner.matches.contains_key(&m.id) {
            anyhow::bail!("match {} already exists", m.id);
        }
        inner.check_participations(m)?;
        inner.matches.insert(m.id, m.clone());
        Ok(m.clone())
    }

    async fn update_match(&self, m: &Match) -> Result<Option<Match>> {
        let mut inner = self.inner.write().await;
        let Some(created_at) = inner.matches.get(&m.id).map(|e| e.created_at) else {
            return Ok(None);
        };
        inner.check_participations(m)?;
        let mut stored = m.clone();
        stored.created_at = created_at;
        inner.matches.insert(stored.id, stored.clone());
        Ok(Some(stored))
    }

    async fn find_match_by_id(&self, id: Uuid) -> Result<Option<Match>> {
        Ok(self.inner.read().await.matches.get(&id).cloned())
    }

    async fn find_all_matches(&self) -> Result<Vec<Match>> {
        let inner = self.inner.read().await;
        let mut all: Vec<Match> = inner.matches.values().cloned().collect();
        all.sort_by(|a, b| {
            b.played_at
                .cmp(&a.played_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(all)
    }

    async fn delete_match(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.write().await.matches.remove(&id).is_some())
    }

    async fn find_completed_participations_by_member(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<CompletedParticipation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .matches
            .values()
            .filter(|m| m.win_side.is_completed())
            .flat_map(|m| {
                m.participations
                    .iter()
                    .filter(move |p| p.member_id == member_id)
                    .map(move |p| CompletedParticipation {
                        participation_id: p.id,
                        match_id: m.id,
                        win_side: m.win_side,
                        team_side: p.team_side,
                        win: Some(p.win),
                    })
            })
            .collect())
    }
}
