//! Persistence boundary for members, matches and participations.

pub mod memory;
pub mod models;
pub mod pg;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::game::types::{CompletedParticipation, Match, Member, NewMember};

/// Returned (inside `anyhow::Error`) by [`Store::insert_member`] when the
/// Riot handle is already registered.
#[derive(Debug, thiserror::Error)]
#[error("{0} is already on the roster")]
pub struct DuplicateRiotId(pub String);

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Storage backend used by every API operation.
///
/// `insert_match` and `update_match` are the only multi-row writes;
/// implementations must commit the match row and its whole participation set
/// as one unit, and readers must never observe one without the other.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip used by the readiness check.
    async fn ping(&self) -> Result<()>;

    async fn find_member_by_id(&self, id: Uuid) -> Result<Option<Member>>;

    /// Members for the given ids. Unknown ids are skipped and the order of
    /// the result is unspecified.
    async fn find_members_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Member>>;

    async fn find_member_by_riot_id(&self, riot_id: &str) -> Result<Option<Member>>;

    /// Whole roster, oldest registration first.
    async fn list_members(&self) -> Result<Vec<Member>>;

    /// Fails with [`DuplicateRiotId`] if the handle is taken.
    async fn insert_member(&self, member: NewMember) -> Result<Member>;

    /// Store a new match together with its participations.
    async fn insert_match(&self, m: &Match) -> Result<Match>;

    /// Overwrite an existing match and replace its participation set with
    /// `m.participations`. `None` if the match no longer exists; nothing is
    /// written in that case.
    async fn update_match(&self, m: &Match) -> Result<Option<Match>>;

    async fn find_match_by_id(&self, id: Uuid) -> Result<Option<Match>>;

    /// Every match, most recently played first.
    async fn find_all_matches(&self) -> Result<Vec<Match>>;

    /// Remove a match and its participations. `false` if it did not exist.
    async fn delete_match(&self, id: Uuid) -> Result<bool>;

    /// Participations of `member_id` in matches whose win-side is not `PENDING`.
    async fn find_completed_participations_by_member(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<CompletedParticipation>>;
}
