//! Postgres-backed [`Store`].

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    models::{CompletedParticipationRow, MatchPlayerRow, MatchRow, MemberRow},
    DuplicateRiotId, Store,
};
use crate::game::types::{CompletedParticipation, Match, Member, NewMember};

const MEMBER_COLUMNS: &str = "id, name, riot_id, riot_puuid, tier, created_at";
const MATCH_COLUMNS: &str = "id, played_at, info, win_side, created_at, updated_at";
const PLAYER_COLUMNS: &str =
    "id, match_id, member_id, team_side, win, position, champion_name";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, then bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connecting to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read-only transaction on one snapshot, so a match row and its
    /// players are always seen from the same commit.
    async fn snapshot(&self) -> Result<Transaction<'_, Postgres>> {
        let mut tx = self.pool.begin().await.context("opening read transaction")?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .context("setting snapshot isolation")?;
        Ok(tx)
    }
}

async fn players_of(conn: &mut PgConnection, match_id: Uuid) -> Result<Vec<MatchPlayerRow>> {
    sqlx::query_as::<_, MatchPlayerRow>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM match_players WHERE match_id = $1 ORDER BY slot"
    ))
    .bind(match_id)
    .fetch_all(conn)
    .await
    .context("fetching match players")
}

/// Replace the participation set of `m` with `m.participations`, in order.
async fn write_players(conn: &mut PgConnection, m: &Match) -> Result<Vec<MatchPlayerRow>> {
    let keep: Vec<Uuid> = m.participations.iter().map(|p| p.id).collect();
    sqlx::query("DELETE FROM match_players WHERE match_id = $1 AND NOT (id = ANY($2))")
        .bind(m.id)
        .bind(&keep)
        .execute(&mut *conn)
        .await
        .context("removing dropped participations")?;

    let mut players = Vec::with_capacity(m.participations.len());
    for (slot, p) in m.participations.iter().enumerate() {
        let slot = i16::try_from(slot).context("participation slot out of range")?;
        let row = sqlx::query_as::<_, MatchPlayerRow>(&format!(
            r#"
            INSERT INTO match_players
                   (id, match_id, member_id, slot, team_side, win, position, champion_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
              SET member_id     = EXCLUDED.member_id,
                  slot          = EXCLUDED.slot,
                  team_side     = EXCLUDED.team_side,
                  win           = EXCLUDED.win,
                  position      = EXCLUDED.position,
                  champion_name = EXCLUDED.champion_name
            RETURNING {PLAYER_COLUMNS}
            "#
        ))
        .bind(p.id)
        .bind(m.id)
        .bind(p.member_id)
        .bind(slot)
        .bind(p.team_side.as_str())
        .bind(p.win)
        .bind(&p.position)
        .bind(&p.champion_name)
        .fetch_one(&mut *conn)
        .await
        .context("upserting participation")?;
        players.push(row);
    }
    Ok(players)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("pinging Postgres")?;
        Ok(())
    }

    async fn find_member_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching member")?;
        Ok(row.map(Member::from))
    }

    async fn find_members_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .context("fetching members by id")?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_member_by_riot_id(&self, riot_id: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE riot_id = $1"
        ))
        .bind(riot_id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching member by riot id")?;
        Ok(row.map(Member::from))
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY created_at, name"
        ))
        .fetch_all(&self.pool)
        .await
        .context("listing members")?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn insert_member(&self, member: NewMember) -> Result<Member> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r#"INSERT INTO members (id, name, riot_id, riot_puuid, tier, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $6)
               RETURNING {MEMBER_COLUMNS}"#
        ))
        .bind(Uuid::new_v4())
        .bind(&member.name)
        .bind(&member.riot_id)
        .bind(&member.riot_puuid)
        .bind(&member.tier)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                anyhow::Error::new(DuplicateRiotId(member.riot_id.clone()))
            }
            other => anyhow::Error::new(other).context("inserting member"),
        })?;
        Ok(row.into())
    }

    async fn insert_match(&self, m: &Match) -> Result<Match> {
        let mut tx = self.pool.begin().await.context("opening transaction")?;

        let match_row = sqlx::query_as::<_, MatchRow>(&format!(
            r#"
            INSERT INTO matches (id, played_at, info, win_side, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(m.id)
        .bind(m.played_at)
        .bind(&m.info)
        .bind(m.win_side.as_str())
        .bind(m.created_at)
        .bind(m.updated_at)
        .fetch_one(&mut *tx)
        .await
        .context("inserting match")?;

        let players = write_players(&mut tx, m).await?;
        tx.commit().await.context("committing match")?;
        match_row.into_match(players)
    }

    async fn update_match(&self, m: &Match) -> Result<Option<Match>> {
        let mut tx = self.pool.begin().await.context("opening transaction")?;

        // The row lock taken here orders us against a concurrent delete.
        let Some(match_row) = sqlx::query_as::<_, MatchRow>(&format!(
            r#"
            UPDATE matches
               SET played_at  = $2,
                   info       = $3,
                   win_side   = $4,
                   updated_at = $5
             WHERE id = $1
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(m.id)
        .bind(m.played_at)
        .bind(&m.info)
        .bind(m.win_side.as_str())
        .bind(m.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .context("updating match")?
        else {
            tx.rollback().await.context("rolling back match update")?;
            return Ok(None);
        };

        let players = write_players(&mut tx, m).await?;
        tx.commit().await.context("committing match")?;
        match_row.into_match(players).map(Some)
    }

    async fn find_match_by_id(&self, id: Uuid) -> Result<Option<Match>> {
        let mut tx = self.snapshot().await?;
        let Some(row) = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("fetching match")?
        else {
            return Ok(None);
        };

        let players = players_of(&mut tx, id).await?;
        tx.commit().await.context("closing read transaction")?;
        row.into_match(players).map(Some)
    }

    async fn find_all_matches(&self) -> Result<Vec<Match>> {
        let mut tx = self.snapshot().await?;
        let rows = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches ORDER BY played_at DESC, created_at DESC"
        ))
        .fetch_all(&mut *tx)
        .await
        .context("listing matches")?;

        let player_rows = sqlx::query_as::<_, MatchPlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM match_players ORDER BY match_id, slot"
        ))
        .fetch_all(&mut *tx)
        .await
        .context("listing match players")?;
        tx.commit().await.context("closing read transaction")?;

        let mut by_match: HashMap<Uuid, Vec<MatchPlayerRow>> = HashMap::new();
        for p in player_rows {
            by_match.entry(p.match_id).or_default().push(p);
        }

        rows.into_iter()
            .map(|r| {
                let players = by_match.remove(&r.id).unwrap_or_default();
                r.into_match(players)
            })
            .collect()
    }

    async fn delete_match(&self, id: Uuid) -> Result<bool> {
        let rows = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting match")?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn find_completed_participations_by_member(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<CompletedParticipation>> {
        let rows = sqlx::query_as::<_, CompletedParticipationRow>(
            r#"
            SELECT mp.id       AS participation_id,
                   mp.match_id AS match_id,
                   m.win_side  AS win_side,
                   mp.team_side AS team_side,
                   mp.win      AS win
              FROM match_players mp
              JOIN matches m ON m.id = mp.match_id
             WHERE mp.member_id = $1
               AND m.win_side <> 'PENDING'
             ORDER BY m.played_at
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .context("fetching completed participations")?;

        rows.into_iter()
            .map(CompletedParticipation::try_from)
            .collect()
    }
}
