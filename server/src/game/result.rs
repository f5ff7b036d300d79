//! Match lifecycle: creation, result assignment and the win flags derived
//! from it.
//!
//! ```text
//! PENDING ──► BLUE ◄──► RED ◄── PENDING
//! ```
//! A completed match may be corrected to the other side but never goes back
//! to `PENDING`. Whenever the win-side changes, every participation's win
//! flag is recomputed in the same value before it is handed to the store,
//! and the store commits both together.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use super::types::{Match, Member, NewMatchRequest, Participation, TeamSide, WinSide};
use crate::{
    db::Store,
    error::{ApiError, ApiResult},
};

/// A participant won iff its side is the match's win-side.
pub fn win_flag(win_side: WinSide, team_side: TeamSide) -> bool {
    win_side.winner() == Some(team_side)
}

/// Validate a requested result against the current win-side.
pub fn transition(from: WinSide, to: Option<WinSide>) -> ApiResult<WinSide> {
    match to {
        None => Err(ApiError::invalid("Win side is required")),
        Some(WinSide::Pending) => Err(ApiError::invalid(format!(
            "Win side must be BLUE or RED (match is {from})"
        ))),
        Some(side) => Ok(side),
    }
}

impl Match {
    /// Set the win-side and recompute every participation's flag.
    /// On error the match is left untouched.
    pub fn apply_result(&mut self, side: WinSide) -> ApiResult<()> {
        let side = transition(self.win_side, Some(side))?;
        self.win_side = side;
        self.recompute_flags();
        self.updated_at = Utc::now();
        Ok(())
    }

    fn recompute_flags(&mut self) {
        let side = self.win_side;
        for p in &mut self.participations {
            p.win = win_flag(side, p.team_side);
        }
    }

    /// True if every flag agrees with the current win-side.
    pub fn flags_consistent(&self) -> bool {
        self.participations
            .iter()
            .all(|p| p.win == win_flag(self.win_side, p.team_side))
    }
}

/// Build an unsaved match from a request whose members are already resolved.
///
/// `members` must contain every `memberId` the request names.
pub fn build_match(req: NewMatchRequest, members: &[Member]) -> ApiResult<Match> {
    if req.players.is_empty() {
        return Err(ApiError::invalid("A match needs at least one participant"));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = req.players.iter().find(|p| !seen.insert(p.member_id)) {
        return Err(ApiError::invalid(format!(
            "Member {} is listed more than once",
            dup.member_id
        )));
    }

    let now = Utc::now();
    let match_id = Uuid::new_v4();

    let participations = req
        .players
        .into_iter()
        .map(|p| {
            if !members.iter().any(|m| m.id == p.member_id) {
                return Err(ApiError::member_not_found(p.member_id));
            }
            Ok(Participation {
                id: Uuid::new_v4(),
                match_id,
                member_id: p.member_id,
                team_side: p.team_side,
                win: false,
                position: p.position,
                champion_name: p.champion_name,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let mut m = Match {
        id: match_id,
        played_at: req.played_at.unwrap_or(now),
        info: req.info,
        win_side: WinSide::Pending,
        participations,
        created_at: now,
        updated_at: now,
    };

    if let Some(side) = req.win_side.filter(|s| s.is_completed()) {
        m.apply_result(side)?;
    }
    Ok(m)
}

/// Create a match and all its participations as one unit.
pub async fn create_match(store: &dyn Store, req: NewMatchRequest) -> ApiResult<Match> {
    let mut members = Vec::with_capacity(req.players.len());
    for p in &req.players {
        let member = store
            .find_member_by_id(p.member_id)
            .await?
            .ok_or_else(|| ApiError::member_not_found(p.member_id))?;
        members.push(member);
    }

    let m = build_match(req, &members)?;
    let saved = store.insert_match(&m).await?;
    log::info!(
        "match {} created with {} players ({})",
        saved.id,
        saved.participations.len(),
        saved.win_side
    );
    Ok(saved)
}

/// Record (or correct) the winner of a match.
pub async fn set_result(
    store: &dyn Store,
    match_id: Uuid,
    win_side: Option<WinSide>,
) -> ApiResult<Match> {
    let mut m = store
        .find_match_by_id(match_id)
        .await?
        .ok_or_else(|| ApiError::match_not_found(match_id))?;

    let previous = m.win_side;
    let side = transition(previous, win_side)?;
    m.apply_result(side)?;

    // Deleted since we loaded it: do not bring it back.
    let saved = store
        .update_match(&m)
        .await?
        .ok_or_else(|| ApiError::match_not_found(match_id))?;
    log::info!("match {match_id} result {previous} -> {}", saved.win_side);
    Ok(saved)
}

pub async fn get_match(store: &dyn Store, match_id: Uuid) -> ApiResult<Match> {
    store
        .find_match_by_id(match_id)
        .await?
        .ok_or_else(|| ApiError::match_not_found(match_id))
}

/// All matches, newest first; `pending_only` keeps the ones still awaiting a result.
pub async fn list_matches(store: &dyn Store, pending_only: bool) -> ApiResult<Vec<Match>> {
    let mut all = store.find_all_matches().await?;
    if pending_only {
        all.retain(|m| !m.win_side.is_completed());
    }
    Ok(all)
}

pub async fn delete_match(store: &dyn Store, match_id: Uuid) -> ApiResult<()> {
    if !store.delete_match(match_id).await? {
        return Err(ApiError::match_not_found(match_id));
    }
    log::info!("match {match_id} deleted");
    Ok(())
}
