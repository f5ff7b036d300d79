//! Match lifecycle and the win flags derived from the result.

mod common;

use std::sync::Arc;

use chrono::Utc;
use common::{match_request, seed_member, RacingStore};
use sungbok_server::{
    db::{MemoryStore, Store},
    error::ApiError,
    game::{
        result::{
            create_match, delete_match, get_match, list_matches, set_result, transition,
            win_flag,
        },
        types::{Match, TeamSide, WinSide},
    },
};
use uuid::Uuid;

/// Two members per side.
async fn four_player_match(store: &MemoryStore) -> Match {
    let a = seed_member(store, "ahri", "GOLD").await;
    let b = seed_member(store, "brand", "SILVER").await;
    let c = seed_member(store, "corki", "GOLD").await;
    let d = seed_member(store, "darius", "IRON").await;
    create_match(
        store,
        match_request(&[
            (&a, TeamSide::Blue),
            (&b, TeamSide::Blue),
            (&c, TeamSide::Red),
            (&d, TeamSide::Red),
        ]),
    )
    .await
    .expect("create match")
}

fn flags(m: &Match, side: TeamSide) -> Vec<bool> {
    m.participations
        .iter()
        .filter(|p| p.team_side == side)
        .map(|p| p.win)
        .collect()
}

#[test]
fn win_flag_follows_the_win_side() {
    assert!(win_flag(WinSide::Blue, TeamSide::Blue));
    assert!(!win_flag(WinSide::Blue, TeamSide::Red));
    assert!(win_flag(WinSide::Red, TeamSide::Red));
    assert!(!win_flag(WinSide::Red, TeamSide::Blue));
    assert!(!win_flag(WinSide::Pending, TeamSide::Blue));
    assert!(!win_flag(WinSide::Pending, TeamSide::Red));
}

#[test]
fn transitions_never_return_to_pending() {
    assert_eq!(transition(WinSide::Pending, Some(WinSide::Blue)).unwrap(), WinSide::Blue);
    assert_eq!(transition(WinSide::Blue, Some(WinSide::Red)).unwrap(), WinSide::Red);
    assert_eq!(transition(WinSide::Red, Some(WinSide::Red)).unwrap(), WinSide::Red);
    assert!(matches!(
        transition(WinSide::Blue, Some(WinSide::Pending)),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        transition(WinSide::Pending, None),
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn new_match_is_pending_with_no_winners() {
    let store = MemoryStore::new();
    let before = Utc::now();
    let m = four_player_match(&store).await;

    assert_eq!(m.win_side, WinSide::Pending);
    assert_eq!(m.participations.len(), 4);
    assert!(m.participations.iter().all(|p| !p.win));
    assert!(m.participations.iter().all(|p| p.match_id == m.id));
    assert!(m.played_at >= before && m.played_at <= Utc::now());

    let listed = list_matches(&store, false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].win_side, WinSide::Pending);
}

#[tokio::test]
async fn result_recomputes_every_participation() {
    let store = MemoryStore::new();
    let m = four_player_match(&store).await;

    let blue_won = set_result(&store, m.id, Some(WinSide::Blue)).await.unwrap();
    assert_eq!(blue_won.win_side, WinSide::Blue);
    assert_eq!(flags(&blue_won, TeamSide::Blue), [true, true]);
    assert_eq!(flags(&blue_won, TeamSide::Red), [false, false]);

    // correcting a mistake flips every flag, not just some
    let red_won = set_result(&store, m.id, Some(WinSide::Red)).await.unwrap();
    assert_eq!(flags(&red_won, TeamSide::Blue), [false, false]);
    assert_eq!(flags(&red_won, TeamSide::Red), [true, true]);

    let stored = get_match(&store, m.id).await.unwrap();
    assert_eq!(stored.participations, red_won.participations);
    assert!(stored.flags_consistent());
}

#[tokio::test]
async fn setting_the_same_result_twice_is_idempotent() {
    let store = MemoryStore::new();
    let m = four_player_match(&store).await;

    let once = set_result(&store, m.id, Some(WinSide::Red)).await.unwrap();
    let twice = set_result(&store, m.id, Some(WinSide::Red)).await.unwrap();

    assert_eq!(once.win_side, twice.win_side);
    assert_eq!(once.participations, twice.participations);
}

#[tokio::test]
async fn invalid_results_leave_the_match_untouched() {
    let store = MemoryStore::new();
    let m = four_player_match(&store).await;
    set_result(&store, m.id, Some(WinSide::Blue)).await.unwrap();
    let before = get_match(&store, m.id).await.unwrap();

    assert!(matches!(
        set_result(&store, m.id, Some(WinSide::Pending)).await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        set_result(&store, m.id, None).await,
        Err(ApiError::InvalidInput(_))
    ));

    assert_eq!(get_match(&store, m.id).await.unwrap(), before);
}

#[tokio::test]
async fn unknown_match_is_not_found() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();
    assert!(matches!(
        set_result(&store, missing, Some(WinSide::Blue)).await,
        Err(ApiError::NotFound { what: "match", .. })
    ));
    assert!(matches!(
        get_match(&store, missing).await,
        Err(ApiError::NotFound { what: "match", .. })
    ));
    assert!(matches!(
        delete_match(&store, missing).await,
        Err(ApiError::NotFound { .. })
    ));
}

#[tokio::test]
async fn creation_with_bad_participants_stores_nothing() {
    let store = MemoryStore::new();
    let a = seed_member(&store, "annie", "GOLD").await;
    let mut ghost = a.clone();
    ghost.id = Uuid::new_v4();

    let unknown = create_match(
        &store,
        match_request(&[(&a, TeamSide::Blue), (&ghost, TeamSide::Red)]),
    )
    .await;
    assert!(matches!(unknown, Err(ApiError::NotFound { what: "member", .. })));

    let twice = create_match(
        &store,
        match_request(&[(&a, TeamSide::Blue), (&a, TeamSide::Red)]),
    )
    .await;
    assert!(matches!(twice, Err(ApiError::InvalidInput(_))));

    let empty = create_match(&store, match_request(&[])).await;
    assert!(matches!(empty, Err(ApiError::InvalidInput(_))));

    assert!(store.find_all_matches().await.unwrap().is_empty());
}

#[tokio::test]
async fn result_given_at_creation_sets_flags_immediately() {
    let store = MemoryStore::new();
    let a = seed_member(&store, "azir", "MASTER").await;
    let b = seed_member(&store, "bard", "IRON").await;

    let mut req = match_request(&[(&a, TeamSide::Blue), (&b, TeamSide::Red)]);
    req.win_side = Some(WinSide::Red);
    let m = create_match(&store, req).await.unwrap();
    assert_eq!(m.win_side, WinSide::Red);
    assert_eq!(flags(&m, TeamSide::Blue), [false]);
    assert_eq!(flags(&m, TeamSide::Red), [true]);

    let mut pending = match_request(&[(&a, TeamSide::Blue), (&b, TeamSide::Red)]);
    pending.win_side = Some(WinSide::Pending);
    let m = create_match(&store, pending).await.unwrap();
    assert_eq!(m.win_side, WinSide::Pending);
    assert!(m.participations.iter().all(|p| !p.win));
}

#[tokio::test]
async fn pending_filter_and_delete() {
    let store = MemoryStore::new();
    let done = four_player_match(&store).await;
    let open = create_match(
        &store,
        match_request(&[(&seed_member(&store, "ezreal", "GOLD").await, TeamSide::Blue)]),
    )
    .await
    .unwrap();
    set_result(&store, done.id, Some(WinSide::Blue)).await.unwrap();

    let pending = list_matches(&store, true).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, open.id);
    assert_eq!(list_matches(&store, false).await.unwrap().len(), 2);

    let blue_member = done.participations[0].member_id;
    delete_match(&store, done.id).await.unwrap();
    assert!(store
        .find_completed_participations_by_member(blue_member)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(list_matches(&store, false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_does_not_resurrect_a_deleted_match() {
    let store = MemoryStore::new();
    let mut m = four_player_match(&store).await;
    assert!(store.delete_match(m.id).await.unwrap());

    m.apply_result(WinSide::Blue).unwrap();
    assert!(store.update_match(&m).await.unwrap().is_none());
    assert!(store.find_match_by_id(m.id).await.unwrap().is_none());
    assert!(store
        .find_completed_participations_by_member(m.participations[0].member_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn result_for_a_match_deleted_mid_update_is_not_found() {
    let store = RacingStore::default();
    let a = seed_member(&store.inner, "sona", "GOLD").await;
    let b = seed_member(&store.inner, "swain", "GOLD").await;
    let m = create_match(
        &store,
        match_request(&[(&a, TeamSide::Blue), (&b, TeamSide::Red)]),
    )
    .await
    .unwrap();

    let racing = RacingStore {
        delete_after_load: true,
        ..store
    };
    assert!(matches!(
        set_result(&racing, m.id, Some(WinSide::Blue)).await,
        Err(ApiError::NotFound { what: "match", .. })
    ));
    assert!(racing.inner.find_match_by_id(m.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_mixed_flags() {
    let store = Arc::new(MemoryStore::new());
    let match_id = four_player_match(&store).await.id;

    let mut writers = Vec::new();
    for i in 0..50 {
        let store = store.clone();
        let side = if i % 2 == 0 { WinSide::Blue } else { WinSide::Red };
        writers.push(tokio::spawn(async move {
            set_result(&*store, match_id, Some(side)).await.unwrap();
        }));
    }

    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let seen = get_match(&*store, match_id).await.unwrap();
                assert!(seen.flags_consistent(), "inconsistent read: {seen:?}");
                tokio::task::yield_now().await;
            }
        })
    };

    for w in writers {
        w.await.unwrap();
    }
    reader.await.unwrap();

    let last = get_match(&*store, match_id).await.unwrap();
    assert!(last.win_side.is_completed());
    assert!(last.flags_consistent());
}
