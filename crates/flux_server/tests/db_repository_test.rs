//! Tests for database repository operations.

use chrono::{Duration, Utc};
use flux_board::Tile;
use tempfile::NamedTempFile;

use flux_server::{GameRepository, NewGameStateRecord, NewReferral, NewUser, UserProfileUpdate};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

fn new_user(telegram_id: i64, code: &str) -> NewUser {
    NewUser::new(
        telegram_id,
        format!("user{}", telegram_id),
        "First".to_string(),
        "Last".to_string(),
        code.to_string(),
    )
}

fn state(user_id: i32, score: i64, moves: i32, tiles: &[Tile]) -> NewGameStateRecord {
    NewGameStateRecord::new(user_id, score, moves, tiles, Utc::now().naive_utc())
        .expect("Encode failed")
}

#[test]
fn test_empty_path_rejected() {
    assert!(GameRepository::new("  ".to_string()).is_err());
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, repo) = setup_test_db();
    assert_eq!(repo.run_migrations().expect("Rerun failed"), 0);
}

#[test]
fn test_create_user() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(42, "AAAA0001")).expect("Create failed");
    assert!(*user.id() > 0);
    assert_eq!(*user.telegram_id(), 42);
    assert_eq!(user.referral_code(), "AAAA0001");
    assert_eq!(*user.points(), 0);
}

#[test]
fn test_duplicate_telegram_id_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_user(new_user(42, "AAAA0001")).expect("First create failed");
    let result = repo.create_user(new_user(42, "AAAA0002"));
    assert!(result.is_err(), "Duplicate telegram id should fail");
}

#[test]
fn test_duplicate_referral_code_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_user(new_user(1, "SAMECODE")).expect("First create failed");
    assert!(repo.create_user(new_user(2, "SAMECODE")).is_err());
}

#[test]
fn test_lookup_by_telegram_id_and_code() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "LOOKUP01")).expect("Create failed");

    let by_tid = repo.get_user_by_telegram_id(7).expect("Query failed");
    assert_eq!(by_tid.as_ref().map(|u| *u.id()), Some(*user.id()));

    let by_code = repo.get_user_by_referral_code("LOOKUP01").expect("Query failed");
    assert_eq!(by_code.map(|u| *u.id()), Some(*user.id()));

    assert!(repo.get_user_by_telegram_id(8).expect("Query failed").is_none());
    assert!(repo.get_user_by_referral_code("NOPE").expect("Query failed").is_none());
}

#[test]
fn test_update_profile() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "PROFILE1")).expect("Create failed");
    let updated = repo
        .update_user_profile(
            *user.id(),
            UserProfileUpdate::new(
                "renamed".to_string(),
                "New".to_string(),
                String::new(),
                Utc::now().naive_utc(),
            ),
        )
        .expect("Update failed");
    assert_eq!(updated.username(), "renamed");
    assert_eq!(updated.first_name(), "New");
    assert_eq!(updated.last_name(), "");
    assert_eq!(updated.referral_code(), "PROFILE1");
}

#[test]
fn test_add_points_accumulates() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "POINTS01")).expect("Create failed");
    repo.add_points(*user.id(), 15).expect("Add failed");
    let user = repo.add_points(*user.id(), 30).expect("Add failed");
    assert_eq!(*user.points(), 45);
}

#[test]
fn test_create_referral_credits_referrer() {
    let (_db, repo) = setup_test_db();
    let referrer = repo.create_user(new_user(1, "REFERRER")).expect("Create failed");
    let referred = repo.create_user(new_user(2, "REFERRED")).expect("Create failed");

    let (record, referrer) = repo
        .create_referral(NewReferral::new(*referrer.id(), *referred.id(), 0.05), 50)
        .expect("Referral failed");
    assert_eq!(*record.referrer_id(), *referrer.id());
    assert_eq!(*record.referred_user_id(), *referred.id());
    assert_eq!(*referrer.points(), 50);

    assert!(
        repo.find_referral(*referrer.id(), *referred.id())
            .expect("Query failed")
            .is_some()
    );
    assert_eq!(repo.count_referrals(*referrer.id()).expect("Count failed"), 1);
}

#[test]
fn test_duplicate_referral_rolls_back_points() {
    let (_db, repo) = setup_test_db();
    let referrer = repo.create_user(new_user(1, "REFERRER")).expect("Create failed");
    let referred = repo.create_user(new_user(2, "REFERRED")).expect("Create failed");

    repo.create_referral(NewReferral::new(*referrer.id(), *referred.id(), 0.05), 50)
        .expect("First referral failed");
    let second = repo.create_referral(NewReferral::new(*referrer.id(), *referred.id(), 0.05), 50);
    assert!(second.is_err(), "Duplicate referral should fail");

    let referrer = repo
        .get_user_by_telegram_id(1)
        .expect("Query failed")
        .expect("Referrer missing");
    assert_eq!(*referrer.points(), 50, "Failed insert must not credit points");
}

#[test]
fn test_create_referred_user_in_one_step() {
    let (_db, repo) = setup_test_db();
    let referrer = repo.create_user(new_user(1, "REFERRER")).expect("Create failed");
    let user = repo
        .create_referred_user(new_user(2, "NEWCOMER"), *referrer.id(), 10.0, 100)
        .expect("Create failed");

    let listed = repo.list_referred_users(*referrer.id()).expect("List failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(*listed[0].telegram_id(), *user.telegram_id());
    assert_eq!(*listed[0].earnings(), 10.0);

    let referrer = repo
        .get_user_by_telegram_id(1)
        .expect("Query failed")
        .expect("Referrer missing");
    assert_eq!(*referrer.points(), 100);
}

#[test]
fn test_list_referred_users_in_referral_order() {
    let (_db, repo) = setup_test_db();
    let referrer = repo.create_user(new_user(1, "REFERRER")).expect("Create failed");
    for (tid, code) in [(3, "THIRD000"), (2, "SECOND00")] {
        let referred = repo.create_user(new_user(tid, code)).expect("Create failed");
        repo.create_referral(NewReferral::new(*referrer.id(), *referred.id(), 0.05), 50)
            .expect("Referral failed");
    }
    let listed = repo.list_referred_users(*referrer.id()).expect("List failed");
    let tids: Vec<i64> = listed.iter().map(|r| *r.telegram_id()).collect();
    assert_eq!(tids, vec![3, 2]);
}

#[test]
fn test_game_state_round_trip() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "GAMER001")).expect("Create failed");
    let tiles = [Tile::Red, Tile::Blue, Tile::Green, Tile::Yellow];

    let record = repo
        .create_game_state(state(*user.id(), 0, 30, &tiles))
        .expect("Create failed");
    assert_eq!(record.tiles(), r#"["red","blue","green","yellow"]"#);
    assert_eq!(record.parse_tiles().expect("Parse failed"), tiles.to_vec());

    let latest = repo
        .latest_game_state(*user.id())
        .expect("Query failed")
        .expect("State missing");
    assert_eq!(*latest.id(), *record.id());
}

#[test]
fn test_latest_game_state_prefers_most_recent() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "GAMER001")).expect("Create failed");
    let older = Utc::now().naive_utc() - Duration::hours(1);
    repo.create_game_state(
        NewGameStateRecord::new(*user.id(), 10, 20, &[Tile::Red], older).expect("Encode failed"),
    )
    .expect("Create failed");
    let newer = repo
        .create_game_state(state(*user.id(), 0, 30, &[Tile::Blue]))
        .expect("Create failed");

    let latest = repo
        .latest_game_state(*user.id())
        .expect("Query failed")
        .expect("State missing");
    assert_eq!(*latest.id(), *newer.id());
}

#[test]
fn test_save_turn_updates_state_and_points() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "GAMER001")).expect("Create failed");
    let record = repo
        .create_game_state(state(*user.id(), 0, 30, &[Tile::Red]))
        .expect("Create failed");

    let (saved, user) = repo
        .save_turn(*record.id(), state(*user.id(), 15, 29, &[Tile::Green]), 15)
        .expect("Save failed");
    assert_eq!(*saved.score(), 15);
    assert_eq!(*saved.moves(), 29);
    assert_eq!(saved.parse_tiles().expect("Parse failed"), vec![Tile::Green]);
    assert_eq!(*user.points(), 15);
}

#[test]
fn test_update_missing_state_fails() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user(new_user(7, "GAMER001")).expect("Create failed");
    assert!(
        repo.update_game_state(999, state(*user.id(), 0, 30, &[Tile::Red]))
            .is_err()
    );
}
