//! Tests for session score and move bookkeeping.

use flux_board::{
    Board, EngineError, GameSession, PlayError, Rules, ScriptedTiles, Tile, find_matches,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn scoring_board() -> Board {
    Board::from_rows(&[
        "RRGRPORG", "BYPORGBY", "PORGBYPO", "RGBYPORG", "BYPORGBY", "PORGBYPO", "RGBYPORG",
        "BYPORGBY",
    ])
    .unwrap()
}

fn settling_tiles() -> ScriptedTiles {
    ScriptedTiles::new(vec![Tile::Yellow, Tile::Blue, Tile::Orange])
}

#[test]
fn test_new_session_starts_fresh() {
    let rules = Rules::default();
    let session = GameSession::new(&rules, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(session.score(), 0);
    assert_eq!(session.moves_remaining(), 30);
    assert!(!session.is_over());
    assert!(find_matches(session.board()).is_empty());
}

#[test]
fn test_accepted_swap_scores_and_spends_move() {
    let rules = Rules::default();
    let mut session = GameSession::from_parts(scoring_board(), 100, 30);

    let turn = session.play(2, 3, &rules, &mut settling_tiles()).unwrap();
    assert!(turn.accepted);
    assert_eq!(turn.score_delta, 15);
    assert_eq!(session.score(), 115);
    assert_eq!(session.moves_remaining(), 29);
    assert_eq!(session.board().get(0), Some(Tile::Yellow));
}

#[test]
fn test_ineffective_swap_spends_move_only() {
    let rules = Rules::default();
    let board = scoring_board();
    let mut session = GameSession::from_parts(board.clone(), 0, 30);

    let turn = session.play(3, 4, &rules, &mut settling_tiles()).unwrap();
    assert!(!turn.accepted);
    assert_eq!(turn.score_delta, 0);
    assert_eq!(session.moves_remaining(), 29);
    assert_eq!(session.board(), &board);
}

#[test]
fn test_non_adjacent_swap_keeps_move() {
    let rules = Rules::default();
    let mut session = GameSession::from_parts(scoring_board(), 0, 30);

    let result = session.play(0, 2, &rules, &mut settling_tiles());
    assert_eq!(result, Err(PlayError::NotAdjacent { from: 0, to: 2 }));
    assert_eq!(session.moves_remaining(), 30);
}

#[test]
fn test_no_moves_remaining() {
    let rules = Rules::default();
    let mut session = GameSession::from_parts(scoring_board(), 40, 0);
    assert!(session.is_over());

    let result = session.play(2, 3, &rules, &mut settling_tiles());
    assert_eq!(result, Err(PlayError::NoMovesRemaining));
    assert_eq!(session.score(), 40);
}

#[test]
fn test_last_move_ends_session() {
    let rules = Rules::default();
    let mut session = GameSession::from_parts(scoring_board(), 0, 1);
    session.play(2, 3, &rules, &mut settling_tiles()).unwrap();
    assert!(session.is_over());
}

#[test]
fn test_engine_failure_leaves_session_untouched() {
    let rules = Rules::default().with_max_cascade_passes(2);
    let board = scoring_board();
    let mut session = GameSession::from_parts(board.clone(), 10, 30);

    let result = session.play(2, 3, &rules, &mut ScriptedTiles::new(vec![Tile::Red]));
    assert_eq!(
        result,
        Err(PlayError::Engine(EngineError::CascadeRunaway { passes: 2 }))
    );
    assert_eq!(session.score(), 10);
    assert_eq!(session.moves_remaining(), 30);
    assert_eq!(session.board(), &board);
}

#[test]
fn test_reset_restores_initial_values() {
    let rules = Rules::default();
    let mut session = GameSession::from_parts(scoring_board(), 75, 3);
    session.reset(&rules, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(session.score(), 0);
    assert_eq!(session.moves_remaining(), 30);
}

#[test]
fn test_session_serializes_board_as_color_names() {
    let session = GameSession::from_parts(Board::from_rows(&["RG"]).unwrap(), 5, 2);
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["board"]["tiles"], serde_json::json!(["red", "green"]));
    assert_eq!(json["score"], 5);
    assert_eq!(json["moves_remaining"], 2);
}
