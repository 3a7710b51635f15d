//! Perft golden values for every shipped game.
//!
//! Each tuple is (ongoing, player 1 wins, player 2 wins, draws, nodes).

use ludus_core::{PerftStats, divide, perft};
use ludus_games::{Gobblet, Mancala, Playable, TicTacToe};

type Expected = (u64, u64, u64, u64, u64);

fn check<P: Playable>(depth: u8, expected: Expected) {
    let mut pos = P::new_game();
    let start = pos.clone();
    let stats = perft(&mut pos, depth);
    let (ongoing, player1, player2, draw, nodes) = expected;
    assert_eq!(
        stats,
        PerftStats {
            ongoing,
            player1,
            player2,
            draw,
            nodes,
        },
        "{} perft({depth})",
        P::NAME
    );
    assert_eq!(pos.to_string(), start.to_string(), "perft must leave the position untouched");
}

// --- Tic-tac-toe ---

#[test]
fn tictactoe_shallow() {
    check::<TicTacToe>(0, (1, 0, 0, 0, 1));
    check::<TicTacToe>(1, (9, 0, 0, 0, 10));
    check::<TicTacToe>(2, (72, 0, 0, 0, 82));
    check::<TicTacToe>(3, (504, 0, 0, 0, 586));
    check::<TicTacToe>(4, (3_024, 0, 0, 0, 3_610));
}

#[test]
fn tictactoe_first_wins_at_depth_5() {
    check::<TicTacToe>(5, (13_680, 1_440, 0, 0, 17_290));
    check::<TicTacToe>(6, (49_392, 1_440, 5_328, 0, 66_682));
}

#[test]
fn tictactoe_full_tree() {
    check::<TicTacToe>(7, (100_224, 49_392, 5_328, 0, 166_906));
    check::<TicTacToe>(8, (127_872, 49_392, 77_904, 0, 294_778));
    check::<TicTacToe>(9, (0, 131_184, 77_904, 46_080, 294_778));
}

#[test]
fn tictactoe_tree_stops_growing_past_nine() {
    let mut pos = TicTacToe::new();
    assert_eq!(perft(&mut pos, 10), perft(&mut pos, 9));
}

// --- Mancala ---

#[test]
fn mancala_shallow() {
    check::<Mancala>(1, (6, 0, 0, 0, 7));
    check::<Mancala>(2, (35, 0, 0, 0, 42));
    check::<Mancala>(3, (185, 0, 0, 0, 227));
    check::<Mancala>(4, (942, 0, 0, 0, 1_169));
}

#[test]
fn mancala_deeper() {
    check::<Mancala>(5, (4_690, 0, 0, 0, 5_859));
    check::<Mancala>(6, (23_233, 0, 0, 0, 29_092));
    check::<Mancala>(7, (114_430, 0, 0, 0, 143_522));
}

// --- Gobblet Gobblers ---

#[test]
fn gobblet_shallow() {
    check::<Gobblet>(1, (27, 0, 0, 0, 28));
    check::<Gobblet>(2, (675, 0, 0, 0, 703));
    check::<Gobblet>(3, (20_313, 0, 0, 0, 21_016));
}

#[test]
#[ignore] // slow
fn gobblet_depth_4() {
    check::<Gobblet>(4, (572_472, 0, 0, 0, 593_488));
}

// --- Divide ---

#[test]
fn divide_sums_to_perft() {
    let mut pos = TicTacToe::new();
    let parts = divide(&mut pos, 5);
    assert_eq!(parts.len(), 9);
    assert_eq!(parts[4].0, "4");

    let leaves: u64 = parts.iter().map(|(_, s)| s.leaves()).sum();
    assert_eq!(leaves, perft(&mut pos, 5).leaves());
}

#[test]
fn divide_depth_one_counts_each_move_once() {
    let mut pos = Mancala::new();
    let parts = divide(&mut pos, 1);
    let names: Vec<&str> = parts.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "e", "f"]);
    assert!(parts.iter().all(|(_, s)| s.leaves() == 1));
}
