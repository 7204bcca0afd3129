/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use draughts::{Dimensions, Game, MoveChain, MoveError, Position, PositionError, Side};

fn strings(chains: &[MoveChain]) -> Vec<String> {
    let mut strings = chains.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    strings.sort();
    strings
}

/// Every game reachable from `game` within `depth` turns, `game` included.
fn reachable(game: &Game, depth: usize) -> Vec<Game> {
    let mut games = vec![game.clone()];
    if depth > 0 {
        for chain in game.legal_moves() {
            games.extend(reachable(&game.with_move_made(&chain), depth - 1));
        }
    }
    games
}

#[test]
fn test_adjacent_enemy_is_captured() {
    let game = Game::from_fen("W:W31-50:B1-20,28").unwrap();
    let allowed = game.allowed_moves(Side::First);
    let chain = allowed.iter().find(|c| c.origin().number() == 32).unwrap();
    assert_eq!(chain.numbers(), [32, 23]);
    assert_eq!(chain.capture_count(), 1);
    assert!(allowed.iter().all(|c| c.capture_count() == 1));
}

#[test]
fn test_longer_capture_excludes_shorter_ones() {
    let mut game = Game::from_fen("W:W32,33:B28,19").unwrap();

    let possible = game.possible_moves(Side::First);
    assert!(possible.iter().any(|c| c.to_string() == "33x22"));

    let allowed = game.allowed_moves(Side::First);
    assert_eq!(strings(&allowed), ["32x23x14"]);

    let before = game.clone();
    assert!(matches!(
        game.make_move_numbers(&[33, 22]),
        Err(MoveError::NotMaximalCapture {
            captures: 1,
            required: 2,
            ..
        })
    ));
    assert!(matches!(
        game.make_move_numbers(&[32, 23]),
        Err(MoveError::NoMatchingMove { ref suggestions, .. }) if strings(suggestions) == ["32x23x14"]
    ));
    assert_eq!(game, before);

    game.make_move(&allowed[0]).unwrap();
    assert_eq!(game.to_fen(), "B:W14,33:B");
}

#[test]
fn test_wrong_turn_leaves_board_unchanged() {
    let mut game = Game::default();
    let before = game.clone();

    let black = game.possible_moves(Side::Second);
    assert!(!black.is_empty());
    let err = game.make_move(&black[0]).unwrap_err();
    assert!(matches!(
        err,
        MoveError::WrongTurn {
            expected: Side::First,
            actual: Side::Second,
            ..
        }
    ));
    assert_eq!(game, before);
}

#[test]
fn test_king_slides_along_clear_diagonal() {
    let game = Game::from_fen("W:WK46,28:B1").unwrap();
    let king = game
        .board()
        .occupant(Position::from_number(46, game.dims()).unwrap())
        .unwrap();

    let moves = game.piece_moves(king);
    assert_eq!(strings(&moves), ["46-32", "46-37", "46-41"]);
    assert!(moves.iter().all(|c| c.moves().len() == 1));
}

#[test]
fn test_no_piece_is_captured_twice() {
    let positions = [
        "W:WK28:B22,23,32,33",
        "W:WK46:B37,28,19,17,39",
        "W:W32,33,34:B28,29,19,20,9,10",
        "B:WK3,23,24,33,34:BK45",
    ];

    for fen in positions {
        let game = Game::from_fen(fen).unwrap();
        for side in Side::all() {
            for chain in game.possible_moves(side) {
                let mut captured = chain.captured().collect::<Vec<_>>();
                let total = captured.len();
                captured.sort();
                captured.dedup();
                assert_eq!(captured.len(), total, "{chain} captures twice in {fen}");
            }
        }
    }
}

#[test]
fn test_allowed_moves_share_the_maximal_capture_count() {
    for game in reachable(&Game::default(), 3) {
        let side = game.side_to_move();
        let possible = game.possible_moves(side);
        let allowed = game.allowed_moves(side);

        let Some(max) = possible.iter().map(|c| c.capture_count()).max() else {
            assert!(allowed.is_empty());
            continue;
        };

        assert!(!allowed.is_empty());
        assert!(allowed.iter().all(|c| c.capture_count() == max));
        assert!(allowed.iter().all(|c| possible.contains(c)));
    }
}

#[test]
fn test_possible_moves_are_ordered_by_captures() {
    let game = Game::from_fen("W:W32,33,46:B28,19").unwrap();
    let counts = game
        .possible_moves(Side::First)
        .iter()
        .map(|c| c.capture_count())
        .collect::<Vec<_>>();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
    assert_eq!(counts[0], 2);
}

#[test]
fn test_crowning_is_permanent() {
    let mut game = Game::from_fen("W:W7:B40").unwrap();
    game.make_move_numbers(&[7, 1]).unwrap();

    let king = game
        .board()
        .occupant(Position::from_number(1, game.dims()).unwrap())
        .unwrap();
    assert!(game.piece(king).is_crowned());

    for _ in 0..6 {
        let Some(chain) = game.legal_moves().into_iter().next() else {
            break;
        };
        game.make_move(&chain).unwrap();
        assert!(game.piece(king).is_crowned());
    }
}

#[test]
fn test_second_side_crowns_on_bottom_row() {
    let mut game = Game::from_fen("B:W1:B42").unwrap();
    game.make_move_numbers(&[42, 47]).unwrap();
    assert_eq!(game.to_fen(), "W:W1:BK47");
}

#[test]
fn test_captured_pieces_have_no_moves() {
    let mut game = Game::from_fen("W:W32:B28,1").unwrap();
    let victim = game
        .board()
        .occupant(Position::from_number(28, game.dims()).unwrap())
        .unwrap();
    game.make_move_numbers(&[32, 23]).unwrap();

    assert!(game.piece(victim).is_captured());
    assert!(game.piece_moves(victim).is_empty());
    assert!(game.move_tree(victim).is_empty());
}

#[test]
fn test_position_numbers_round_trip_on_every_board() {
    for width in (Dimensions::MIN..=Dimensions::MAX).step_by(2) {
        for height in [Dimensions::MIN, width, Dimensions::MAX] {
            let dims = Dimensions::new(width, height).unwrap();
            for n in 1..=dims.max_position() {
                let pos = Position::from_number(n, dims).unwrap();
                let back = Position::from_coords(pos.col() as i16, pos.row() as i16, dims);
                assert_eq!(back.unwrap().number(), n);
            }

            for row in 0..height {
                for col in 0..width {
                    match Position::from_coords(col as i16, row as i16, dims) {
                        Ok(pos) => assert_eq!((pos.col(), pos.row()), (col, row)),
                        Err(err) => {
                            assert!(matches!(err, PositionError::NotPlayable { .. }), "{err}")
                        }
                    }
                }
            }

            assert!(matches!(
                Position::from_coords(width as i16, 0, dims),
                Err(PositionError::OutOfBounds { .. })
            ));
            assert!(matches!(
                Position::from_coords(0, -1, dims),
                Err(PositionError::OutOfBounds { .. })
            ));
            assert!(matches!(
                Position::from_number(dims.max_position() + 1, dims),
                Err(PositionError::OutOfRange { .. })
            ));
        }
    }
}

#[test]
fn test_smaller_boards_play() {
    let game = Game::standard(Dimensions::square(8).unwrap());
    assert_eq!(game.pieces(Side::First).count(), 12);
    assert_eq!(game.legal_moves().len(), 7);
    assert_eq!(game.perft(2), 49);
}
