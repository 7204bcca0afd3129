/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};
use tracing::debug;

use super::{Dimensions, Piece, PieceId, Position, Side, Table};

/// A single cell of the grid.
///
/// Only playable squares have a [`Position`], and only playable squares are ever occupied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Square {
    col: u8,
    row: u8,
    position: Option<Position>,
    occupant: Option<PieceId>,
}

impl Square {
    /// Zero-based column, left-to-right.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Zero-based row, bottom-to-top.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// The position of this square, or `None` if it is not playable.
    #[inline(always)]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// Returns `true` if pieces may enter this square.
    #[inline(always)]
    pub const fn is_playable(&self) -> bool {
        self.position.is_some()
    }

    /// The piece occupying this square, if any.
    #[inline(always)]
    pub const fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }
}

/// The grid of squares and every piece that took part in the game, captured or not.
///
/// Square occupancy is the single source of truth for whether a square is empty.
/// All mutation goes through methods that keep occupancy and piece state in sync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: Table<Square>,
    pieces: Vec<Piece>,
}

impl Board {
    /// Creates a board of the given [`Dimensions`] without any pieces.
    pub fn empty(dims: Dimensions) -> Self {
        let squares = Table::from_fn(dims, |col, row| Square {
            col,
            row,
            position: Position::from_coords(col as i16, row as i16, dims).ok(),
            occupant: None,
        });

        Self {
            squares,
            pieces: Vec::new(),
        }
    }

    /// Creates a board with both sides in their starting setup.
    ///
    /// The second-turn side occupies the lowest position numbers, the first-turn side the highest.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Board, Dimensions, Side};
    /// let board = Board::standard(Dimensions::INTERNATIONAL);
    /// assert_eq!(board.pieces_of(Side::First).count(), 20);
    /// assert_eq!(board.pieces_of(Side::Second).count(), 20);
    /// ```
    pub fn standard(dims: Dimensions) -> Self {
        let mut board = Self::empty(dims);
        let per_side = dims.pieces_per_side();
        let max = dims.max_position();

        for position in dims.positions() {
            let side = if position.number() <= per_side {
                Side::Second
            } else if position.number() > max - per_side {
                Side::First
            } else {
                continue;
            };
            board.place(Piece::new(side, position));
        }

        board
    }

    /// The grid size of this board.
    #[inline(always)]
    pub const fn dims(&self) -> Dimensions {
        self.squares.dims()
    }

    /// Adds `piece` to the board, returning its identifier.
    ///
    /// Fails if the piece is captured or its square is taken.
    pub fn add_piece(&mut self, piece: Piece) -> Result<PieceId> {
        let Some(position) = piece.position() else {
            bail!("Cannot add a captured piece to the board");
        };
        if let Some(other) = self.piece_at(position) {
            bail!("Cannot add {piece}: square {position} is occupied by {other}");
        }

        Ok(self.place(piece))
    }

    /// Adds a piece known to stand on an empty square.
    fn place(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len() as u16);
        if let Some(position) = piece.position() {
            self.squares[position].occupant = Some(id);
        }
        self.pieces.push(piece);
        id
    }

    /// Fetch the piece identified by `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this board.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Returns an iterator over every piece on this board, including captured ones.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| (PieceId(i as u16), piece))
    }

    /// Returns an iterator over the pieces of `side` that have not been captured.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces()
            .filter(move |(_, piece)| piece.side() == side && !piece.is_captured())
    }

    /// Fetch the [`Square`] at `position`.
    #[inline(always)]
    pub fn square(&self, position: Position) -> &Square {
        &self.squares[position]
    }

    /// Returns an iterator over all squares, top row first, each row left-to-right.
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// The identifier of the piece standing on `position`, if any.
    #[inline(always)]
    pub fn occupant(&self, position: Position) -> Option<PieceId> {
        self.squares[position].occupant
    }

    /// The piece standing on `position`, if any.
    #[inline(always)]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.occupant(position).map(|id| self.piece(id))
    }

    /// Returns `true` if no piece stands on `position`.
    #[inline(always)]
    pub fn is_empty(&self, position: Position) -> bool {
        self.occupant(position).is_none()
    }

    /// Moves the piece `id` to `to`, updating both squares.
    ///
    /// # Panics
    ///
    /// If the piece was captured, or `to` is occupied by another piece.
    pub(crate) fn move_piece(&mut self, id: PieceId, to: Position) {
        let from = self.pieces[id.index()]
            .position()
            .unwrap_or_else(|| panic!("Piece {id} was captured already and cannot move to {to}"));

        assert!(
            self.occupant(to).map_or(true, |other| other == id),
            "Piece {id} cannot move to {to}: square is occupied"
        );

        self.squares[from].occupant = None;
        self.squares[to].occupant = Some(id);
        self.pieces[id.index()].move_to(to);
    }

    /// Removes the piece `id` from its square and marks it captured.
    ///
    /// # Panics
    ///
    /// If the piece was captured already.
    pub(crate) fn capture_piece(&mut self, id: PieceId) {
        let position = self.pieces[id.index()]
            .position()
            .unwrap_or_else(|| panic!("Piece {id} was captured already"));

        debug!(piece = %id, %position, "removing captured piece");
        self.squares[position].occupant = None;
        self.pieces[id.index()].capture();
    }

    /// Crowns the piece `id`.
    pub(crate) fn crown_piece(&mut self, id: PieceId) {
        self.pieces[id.index()].crown();
    }
}

impl Default for Board {
    /// An international draughts board in its starting setup.
    fn default() -> Self {
        Self::standard(Dimensions::default())
    }
}

impl fmt::Display for Board {
    /// Draws the grid: piece glyphs on occupied squares, position numbers on empty playable squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.squares.map(|square| match (square.position, square.occupant) {
            (_, Some(id)) => self.piece(id).glyph().to_string(),
            (Some(position), None) => position.to_string(),
            (None, None) => String::new(),
        });

        write!(f, "{cells}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pos(n: u16) -> Position {
        Position::from_number(n, Dimensions::INTERNATIONAL).unwrap()
    }

    #[test]
    fn test_standard_setup() {
        let board = Board::default();
        for n in 1..=20 {
            assert_eq!(board.piece_at(pos(n)).unwrap().side(), Side::Second);
        }
        for n in 21..=30 {
            assert!(board.is_empty(pos(n)));
        }
        for n in 31..=50 {
            assert_eq!(board.piece_at(pos(n)).unwrap().side(), Side::First);
        }
    }

    #[test]
    fn test_non_playable_squares_are_never_occupied() {
        let board = Board::default();
        assert_eq!(board.squares().count(), 100);
        for square in board.squares() {
            if !square.is_playable() {
                assert!(square.occupant().is_none());
            }
        }
        assert_eq!(board.squares().filter(|s| s.is_playable()).count(), 50);
    }

    #[test]
    fn test_move_and_capture_keep_occupancy_in_sync() {
        let mut board = Board::default();
        let mover = board.occupant(pos(32)).unwrap();
        board.move_piece(mover, pos(28));
        assert!(board.is_empty(pos(32)));
        assert_eq!(board.occupant(pos(28)), Some(mover));

        let victim = board.occupant(pos(19)).unwrap();
        board.capture_piece(victim);
        assert!(board.is_empty(pos(19)));
        assert!(board.piece(victim).is_captured());
        assert_eq!(board.pieces_of(Side::Second).count(), 19);
    }

    #[test]
    #[should_panic(expected = "occupied")]
    fn test_move_onto_occupied_square_panics() {
        let mut board = Board::default();
        let mover = board.occupant(pos(32)).unwrap();
        board.move_piece(mover, pos(33));
    }

    #[test]
    fn test_add_piece_rejects_occupied_square() {
        let mut board = Board::empty(Dimensions::INTERNATIONAL);
        assert!(board.add_piece(Piece::new(Side::First, pos(28))).is_ok());
        assert!(board.add_piece(Piece::new(Side::Second, pos(28))).is_err());
    }

    #[test]
    fn test_display_shows_glyphs_and_numbers() {
        let mut board = Board::empty(Dimensions::INTERNATIONAL);
        board.add_piece(Piece::new(Side::First, pos(1))).unwrap();
        board
            .add_piece(Piece::new_crowned(Side::Second, pos(2)))
            .unwrap();
        let text = board.to_string();
        let top = text.lines().next().unwrap();
        assert_eq!(top.trim_end(), "9 |    w     B     3     4     5");
    }
}
