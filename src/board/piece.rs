/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{Diagonal, Dimensions, Position};

/// One of the two players of a game.
///
/// The first-turn side (White) starts at the bottom of the board and moves up;
/// the second-turn side (Black) starts at the top and moves down.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Side {
    #[default]
    First,
    Second,
}

impl Side {
    /// Number of sides.
    pub const COUNT: usize = 2;

    /// Both sides, starting with the side that moves first.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::First, Self::Second]
    }

    /// Returns this [`Side`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use draughts::Side;
    /// assert_eq!(Side::First.opponent(), Side::Second);
    /// assert_eq!(Side::Second.opponent(), Side::First);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Row delta of a forward step for this [`Side`].
    ///
    /// # Example
    /// ```
    /// # use draughts::Side;
    /// assert_eq!(Side::First.forward(), 1);
    /// assert_eq!(Side::Second.forward(), -1);
    /// ```
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::First => 1,
            Self::Second => -1,
        }
    }

    /// The two diagonals a man of this [`Side`] may make a non-capturing step along.
    #[inline(always)]
    pub const fn forward_diagonals(&self) -> [Diagonal; 2] {
        match self {
            Self::First => [Diagonal::UP_LEFT, Diagonal::UP_RIGHT],
            Self::Second => [Diagonal::DOWN_LEFT, Diagonal::DOWN_RIGHT],
        }
    }

    /// The row on which a man of this [`Side`] is crowned: the farthest row from where it started.
    #[inline(always)]
    pub const fn crowning_row(&self, dims: Dimensions) -> u8 {
        match self {
            Self::First => dims.height() - 1,
            Self::Second => 0,
        }
    }

    /// Returns this [`Side`] as a `usize`, for indexing.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Human-readable name, after the piece colours of international draughts.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::First => "White",
            Self::Second => "Black",
        }
    }

    /// The single-character FEN tag of this [`Side`].
    #[inline(always)]
    pub const fn to_fen(&self) -> char {
        match self {
            Self::First => 'W',
            Self::Second => 'B',
        }
    }

    /// Parses a [`Side`] from its FEN tag (`W` or `B`, case-insensitive).
    pub fn from_fen(tag: char) -> Result<Self> {
        match tag {
            'W' | 'w' => Ok(Self::First),
            'B' | 'b' => Ok(Self::Second),
            _ => bail!("Invalid side tag: Must be one of `W` or `B`. Got {tag:?}"),
        }
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;
    /// Accepts a FEN tag or a side name (`white`, `black`, `first`, `second`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" | "first" => Ok(Self::First),
            "b" | "black" | "second" => Ok(Self::Second),
            _ => bail!("Invalid side {s:?}"),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identifies a single [`Piece`] owned by a [`crate::Board`].
///
/// Identifiers are stable for the lifetime of the board, including after the piece is captured.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    /// Index of this piece within its board's piece storage.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a [`Piece`] is in its lifecycle.
///
/// Capture is terminal: there is no way back to [`PieceState::OnBoard`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceState {
    OnBoard(Position),
    Captured,
}

/// A single draughts piece: a man, or a king once crowned.
///
/// A piece is identified by its owner and its initial position; both never change.
/// Its state changes through [`crate::Board`], which keeps square occupancy in sync.
#[derive(Clone, Copy, Debug)]
pub struct Piece {
    side: Side,
    initial: Position,
    state: PieceState,
    crowned: bool,
}

impl Piece {
    /// Creates a new, uncrowned piece for `side` standing on `position`.
    #[inline(always)]
    pub const fn new(side: Side, position: Position) -> Self {
        Self {
            side,
            initial: position,
            state: PieceState::OnBoard(position),
            crowned: false,
        }
    }

    /// Creates a new crowned piece for `side` standing on `position`.
    #[inline(always)]
    pub const fn new_crowned(side: Side, position: Position) -> Self {
        Self {
            crowned: true,
            ..Self::new(side, position)
        }
    }

    /// The side owning this piece.
    #[inline(always)]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// The position this piece was created on.
    #[inline(always)]
    pub const fn initial_position(&self) -> Position {
        self.initial
    }

    /// The current lifecycle state.
    #[inline(always)]
    pub const fn state(&self) -> PieceState {
        self.state
    }

    /// The current position, or `None` if this piece was captured.
    #[inline(always)]
    pub const fn position(&self) -> Option<Position> {
        match self.state {
            PieceState::OnBoard(position) => Some(position),
            PieceState::Captured => None,
        }
    }

    /// Returns `true` if this piece has been captured.
    #[inline(always)]
    pub const fn is_captured(&self) -> bool {
        matches!(self.state, PieceState::Captured)
    }

    /// Returns `true` if this piece is a king.
    #[inline(always)]
    pub const fn is_crowned(&self) -> bool {
        self.crowned
    }

    /// Moves this piece to `position`.
    ///
    /// # Panics
    ///
    /// If this piece has been captured.
    pub(crate) fn move_to(&mut self, position: Position) {
        assert!(
            !self.is_captured(),
            "Piece {self} was captured already and cannot be moved to {position}"
        );
        self.state = PieceState::OnBoard(position);
    }

    /// Marks this piece as captured.
    ///
    /// # Panics
    ///
    /// If this piece has been captured already.
    pub(crate) fn capture(&mut self) {
        assert!(
            !self.is_captured(),
            "Piece {self} was captured already and cannot be captured again"
        );
        self.state = PieceState::Captured;
    }

    /// Crowns this piece. Crowning is permanent.
    pub(crate) fn crown(&mut self) {
        self.crowned = true;
    }

    /// The glyph used to render this piece: `w`/`b` for men and `W`/`B` for kings.
    #[inline(always)]
    pub const fn glyph(&self) -> char {
        match (self.side, self.crowned) {
            (Side::First, false) => 'w',
            (Side::First, true) => 'W',
            (Side::Second, false) => 'b',
            (Side::Second, true) => 'B',
        }
    }
}

impl PartialEq for Piece {
    /// Pieces are the same piece if they share an owner and an initial position.
    fn eq(&self, other: &Self) -> bool {
        self.side == other.side && self.initial == other.initial
    }
}

impl Eq for Piece {}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.crowned { "king" } else { "man" };
        match self.state {
            PieceState::OnBoard(position) => write!(f, "{} {kind} on {position}", self.side),
            PieceState::Captured => write!(f, "captured {} {kind}", self.side),
        }
    }
}
