/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    perft, retain_max_captures, sort_by_captures, Board, Dimensions, MoveChain, MoveTree, Piece,
    PieceId, Position, PositionError, Side, Square,
};

/// Reasons a requested move was refused.
///
/// A refused move never changes the [`Game`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("It is {expected}'s turn, but {chain} moves a {actual} piece")]
    WrongTurn {
        chain: MoveChain,
        expected: Side,
        actual: Side,
    },

    #[error("{chain} is not a possible move")]
    IllegalMove { chain: MoveChain },

    #[error("{chain} captures {captures} piece(s), but a move capturing {required} is available")]
    NotMaximalCapture {
        chain: MoveChain,
        captures: usize,
        required: usize,
    },

    #[error("There is no piece on {0}")]
    NoPiece(u16),

    #[error("A move needs an origin and at least one destination. Got {attempted:?}")]
    MissingDestination { attempted: Vec<u16> },

    #[error("The piece on {0} cannot move")]
    PieceCannotMove(u16),

    #[error("No move {} is possible{}", join_numbers(.attempted), did_you_mean(.suggestions))]
    NoMatchingMove {
        attempted: Vec<u16>,
        suggestions: Vec<MoveChain>,
    },

    #[error(transparent)]
    Position(#[from] PositionError),
}

fn join_numbers(numbers: &[u16]) -> String {
    numbers
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn did_you_mean(suggestions: &[MoveChain]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(". The only possible move is {only}"),
        many => {
            let list = many.iter().map(|c| c.to_string()).collect::<Vec<_>>();
            format!(". Did you mean one of: {}?", list.join(", "))
        }
    }
}

/// A game of draughts: a [`Board`] and the side whose turn it is.
///
/// The basic methods you're probably looking for are [`Game::allowed_moves`], [`Game::make_move`] and [`Game::make_move_numbers`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side_to_move: Side,
}

impl Game {
    /// Creates a new [`Game`] on `board`, with `side_to_move` to play.
    #[inline(always)]
    pub const fn new(board: Board, side_to_move: Side) -> Self {
        Self {
            board,
            side_to_move,
        }
    }

    /// Creates a new [`Game`] in the starting setup for `dims`, with the first side to play.
    #[inline(always)]
    pub fn standard(dims: Dimensions) -> Self {
        Self::new(Board::standard(dims), Side::First)
    }

    /// Creates a new [`Game`] on an international board from the provided FEN string.
    ///
    /// # Example
    /// ```
    /// # use draughts::*;
    /// let game = Game::from_fen("B:W28,K46:B19").unwrap();
    /// assert_eq!(game.side_to_move(), Side::Second);
    /// assert!(game.piece_at_number(46).unwrap().unwrap().is_crowned());
    /// ```
    #[inline(always)]
    pub fn from_fen(fen: &str) -> Result<Self> {
        Self::from_fen_sized(fen, Dimensions::default())
    }

    /// Creates a new [`Game`] on a board of `dims` from the provided FEN string.
    ///
    /// The format is `<side to move>:<side><pieces>:<side><pieces>`, where pieces are
    /// comma-separated position numbers, `K`-prefixed for kings, and `a-b` covers a range of men.
    pub fn from_fen_sized(fen: &str, dims: Dimensions) -> Result<Self> {
        let mut sections = fen.trim().trim_end_matches('.').split(':');

        let side_to_move = sections
            .next()
            .and_then(|tag| tag.trim().chars().next())
            .ok_or(anyhow!("FEN string must start with the side to move"))?;
        let side_to_move = Side::from_fen(side_to_move)?;

        let mut board = Board::empty(dims);
        for section in sections {
            let section = section.trim();
            let mut chars = section.chars();
            let side = chars
                .next()
                .ok_or(anyhow!("FEN piece list must start with a side. Got {section:?}"))?;
            let side = Side::from_fen(side)?;

            for entry in chars.as_str().split(',').map(str::trim) {
                if entry.is_empty() {
                    continue;
                }
                Self::parse_fen_entry(&mut board, side, entry)
                    .with_context(|| format!("Invalid FEN entry {entry:?} in {fen:?}"))?;
            }
        }

        Ok(Self::new(board, side_to_move))
    }

    /// Places the piece(s) described by one comma-separated FEN entry.
    fn parse_fen_entry(board: &mut Board, side: Side, entry: &str) -> Result<()> {
        let dims = board.dims();
        let (crowned, numbers) = match entry.strip_prefix('K') {
            Some(rest) => (true, rest),
            None => (false, entry),
        };

        let parse = |n: &str| -> Result<Position> {
            let n = n.trim().parse::<u16>()?;
            Ok(Position::from_number(n, dims)?)
        };

        let (first, last) = match numbers.split_once('-') {
            Some((first, last)) => (parse(first)?, parse(last)?),
            None => {
                let position = parse(numbers)?;
                (position, position)
            }
        };

        if first > last {
            bail!("Range {first}-{last} is empty");
        }

        for n in first.number()..=last.number() {
            let position = Position::from_number(n, dims)?;
            let piece = if crowned {
                Piece::new_crowned(side, position)
            } else {
                Piece::new(side, position)
            };
            board.add_piece(piece)?;
        }

        Ok(())
    }

    /// Generates a FEN string of the current game.
    ///
    /// Pieces are listed by ascending position number, kings prefixed with `K`.
    ///
    /// # Example
    /// ```
    /// # use draughts::*;
    /// let game = Game::from_fen("W:WK1,31-32:B10").unwrap();
    /// assert_eq!(game.to_fen(), "W:WK1,31,32:B10");
    /// ```
    pub fn to_fen(&self) -> String {
        let mut fen = String::from(self.side_to_move.to_fen());

        for side in Side::all() {
            let mut pieces = self
                .board
                .pieces_of(side)
                .filter_map(|(_, piece)| piece.position().map(|pos| (pos, piece.is_crowned())))
                .collect::<Vec<_>>();
            pieces.sort();

            let list = pieces
                .into_iter()
                .map(|(pos, crowned)| if crowned { format!("K{pos}") } else { pos.to_string() })
                .collect::<Vec<_>>();

            fen.push(':');
            fen.push(side.to_fen());
            fen.push_str(&list.join(","));
        }

        fen
    }

    /// The board this game is played on.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The grid size of this game's board.
    #[inline(always)]
    pub const fn dims(&self) -> Dimensions {
        self.board.dims()
    }

    /// The side whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Passes the turn to the other side without moving anything.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Fetch the piece identified by `id`.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        self.board.piece(id)
    }

    /// Returns an iterator over the pieces of `side` still on the board.
    #[inline(always)]
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.board.pieces_of(side)
    }

    /// The piece standing on `position`, if any.
    #[inline(always)]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.board.piece_at(position)
    }

    /// The piece standing on the square numbered `number`, if any.
    ///
    /// Fails if `number` is not a position on this board.
    pub fn piece_at_number(&self, number: u16) -> Result<Option<&Piece>, PositionError> {
        let position = Position::from_number(number, self.dims())?;
        Ok(self.piece_at(position))
    }

    /// Returns an iterator over all squares, top row first, for rendering.
    #[inline(always)]
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.board.squares()
    }

    /// Builds the tree of every move the piece `id` can make.
    #[inline(always)]
    pub fn move_tree(&self, id: PieceId) -> MoveTree {
        MoveTree::build(&self.board, id)
    }

    /// All chains the piece `id` can make, ignoring the other pieces' captures, most captures first.
    ///
    /// A piece that cannot move, or was captured, has no chains.
    pub fn piece_moves(&self, id: PieceId) -> Vec<MoveChain> {
        let tree = self.move_tree(id);
        let mut chains = tree
            .chains()
            .iter()
            .filter(|chain| !chain.is_empty())
            .cloned()
            .collect::<Vec<_>>();

        sort_by_captures(&mut chains);
        chains
    }

    /// All chains available to the pieces of `side`, most captures first.
    pub fn possible_moves(&self, side: Side) -> Vec<MoveChain> {
        let mut chains = self
            .board
            .pieces_of(side)
            .flat_map(|(id, _)| self.piece_moves(id))
            .collect::<Vec<_>>();

        sort_by_captures(&mut chains);
        debug!(%side, chains = chains.len(), "generated possible moves");
        chains
    }

    /// The chains `side` may legally play: those capturing the most pieces across all of its pieces.
    ///
    /// # Example
    /// ```
    /// # use draughts::*;
    /// // White can either step with 46 or capture 28 with 32
    /// let game = Game::from_fen("W:W32,46:B28").unwrap();
    /// let allowed = game.allowed_moves(Side::First);
    /// assert_eq!(allowed.len(), 1);
    /// assert_eq!(allowed[0].to_string(), "32x23");
    /// ```
    pub fn allowed_moves(&self, side: Side) -> Vec<MoveChain> {
        let mut chains = self.possible_moves(side);
        retain_max_captures(&mut chains);
        chains
    }

    /// The chains the side to move may legally play.
    #[inline(always)]
    pub fn legal_moves(&self) -> Vec<MoveChain> {
        self.allowed_moves(self.side_to_move)
    }

    /// Returns `true` if `side` has no chain to play.
    #[inline(always)]
    pub fn is_stuck(&self, side: Side) -> bool {
        self.board
            .pieces_of(side)
            .all(|(id, _)| self.piece_moves(id).is_empty())
    }

    /// Applies `chain`, if it is legal to play. If it is not, returns an `Err` explaining why.
    ///
    /// All checks happen before anything is changed.
    pub fn make_move(&mut self, chain: &MoveChain) -> Result<(), MoveError> {
        let actual = self.piece(chain.piece()).side();
        if actual != self.side_to_move {
            return Err(MoveError::WrongTurn {
                chain: chain.clone(),
                expected: self.side_to_move,
                actual,
            });
        }

        let Some(generated) = self
            .piece_moves(chain.piece())
            .into_iter()
            .find(|possible| possible == chain)
        else {
            return Err(MoveError::IllegalMove {
                chain: chain.clone(),
            });
        };

        let allowed = self.allowed_moves(self.side_to_move);
        if !allowed.contains(&generated) {
            let required = allowed.first().map_or(0, MoveChain::capture_count);
            return Err(MoveError::NotMaximalCapture {
                captures: generated.capture_count(),
                chain: generated,
                required,
            });
        }

        self.apply(&generated);
        Ok(())
    }

    /// Finds the chain visiting the position numbers in `numbers` and applies it, if it is legal to play.
    ///
    /// The first number is the square of the piece to move, the rest are the squares it lands on.
    /// If no chain matches, the error suggests the chains sharing the first destination.
    ///
    /// # Example
    /// ```
    /// # use draughts::*;
    /// let mut game = Game::default();
    /// let chain = game.make_move_numbers(&[32, 28]).unwrap();
    /// assert_eq!(chain.to_string(), "32-28");
    /// assert_eq!(game.side_to_move(), Side::Second);
    /// ```
    pub fn make_move_numbers(&mut self, numbers: &[u16]) -> Result<MoveChain, MoveError> {
        let [origin, first_step, ..] = numbers else {
            return Err(MoveError::MissingDestination {
                attempted: numbers.to_vec(),
            });
        };

        let dims = self.dims();
        for &n in numbers {
            Position::from_number(n, dims)?;
        }

        let id = self
            .board
            .occupant(Position::from_number(*origin, dims)?)
            .ok_or(MoveError::NoPiece(*origin))?;

        let possible = self.piece_moves(id);
        if possible.is_empty() {
            return Err(MoveError::PieceCannotMove(*origin));
        }

        let Some(chain) = possible.iter().find(|chain| chain.matches(numbers)).cloned() else {
            let suggestions = if possible.len() == 1 {
                possible
            } else {
                possible
                    .into_iter()
                    .filter(|chain| {
                        chain
                            .moves()
                            .first()
                            .is_some_and(|mv| mv.to.number() == *first_step)
                    })
                    .collect()
            };

            return Err(MoveError::NoMatchingMove {
                attempted: numbers.to_vec(),
                suggestions,
            });
        };

        self.make_move(&chain)?;
        Ok(chain)
    }

    /// Copies `self` and returns a [`Game`] after having applied `chain`.
    ///
    /// No enforcement of legality beyond the board's own invariants.
    #[inline(always)]
    pub fn with_move_made(&self, chain: &MoveChain) -> Self {
        let mut copied = self.clone();
        copied.apply(chain);
        copied
    }

    /// Recursively make all legal moves available until `depth` is reached, returning the number of games reachable.
    ///
    /// See [`perft()`] for more.
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> u64 {
        perft(self, depth)
    }

    /// Moves the piece, removes everything it jumped, crowns it if needed and passes the turn.
    fn apply(&mut self, chain: &MoveChain) {
        let id = chain.piece();
        let side = self.piece(id).side();
        let destination = chain.destination();

        for victim in chain.captured() {
            self.board.capture_piece(victim);
        }
        self.board.move_piece(id, destination);

        info!(%side, %chain, captures = chain.capture_count(), "applied move");

        if destination.row() == side.crowning_row(self.dims()) && !self.piece(id).is_crowned() {
            self.board.crown_piece(id);
            info!(%side, square = %destination, "crowned piece");
        }

        self.toggle_side_to_move();
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_fen`]
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    /// Starting setup on an international board.
    #[inline(always)]
    fn default() -> Self {
        Self::standard(Dimensions::default())
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f)?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "{} to move", self.side_to_move)
    }
}
