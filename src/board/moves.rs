/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use super::{PieceId, Position};

/// A single step of a [`MoveChain`]: one piece going from one square to another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    /// Square the step starts on.
    pub from: Position,

    /// Square the step lands on.
    pub to: Position,

    /// The enemy piece jumped during this step, if any.
    pub captured: Option<PieceId>,
}

impl Move {
    /// Returns `true` if this step removes an enemy piece.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{sep}{}", self.from, self.to)
    }
}

/// One complete candidate turn for a single piece: an ordered sequence of [`Move`]s.
///
/// Two chains are equal if they visit the same position numbers in the same order.
/// This is only meaningful for chains generated on the same board within the same turn.
#[derive(Clone, Debug)]
pub struct MoveChain {
    piece: PieceId,
    origin: Position,
    moves: Vec<Move>,
    capture_count: usize,
}

impl MoveChain {
    /// Creates a new chain for `piece`, standing on `origin`, made of `moves`.
    ///
    /// # Panics
    ///
    /// If the steps are not contiguous, starting at `origin`.
    pub fn new(piece: PieceId, origin: Position, moves: Vec<Move>) -> Self {
        let mut at = origin;
        for mv in &moves {
            assert_eq!(mv.from, at, "Move {mv} does not continue a chain standing on {at}");
            at = mv.to;
        }

        let capture_count = moves.iter().filter(|mv| mv.is_capture()).count();

        Self {
            piece,
            origin,
            moves,
            capture_count,
        }
    }

    /// The piece making this chain.
    #[inline(always)]
    pub const fn piece(&self) -> PieceId {
        self.piece
    }

    /// The square the piece stands on before the chain.
    #[inline(always)]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// The square the piece stands on after the chain.
    #[inline(always)]
    pub fn destination(&self) -> Position {
        self.moves.last().map_or(self.origin, |mv| mv.to)
    }

    /// The steps of this chain, in the order they are made.
    #[inline(always)]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of enemy pieces this chain removes.
    #[inline(always)]
    pub const fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Returns `true` if this chain contains no steps at all.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The pieces removed by this chain, in the order they are jumped.
    pub fn captured(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.moves.iter().filter_map(|mv| mv.captured)
    }

    /// Returns an iterator over every square visited, starting with the origin.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.origin).chain(self.moves.iter().map(|mv| mv.to))
    }

    /// The position numbers visited by this chain, starting with the origin.
    ///
    /// This is what identifies a chain when matching a requested move.
    pub fn numbers(&self) -> Vec<u16> {
        self.positions().map(|position| position.number()).collect()
    }

    /// Returns `true` if this chain visits exactly the position numbers in `numbers`.
    pub fn matches(&self, numbers: &[u16]) -> bool {
        self.positions()
            .map(|position| position.number())
            .eq(numbers.iter().copied())
    }
}

impl PartialEq for MoveChain {
    fn eq(&self, other: &Self) -> bool {
        self.positions().eq(other.positions())
    }
}

impl Eq for MoveChain {}

impl Hash for MoveChain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for position in self.positions() {
            position.hash(state);
        }
    }
}

impl fmt::Display for MoveChain {
    /// Quiet chains are written `32-28`, capturing chains `28x19x10`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.capture_count > 0 { "x" } else { "-" };
        let numbers = self
            .positions()
            .map(|position| position.to_string())
            .collect::<Vec<_>>();

        write!(f, "{}", numbers.join(sep))
    }
}

/// Sorts `chains` by descending capture count, keeping the order of chains that capture equally many pieces.
#[inline(always)]
pub fn sort_by_captures(chains: &mut [MoveChain]) {
    chains.sort_by(|a, b| b.capture_count.cmp(&a.capture_count));
}

/// Keeps only the chains achieving the highest capture count found in `chains`.
pub fn retain_max_captures(chains: &mut Vec<MoveChain>) {
    let max = chains
        .iter()
        .map(MoveChain::capture_count)
        .max()
        .unwrap_or_default();

    chains.retain(|chain| chain.capture_count == max);
}
