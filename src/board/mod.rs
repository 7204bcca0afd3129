/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Turn handling: whose move it is, move validation and application, FEN.
mod game;

/// Generation of the move-option tree for a single piece.
mod movegen;

/// Single steps, complete move chains and maximal-capture selection.
mod moves;

/// Performance testing of the move generator.
mod perft;

/// Sides, pieces and their lifecycle.
mod piece;

/// Board dimensions, position numbers and diagonals.
mod position;

/// The grid of squares and the pieces on it.
mod state;

/// A generic container with one value per square.
mod table;

pub use game::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use state::*;
pub use table::*;
