/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The rules core: board, pieces, move generation and turn handling.
mod board;

/// Commands understood by the interactive engine.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use utils::*;
