/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::{parse_numbers, Dimensions, Game, DEFAULT_SIZE};

/// Command-line arguments of the `draughts` binary.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Size of the board, either `<N>` or `<WIDTH>x<HEIGHT>`. The width must be even.
    #[arg(short, long, default_value_t = Dimensions::square(DEFAULT_SIZE).unwrap_or_default(), value_parser = parse_size)]
    pub size: Dimensions,

    /// Start from this position instead of the standard setup.
    #[arg(short, long)]
    pub fen: Option<String>,

    /// Log more. Pass twice for move generation details. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Engine commands to run before reading from stdin, such as `--command "perft 3"`.
    #[arg(short, long = "command")]
    pub commands: Vec<String>,
}

impl Cli {
    /// The game these arguments start the engine with.
    pub fn game(&self) -> Result<Game> {
        match self.fen.as_deref() {
            Some(fen) => Game::from_fen_sized(fen, self.size),
            None => Ok(Game::standard(self.size)),
        }
    }

    /// The default log filter for the requested verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

/// Accepts a single size for square boards, or `<width>x<height>`.
fn parse_size(s: &str) -> Result<Dimensions, String> {
    let (width, height) = s.split_once('x').unwrap_or((s, s));
    let parse = |n: &str| n.trim().parse::<u8>().map_err(|e| e.to_string());
    Dimensions::new(parse(width)?, parse(height)?).map_err(|e| e.to_string())
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND> | <POSITION NUMBERS>")
)]
pub enum EngineCommand {
    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Set up the position described by a FEN string, such as `W:W31-50:B1-20`.
    Load { fen: String },

    /// Play the move visiting the provided position numbers, such as `move 32 28` or `move 28x19x10`.
    ///
    /// A line made only of position numbers is treated the same way.
    #[command(alias = "m")]
    Move {
        #[arg(required = true, num_args = 1..)]
        squares: Vec<String>,
    },

    /// Shows all legal moves in the current position, or every move of the piece on a specific square.
    Moves {
        position: Option<u16>,

        /// If set, moves outlawed by the maximal-capture rule are shown as well.
        #[arg(short, long, default_value = "false")]
        all: bool,
    },

    /// Start a new game from the standard setup.
    New,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Describe the piece on the provided square, if any.
    Piece { position: u16 },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print whose turn it is.
    Turn,

    /// A move given as bare position numbers.
    #[command(skip)]
    Play { numbers: Vec<u16> },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a sequence of position numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => match parse_numbers(s) {
                Some(numbers) => Ok(Self::Play { numbers }),
                None => Err(e),
            },
        }
    }
}
