/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};

use crate::{parse_numbers, print_perft, Dimensions, EngineCommand, Game, MoveChain, Position};

/// The interactive draughts engine.
///
/// Commands arrive over a channel, either from `stdin` or from [`Engine::send_command`],
/// and are executed one at a time against the engine's [`Game`].
#[derive(Debug)]
pub struct Engine {
    /// The current state of the game, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given.
    game: Game,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] playing `game`, to be executed with [`Engine::run`].
    pub fn new(game: Game) -> Self {
        let (sender, receiver) = channel();

        Self {
            game,
            sender,
            receiver,
        }
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The game the engine is currently playing.
    #[inline(always)]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to send command to engine")
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        info!(engine = %self.name(), "engine started");

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if cmd == EngineCommand::Exit {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e}");
            }
        }

        Ok(())
    }

    /// Handle the execution of a single [`EngineCommand`].
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Display => println!("{}", self.game),

            EngineCommand::Exit => {}

            EngineCommand::Fen => println!("{}", self.game.to_fen()),

            EngineCommand::Load { fen } => {
                self.game = Game::from_fen_sized(&fen, self.dims())?;
            }

            EngineCommand::Move { squares } => {
                let line = squares.join(" ");
                let numbers =
                    parse_numbers(&line).ok_or(anyhow!("Invalid position numbers {line:?}"))?;
                self.play(&numbers)?;
            }

            EngineCommand::Play { numbers } => self.play(&numbers)?,

            EngineCommand::Moves { position, all } => {
                let moves = self.moves(position, all)?;

                // If there are none, print "(none)"
                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    moves
                        .into_iter()
                        .map(|chain| chain.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }

            EngineCommand::New => self.game = Game::standard(self.dims()),

            EngineCommand::Perft { depth } => {
                print_perft::<true, false>(&self.game, depth);
            }

            EngineCommand::Piece { position } => match self.game.piece_at_number(position)? {
                Some(piece) => println!("{piece}"),
                None => println!("Square {position} is empty"),
            },

            EngineCommand::Splitperft { depth } => {
                print_perft::<true, true>(&self.game, depth);
            }

            EngineCommand::Turn => println!("{} to move", self.game.side_to_move()),
        };

        Ok(())
    }

    /// The grid size of the current game.
    #[inline(always)]
    fn dims(&self) -> Dimensions {
        self.game.dims()
    }

    /// Plays the move visiting `numbers`, reporting the outcome.
    fn play(&mut self, numbers: &[u16]) -> Result<()> {
        let side = self.game.side_to_move();
        let chain = self.game.make_move_numbers(numbers).inspect_err(|e| {
            warn!(%side, ?numbers, error = %e, "move rejected");
        })?;

        println!("{side} played {chain}");

        let next = self.game.side_to_move();
        if self.game.is_stuck(next) {
            println!("{next} has no moves left");
        }

        Ok(())
    }

    /// The chains of the piece on `position`, or of every piece of the side to move.
    ///
    /// Unless `all` is set, only chains the side to move may legally play are listed.
    fn moves(&self, position: Option<u16>, all: bool) -> Result<Vec<MoveChain>> {
        let side = self.game.side_to_move();
        let mut moves = if all {
            self.game.possible_moves(side)
        } else {
            self.game.allowed_moves(side)
        };

        if let Some(number) = position {
            let position = Position::from_number(number, self.dims())?;
            let Some(id) = self.game.board().occupant(position) else {
                bail!("There is no piece on {position}");
            };

            if all || self.game.piece(id).side() != side {
                moves = self.game.piece_moves(id);
            } else {
                moves.retain(|chain| chain.piece() == id);
            }
        }

        Ok(moves)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Game::default())
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Engine received input of 0 bytes and is quitting");
        }

        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Side;

    #[test]
    fn test_engine_plays_moves() {
        let mut engine = Engine::default();
        engine.execute("32 28".parse().unwrap()).unwrap();
        engine.execute("move 19-23".parse().unwrap()).unwrap();
        assert_eq!(engine.game().side_to_move(), Side::First);

        // White must now take on 23
        let moves = engine.moves(None, false).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "28x19");
        assert!(engine.execute("m 31 27".parse().unwrap()).is_err());
        engine.execute("m 28x19".parse().unwrap()).unwrap();
        assert_eq!(engine.game().pieces(Side::Second).count(), 19);
    }

    #[test]
    fn test_engine_moves_for_one_piece() {
        let engine = Engine::default();
        let moves = engine.moves(Some(35), false).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "35-30");
        assert!(engine.moves(Some(25), false).is_err());
        // Blocked in on the back row
        assert!(engine.moves(Some(3), false).unwrap().is_empty());
    }

    #[test]
    fn test_engine_load_and_new() {
        let mut engine = Engine::default();
        engine
            .execute(EngineCommand::Load {
                fen: String::from("B:WK5:B45"),
            })
            .unwrap();
        assert_eq!(engine.game().to_fen(), "B:WK5:B45");
        assert!(engine
            .execute(EngineCommand::Load {
                fen: String::from("nonsense")
            })
            .is_err());
        assert_eq!(engine.game().to_fen(), "B:WK5:B45");

        engine.execute(EngineCommand::New).unwrap();
        assert_eq!(engine.game(), &Game::default());
    }
}
