/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::Parser;
use draughts::{Cli, Engine, EngineCommand};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::default().add_directive(cli.log_level().into())),
        )
        .init();

    let game = match cli.game() {
        Ok(game) => game,
        Err(e) => {
            eprintln!("{} could not set up the game: {e:#}", env!("CARGO_PKG_NAME"));
            std::process::exit(1);
        }
    };

    let mut engine = Engine::new(game);

    // Commands given on the command line run before anything read from stdin
    for line in &cli.commands {
        match line.parse::<EngineCommand>() {
            Ok(cmd) => {
                if let Err(e) = engine.send_command(cmd) {
                    eprintln!("{e}");
                }
            }
            Err(e) => eprintln!("ERROR on input {line:?}:\n{e}"),
        }
    }

    if let Err(e) = engine.run() {
        eprintln!("{} encountered an error: {e}", env!("CARGO_PKG_NAME"));
    }
}
