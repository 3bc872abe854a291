extern crate connect_four;

use std::io::{BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use connect_four::{GameEngine, InsertError};

/// Plays a hot-seat game of Connect Four in the terminal.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Id of the first player (red)
    #[arg(long, env = "CONNECT_FOUR_RED", default_value = "red")]
    red: String,
    /// Id of the second player (blue)
    #[arg(long, env = "CONNECT_FOUR_BLUE", default_value = "blue")]
    blue: String,
    /// Seed for picking who moves first
    #[arg(long, env = "CONNECT_FOUR_SEED")]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut game = match args.seed {
        Some(seed) => GameEngine::seeded(seed),
        None => GameEngine::new(),
    };
    game.join(&args.red)?;
    game.join(&args.blue)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    print!("{}", game.render());

    while let Some(player) = game.current_turn().map(str::to_owned) {
        print!("{} plays next, pick a column (1-7): ", player);
        stdout.flush()?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let column: i32 = match line?.trim().parse() {
            Ok(column) => column,
            Err(err) => {
                println!("not a column: {}", err);
                continue;
            }
        };

        match game.insert(&player, column) {
            Ok(won) => {
                print!("{}", game.render());
                if won {
                    println!("{} won!", player);
                    break;
                }
            }
            Err(InsertError::Locked(err)) => {
                print!("{}", game.render());
                println!("{}", err);
                break;
            }
            Err(InsertError::Select(err)) => println!("{}", err),
        }
    }

    Ok(())
}
