use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use games::sheepshead::{play_game, Standing};

pub mod games;
pub mod utils;

/// The card game, not the fish
#[derive(Parser, Debug)]
#[command(name = "sheepshead")]
struct Args {
    /// Number of hands per game
    #[arg(long, default_value_t = 5, value_name = "#")]
    hands: usize,

    /// Player names; the remaining seats draw random names
    #[arg(short, long, num_args = 0..=5, value_name = "name")]
    players: Vec<String>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final standings as JSON
    #[arg(long)]
    json: bool,

    /// Increase detail of output messages [-v, -vv]
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match play_game(args.hands, &args.players, &mut rng) {
        Ok(standings) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&standings)
                        .expect("standings always serialize")
                );
            } else {
                print_standings(&standings);
            }
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            std::process::exit(1);
        }
    }
}

fn print_standings(standings: &[Standing]) {
    println!("{}", "Final standings".bold());
    for (place, standing) in standings.iter().enumerate() {
        let line = format!(
            "{:>2}. {:<16} {:>4}",
            place + 1,
            standing.name,
            standing.score
        );
        if place == 0 {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
}
