use clap::Parser;
use rs_mastermind::selectors::{selector_by_name, SELECTOR_NAMES};
use rs_mastermind::*;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Plays Mastermind, where the computer tries to guess secret codes.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Number of pegs in each code.
    pegs: usize,

    /// Number of colors, shown as the letters A, B, C, and so on.
    colors: usize,

    /// The guessing algorithm: "inference", "random", or "monochrome".
    guesser: String,

    /// The secret code selection policy, e.g. "InsertColors" or "TwoColor".
    selector: String,

    /// Number of rounds to play.
    rounds: usize,

    /// Path to a file that contains secret codes to play against, with one code on each line.
    /// Codes are generated with the selector if this is not set.
    #[clap(short = 'f', long)]
    codes_file: Option<String>,

    /// If set, generates this many codes with the selector and writes them to a file instead of
    /// playing.
    #[clap(long, value_name = "COUNT")]
    write_codes: Option<usize>,

    /// If true, plays against every possible code for the board and prints how many guesses
    /// were needed. The benchmark is run instead of playing rounds.
    #[clap(long)]
    benchmark: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let start_time = Instant::now();
    let args = Args::parse();
    debug!(?args, "parsed arguments");
    let board = Board::with_letters(args.pegs, args.colors)?;
    let selector = selector_by_name(&args.selector).ok_or_else(|| {
        format!(
            "Unknown selector \"{}\". Expected one of: {}",
            args.selector,
            SELECTOR_NAMES.join(", ")
        )
    })?;

    if let Some(count) = args.write_codes {
        write_code_list(&board, selector.as_ref(), count)?;
    } else if args.benchmark {
        run_benchmark(&board, &args.guesser)?;
    } else {
        let secrets = match &args.codes_file {
            Some(path) => {
                let mut secrets = read_codes(io::BufReader::new(File::open(path)?), &board)?;
                secrets.truncate(args.rounds);
                secrets
            }
            None => selector.generate_codes(&board, args.rounds, &mut rand::thread_rng())?,
        };
        let mut guesser = make_guesser(&args.guesser)?;
        play_rounds(&board, &secrets, guesser.as_mut(), selector.as_ref());
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn make_guesser(name: &str) -> Result<Box<dyn Guesser>, Box<dyn Error>> {
    match name {
        "inference" => Ok(Box::new(InferenceGuesser::new())),
        "random" => Ok(Box::new(RandomGuesser::new())),
        "monochrome" => Ok(Box::new(MonochromeGuesser::new())),
        _ => Err(format!(
            "Unknown guesser \"{}\". Expected one of: inference, random, monochrome",
            name
        )
        .into()),
    }
}

fn write_code_list(
    board: &Board,
    selector: &dyn CodeSelector,
    count: usize,
) -> Result<(), Box<dyn Error>> {
    let codes = selector.generate_codes(board, count, &mut rand::thread_rng())?;
    let file_name = code_list_file_name(selector.name(), board);
    let mut writer = io::BufWriter::new(File::create(&file_name)?);
    write_codes(&mut writer, &codes, board.alphabet())?;
    println!("Wrote {} codes to {}.", codes.len(), file_name);
    Ok(())
}

/// Plays one round per secret, stopping early if the guesser makes an invalid guess.
fn play_rounds(
    board: &Board,
    secrets: &[Code],
    guesser: &mut dyn Guesser,
    selector: &dyn CodeSelector,
) {
    let alphabet = board.alphabet();
    for (round, secret) in secrets.iter().enumerate() {
        let result = play_round(board, secret, RoundConfig::default(), guesser, selector);
        println!(
            "Round {}: {:?} against {} after {} guesses ({:.3}s).",
            round + 1,
            result.outcome,
            alphabet.format_code(secret),
            result.num_guesses(),
            result.time_used.as_secs_f64()
        );
        for guess in result.guesses.iter() {
            println!("\t{}", alphabet.format_code(guess));
        }
        if result.outcome == RoundOutcome::Failure {
            eprintln!("The guesser made an invalid guess. Stopping.");
            return;
        }
    }
}

fn run_benchmark(board: &Board, guesser_name: &str) -> Result<(), Box<dyn Error>> {
    let config = RoundConfig::default();
    let results = match guesser_name {
        "inference" => play_every_code(board, config, InferenceGuesser::new)?,
        "random" => play_every_code(board, config, RandomGuesser::new)?,
        "monochrome" => play_every_code(board, config, MonochromeGuesser::new)?,
        _ => return make_guesser(guesser_name).map(|_| ()),
    };
    let num_guesses_per_round: Vec<usize> = results
        .iter()
        .filter(|(_, result)| result.outcome == RoundOutcome::Win)
        .map(|(_, result)| result.num_guesses())
        .collect();
    println!(
        "Solved {} of {} codes. Results:",
        num_guesses_per_round.len(),
        results.len()
    );

    let mut num_rounds_per_guess_count: BTreeMap<usize, usize> = BTreeMap::new();
    for num_guesses in num_guesses_per_round.iter() {
        *num_rounds_per_guess_count.entry(*num_guesses).or_insert(0) += 1;
    }

    println!("|Num guesses|Num rounds|");
    println!("|-----------|----------|");
    for (num_guesses, num_rounds) in num_rounds_per_guess_count.iter() {
        println!("|{}|{}|", num_guesses, num_rounds);
    }

    if num_guesses_per_round.is_empty() {
        return Ok(());
    }
    let count = num_guesses_per_round.len() as f64;
    let average = num_guesses_per_round.iter().sum::<usize>() as f64 / count;
    let std_dev = (num_guesses_per_round
        .iter()
        .map(|num_guesses| (*num_guesses as f64 - average).powi(2))
        .sum::<f64>()
        / count)
        .sqrt();

    println!(
        "\n**Average number of guesses:** {:.2} +/- {:.2}",
        average, std_dev
    );
    Ok(())
}
