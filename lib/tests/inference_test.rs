use rs_mastermind::selectors::InsertColors;
use rs_mastermind::*;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::result::Result;

fn guesses_to_solve(board: &Board, secret: &str) -> Result<Vec<String>, MastermindError> {
    let secret = board.parse_code(secret)?;
    let mut guesser = InferenceGuesser::new();

    let result = play_round(
        board,
        &secret,
        RoundConfig::default(),
        &mut guesser,
        &InsertColors,
    );

    assert_eq!(result.outcome, RoundOutcome::Win);
    Ok(result
        .guesses
        .iter()
        .map(|guess| board.alphabet().format_code(guess))
        .collect())
}

#[test]
fn solves_with_repeated_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 3)?;

    assert_eq!(
        guesses_to_solve(&board, "ABCA")?,
        vec!["AAAA", "ABBB", "AACC", "ABAB", "ABCA"]
    );
    Ok(())
}

#[test]
fn solves_monochrome_secrets() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 3)?;

    assert_eq!(guesses_to_solve(&board, "BBBB")?, vec!["AAAA", "BBBB"]);
    assert_eq!(
        guesses_to_solve(&board, "CCCC")?,
        vec!["AAAA", "BBBB", "CCCC"]
    );
    Ok(())
}

#[test]
fn solves_distinct_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 6)?;

    assert_eq!(
        guesses_to_solve(&board, "ABCD")?,
        vec!["AAAA", "ABBB", "ABCC", "ABCD"]
    );
    Ok(())
}

#[test]
fn ambiguity_shrinks_until_solved() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 3)?;
    let secret = board.parse_code("ABCA")?;
    let mut guesser = InferenceGuesser::new();
    let mut feedback = Feedback::start();
    let mut ambiguity = Vec::new();

    let mut guess = guesser.make_guess(&board, &InsertColors, &feedback);
    while guess != secret {
        feedback = get_feedback_for_guess(&board, &secret, &guess, feedback.guess_index + 1)?;
        guess = guesser.make_guess(&board, &InsertColors, &feedback);
        ambiguity.push(guesser.knowledge().ambiguity());
    }

    assert_eq!(ambiguity, vec![4, 3, 3, 0]);
    assert!(guesser.knowledge().is_solved());
    Ok(())
}

#[test]
fn knowledge_matches_secret_once_solved() -> Result<(), MastermindError> {
    let board = Board::with_letters(5, 4)?;
    let secret = board.parse_code("DABBA")?;
    let mut guesser = InferenceGuesser::new();

    let result = play_round(
        &board,
        &secret,
        RoundConfig::default(),
        &mut guesser,
        &InsertColors,
    );

    assert_eq!(result.outcome, RoundOutcome::Win);
    let knowledge = guesser.knowledge();
    assert!(knowledge.is_solved());
    for (position, color) in secret.iter().enumerate() {
        assert_eq!(knowledge.fixed_color_at(position), Some(*color));
    }
    Ok(())
}

#[test]
fn never_needs_more_than_colors_plus_pegs() -> Result<(), MastermindError> {
    for (peg_count, color_count) in [(1, 1), (2, 2), (3, 3), (4, 3), (4, 6), (5, 4), (3, 8)] {
        let board = Board::with_letters(peg_count, color_count)?;

        let results = play_every_code(&board, RoundConfig::default(), InferenceGuesser::new)?;

        for (secret, result) in results {
            assert_eq!(
                result.outcome,
                RoundOutcome::Win,
                "lost against {}",
                board.alphabet().format_code(&secret)
            );
            assert!(
                result.num_guesses() <= peg_count + color_count,
                "took {} guesses for {}",
                result.num_guesses(),
                board.alphabet().format_code(&secret)
            );
        }
    }
    Ok(())
}

#[test]
fn six_pegs_can_need_one_more_guess() -> Result<(), MastermindError> {
    let board = Board::with_letters(6, 4)?;

    assert_eq!(
        guesses_to_solve(&board, "CBBDAC")?,
        vec![
            "AAAAAA", "ABBBBB", "CACCCC", "DDADDD", "BBBABB", "BBBBAB", "CBCCAC", "CBBCAC",
            "CBBDAD", "CBBCAD", "CBBDAC"
        ]
    );

    let results = play_every_code(&board, RoundConfig::default(), InferenceGuesser::new)?;
    let over_bound = results
        .iter()
        .filter(|(_, result)| result.num_guesses() > 10)
        .count();
    assert!(results
        .iter()
        .all(|(_, result)| result.outcome == RoundOutcome::Win && result.num_guesses() <= 11));
    assert_eq!(over_bound, 10);
    Ok(())
}

#[test]
fn start_feedback_resets_state()-> Result<(), MastermindError> {
    let board = Board::with_letters(4, 6)?;
    let secret = board.parse_code("AFED")?;
    let mut used = InferenceGuesser::new();
    let config = RoundConfig {
        guess_cutoff: 4,
        ..RoundConfig::default()
    };
    play_round(&board, &secret, config, &mut used, &InsertColors);
    assert!(!used.knowledge().is_empty());
    let mut fresh = InferenceGuesser::new();

    let used_guess = used.make_guess(&board, &InsertColors, &Feedback::start());
    let fresh_guess = fresh.make_guess(&board, &InsertColors, &Feedback::start());

    assert_eq!(used_guess, fresh_guess);
    assert_eq!(used, fresh);
    Ok(())
}

#[test]
fn start_feedback_adapts_to_new_board() -> Result<(), MastermindError> {
    let small = Board::with_letters(3, 3)?;
    let large = Board::with_letters(5, 4)?;
    let mut guesser = InferenceGuesser::new();
    play_round(
        &small,
        &small.parse_code("CAB")?,
        RoundConfig::default(),
        &mut guesser,
        &InsertColors,
    );

    let result = play_round(
        &large,
        &large.parse_code("DDCBA")?,
        RoundConfig::default(),
        &mut guesser,
        &InsertColors,
    );

    assert_eq!(result.outcome, RoundOutcome::Win);
    assert_eq!(guesser.knowledge().peg_count(), 5);
    Ok(())
}

#[test]
fn inconsistent_feedback_still_yields_valid_guesses() -> Result<(), MastermindError> {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..500 {
        let board = Board::with_letters(rng.gen_range(1..=6), rng.gen_range(1..=8))?;
        let mut guesser = InferenceGuesser::new();
        let mut feedback = Feedback::start();

        for guess_index in 1..=30 {
            let guess = guesser.make_guess(&board, &InsertColors, &feedback);
            assert!(board.is_valid_code(&guess));
            feedback = Feedback {
                exact: rng.gen_range(0..=board.peg_count() + 2),
                partial: rng.gen_range(0..=board.peg_count() + 2),
                guess_index,
            };
        }
    }
    Ok(())
}

#[test]
fn considers_colors_in_alphabet_order() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 5)?;
    let mut guesser = InferenceGuesser::new();
    let mut feedback = Feedback::start();

    for guess_index in 1..=4 {
        let guess = guesser.make_guess(&board, &InsertColors, &feedback);
        assert_eq!(guess, Code::monochrome(Color(guess_index as u8 - 1), 4));
        assert_eq!(guesser.considering(), Color(guess_index as u8 - 1));
        feedback = Feedback {
            exact: 0,
            partial: 0,
            guess_index,
        };
    }
    Ok(())
}
