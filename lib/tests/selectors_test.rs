#[macro_use]
extern crate assert_matches;

use rs_mastermind::selectors::*;
use rs_mastermind::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::result::Result;

const NUM_SAMPLES: usize = 200;

fn generate(
    selector: &dyn CodeSelector,
    board: &Board,
    seed: u64,
) -> Result<Vec<Code>, MastermindError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let codes = selector.generate_codes(board, NUM_SAMPLES, &mut rng)?;
    assert_eq!(codes.len(), NUM_SAMPLES);
    assert!(codes.iter().all(|code| board.is_valid_code(code)));
    Ok(codes)
}

fn distinct_colors(code: &Code) -> BTreeSet<Color> {
    code.iter().copied().collect()
}

#[test]
fn insert_colors_uses_whole_alphabet() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 6)?;

    let codes = generate(&InsertColors, &board, 1)?;

    let used: BTreeSet<Color> = codes.iter().flat_map(|code| code.iter().copied()).collect();
    assert_eq!(used.len(), 6);
    Ok(())
}

#[test]
fn two_color_uses_exactly_two_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 6)?;

    for code in generate(&TwoColor, &board, 2)? {
        assert_eq!(distinct_colors(&code).len(), 2);
    }
    Ok(())
}

#[test]
fn two_color_needs_two_pegs() -> Result<(), MastermindError> {
    let board = Board::with_letters(1, 6)?;
    let mut rng = StdRng::seed_from_u64(2);

    assert_matches!(
        TwoColor.generate_code(&board, &mut rng),
        Err(MastermindError::TooFewPegs {
            policy: "TwoColor",
            needed: 2,
            available: 1
        })
    );
    Ok(())
}

#[test]
fn ab_color_uses_first_two_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(5, 6)?;
    let expected: BTreeSet<Color> = [Color(0), Color(1)].into_iter().collect();

    for code in generate(&ABColor, &board, 3)? {
        assert_eq!(distinct_colors(&code), expected);
    }
    Ok(())
}

#[test]
fn two_color_alternating_alternates() -> Result<(), MastermindError> {
    let board = Board::with_letters(5, 6)?;

    for code in generate(&TwoColorAlternating, &board, 4)? {
        assert_ne!(code[0], code[1]);
        for position in 2..code.len() {
            assert_eq!(code[position], code[position - 2]);
        }
    }
    Ok(())
}

#[test]
fn only_once_never_repeats() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 6)?;

    for code in generate(&OnlyOnce, &board, 5)? {
        assert_eq!(distinct_colors(&code).len(), 4);
    }
    Ok(())
}

#[test]
fn only_once_needs_enough_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 3)?;
    let mut rng = StdRng::seed_from_u64(5);

    assert_matches!(
        OnlyOnce.generate_code(&board, &mut rng),
        Err(MastermindError::AlphabetTooSmall {
            policy: "OnlyOnce",
            needed: 4,
            available: 3
        })
    );
    Ok(())
}

#[test]
fn first_last_matches_ends() -> Result<(), MastermindError> {
    let board = Board::with_letters(5, 6)?;

    for code in generate(&FirstLast, &board, 6)? {
        assert_eq!(code.first(), code.last());
    }
    Ok(())
}

#[test]
fn first_last_single_peg() -> Result<(), MastermindError> {
    let board = Board::with_letters(1, 3)?;

    generate(&FirstLast, &board, 6)?;
    Ok(())
}

#[test]
fn usually_fewer_mostly_uses_few_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(6, 8)?;

    let codes = generate(&UsuallyFewer, &board, 7)?;

    let few = codes
        .iter()
        .filter(|code| distinct_colors(code).len() <= 3)
        .count();
    assert!(few >= NUM_SAMPLES * 3 / 4);
    Ok(())
}

#[test]
fn usually_fewer_needs_three_colors() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 2)?;
    let mut rng = StdRng::seed_from_u64(7);

    assert_matches!(
        UsuallyFewer.generate_code(&board, &mut rng),
        Err(MastermindError::AlphabetTooSmall { needed: 3, .. })
    );
    Ok(())
}

#[test]
fn prefer_fewer_favours_one_color() -> Result<(), MastermindError> {
    let board = Board::with_letters(6, 8)?;

    let codes = generate(&PreferFewer, &board, 8)?;

    let monochrome = codes
        .iter()
        .filter(|code| distinct_colors(code).len() == 1)
        .count();
    assert!(monochrome >= NUM_SAMPLES / 3);
    let at_most_five = codes
        .iter()
        .filter(|code| distinct_colors(code).len() <= 5)
        .count();
    assert!(at_most_five >= NUM_SAMPLES * 9 / 10);
    Ok(())
}

#[test]
fn same_seed_same_codes() -> Result<(), MastermindError> {
    let board = Board::with_letters(4, 6)?;

    assert_eq!(
        generate(&UsuallyFewer, &board, 9)?,
        generate(&UsuallyFewer, &board, 9)?
    );
    Ok(())
}

#[test]
fn selector_by_name_knows_every_selector() {
    for name in SELECTOR_NAMES {
        assert_eq!(
            selector_by_name(name).map(|selector| selector.name()),
            Some(name)
        );
    }
    assert!(selector_by_name("insertcolors").is_none());
}
