//! Plays and solves games of Mastermind.
//!
//! A [`Round`] hides a secret [`Code`] and asks a [`Guesser`] for guesses until the guesser finds
//! it, gives up, or misbehaves. The [`InferenceGuesser`] deduces the secret by tracking where each
//! discovered color may still be; see [`details`] for its knowledge base.

mod data;
mod engine;
mod inference;
mod knowledge;
mod results;
pub mod selectors;

pub use data::*;
pub use engine::*;
pub use inference::InferenceGuesser;
pub use results::*;
pub use selectors::CodeSelector;

/// Building blocks used by the [`InferenceGuesser`].
pub mod details {
    pub use crate::knowledge::*;
}
