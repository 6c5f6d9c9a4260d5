use thiserror::Error;

use super::card::Card;
use super::hand::PickStyle;

/// Contract violations surfaced by the trick and hand structures. None of
/// these are recoverable during play; callers that trigger them are buggy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("trick already contains {0}")]
    DuplicateCard(Card),
    #[error("trick already holds the maximum of 5 cards")]
    TrickFull,
    #[error("hand already holds the maximum of 6 tricks")]
    HandFull,
    #[error("pick style {style:?} incompatible with called card {called_card:?}")]
    IllegalPickCombination {
        style: PickStyle,
        called_card: Option<Card>,
    },
    #[error("{0} was not played in this hand")]
    CardNotFound(Card),
    #[error("cannot resolve the winner of an empty trick")]
    EmptyTrick,
}
