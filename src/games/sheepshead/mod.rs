/*
Game: Sheepshead
Five-player trick-taking game played with a 32-card piquet pack.
The picker takes the blind, buries two, and (usually) calls a card whose
holder becomes their secret partner for the hand.
*/

pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod player;
pub mod score;

// Re-export the main types
pub use card::{pack, Card, Power, Suit};
pub use error::GameError;
pub use game::{deal, play_game, play_hand, play_trick, HandResult, Standing};
pub use hand::{winning_card, winning_card_idx, Hand, PickStyle, Trick};
pub use player::{DefaultPlayer, PlayStrategy, Player};
pub use score::{score_hand, Outcome};
