use std::fmt;

use enum_iterator::{all, Sequence};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Added to a trump card's power so the weakest trump beats the strongest fail
pub const TRUMP_STRENGTH_OFFSET: i32 = 21;

pub const PACK_SIZE: usize = 32;
pub const PACK_POINTS: i32 = 120;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Suit {
    Diamond,
    Heart,
    Spade,
    Club,
}

impl Suit {
    /// Diamond is always trump; the other three suits are fail
    pub fn fail_suits() -> [Suit; 3] {
        [Suit::Heart, Suit::Spade, Suit::Club]
    }

    pub fn symbol(&self) -> char {
        match self {
            Suit::Diamond => '♦',
            Suit::Heart => '♥',
            Suit::Spade => '♠',
            Suit::Club => '♣',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Base strength of a card within its suit. Jacks and queens outrank aces
/// because they are promoted to trump during play.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Power {
    Seven = 0,
    Eight = 1,
    Nine = 2,
    King = 3,
    Ten = 5,
    Ace = 8,
    Jack = 13,
    Queen = 21,
}

impl Power {
    pub fn value(&self) -> i32 {
        *self as i32
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Power::Seven => "7",
            Power::Eight => "8",
            Power::Nine => "9",
            Power::King => "K",
            Power::Ten => "10",
            Power::Ace => "A",
            Power::Jack => "J",
            Power::Queen => "Q",
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Every card is either trump or fail.
/// All diamonds, jacks, and queens are trump; everything else is fail.
///
/// A masked card is the face-down "under" card: it pretends to belong to its
/// apparent suit, has no power to take a trick, but keeps its point value
/// once revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Card {
    Visible { suit: Suit, power: Power },
    Masked { suit: Suit, power: Power, apparent: Suit },
}

impl Card {
    pub fn new(suit: Suit, power: Power) -> Card {
        Card::Visible { suit, power }
    }

    pub fn masked(suit: Suit, power: Power, apparent: Suit) -> Card {
        Card::Masked { suit, power, apparent }
    }

    /// The suit used for all play-legality purposes: the apparent suit for a
    /// masked card, the true suit otherwise
    pub fn suit(&self) -> Suit {
        match self {
            Card::Visible { suit, .. } => *suit,
            Card::Masked { apparent, .. } => *apparent,
        }
    }

    pub fn power(&self) -> Power {
        match self {
            Card::Visible { power, .. } | Card::Masked { power, .. } => *power,
        }
    }

    /// Strips the mask, returning the true card. Idempotent.
    pub fn reveal(&self) -> Card {
        match self {
            Card::Visible { .. } => *self,
            Card::Masked { suit, power, .. } => Card::new(*suit, *power),
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Card::Masked { .. })
    }

    pub fn is_trump(&self) -> bool {
        !self.is_hidden() && (self.suit() == Suit::Diamond || self.power() >= Power::Jack)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_trump()
    }

    /// Power adjusted for trump. A hidden card compares as strictly weakest.
    pub fn strength(&self) -> i32 {
        if self.is_trump() {
            self.power().value() + TRUMP_STRENGTH_OFFSET
        } else if self.is_hidden() {
            -1
        } else {
            self.power().value()
        }
    }

    /// Card points: 7/8/9 are worth nothing, 10 = 10, J = 2, Q = 3, K = 4, A = 11.
    /// A hidden card scores nothing until revealed.
    pub fn points(&self) -> i32 {
        if self.is_hidden() {
            return 0;
        }
        match self.power() {
            Power::Seven | Power::Eight | Power::Nine => 0,
            Power::King => 4,
            Power::Ten => 10,
            Power::Ace => 11,
            Power::Jack => 2,
            Power::Queen => 3,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hidden() {
            write!(f, "?{}", self.suit())
        } else {
            write!(f, "{}{}", self.power(), self.suit())
        }
    }
}

/// All 32 unique cards of a piquet pack, shuffled uniformly at random
pub fn pack(rng: &mut impl Rng) -> Vec<Card> {
    let mut cards: Vec<Card> = vec![];
    for suit in all::<Suit>() {
        for power in all::<Power>() {
            cards.push(Card::new(suit, power));
        }
    }
    assert_eq!(cards.len(), PACK_SIZE);
    assert_eq!(cards.iter().map(|c| c.points()).sum::<i32>(), PACK_POINTS);
    cards.shuffle(rng);
    cards
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_pack_has_32_unique_cards_worth_120_points() {
        let mut rng = StdRng::seed_from_u64(0);
        let cards = pack(&mut rng);
        assert_eq!(cards.len(), 32);
        let unique: HashSet<Card> = cards.iter().cloned().collect();
        assert_eq!(unique.len(), 32);
        assert_eq!(cards.iter().map(|c| c.points()).sum::<i32>(), 120);
        assert!(cards.iter().all(|c| !c.is_hidden()));
    }

    #[test]
    fn test_trump_classification() {
        assert!(Card::new(Suit::Diamond, Power::Seven).is_trump());
        assert!(Card::new(Suit::Club, Power::Jack).is_trump());
        assert!(Card::new(Suit::Heart, Power::Queen).is_trump());
        assert!(Card::new(Suit::Spade, Power::Ace).is_fail());
        assert!(Card::new(Suit::Club, Power::Ten).is_fail());
    }

    #[test]
    fn test_masked_card_is_never_trump() {
        // a masked queen would otherwise be the strongest card in the pack
        let under = Card::masked(Suit::Diamond, Power::Queen, Suit::Heart);
        assert!(!under.is_trump());
        assert!(under.is_fail());
        assert!(under.is_hidden());
        assert_eq!(under.suit(), Suit::Heart);
    }

    #[test]
    fn test_weakest_trump_beats_strongest_fail() {
        let seven_of_diamonds = Card::new(Suit::Diamond, Power::Seven);
        let ace_of_clubs = Card::new(Suit::Club, Power::Ace);
        assert!(seven_of_diamonds.strength() > ace_of_clubs.strength());
    }

    #[test]
    fn test_hidden_card_is_strictly_weakest_and_worthless() {
        let under = Card::masked(Suit::Club, Power::Ace, Suit::Heart);
        let seven_of_spades = Card::new(Suit::Spade, Power::Seven);
        assert!(under.strength() < seven_of_spades.strength());
        assert_eq!(under.points(), 0);
        assert_eq!(under.reveal().points(), 11);
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let under = Card::masked(Suit::Spade, Power::Ten, Suit::Club);
        let once = under.reveal();
        let twice = under.reveal().reveal();
        assert_eq!(once, twice);
        assert_eq!(once, Card::new(Suit::Spade, Power::Ten));
    }

    #[test]
    fn test_jack_and_queen_outrank_ace_within_trump() {
        let ace = Card::new(Suit::Diamond, Power::Ace);
        let jack = Card::new(Suit::Heart, Power::Jack);
        let queen = Card::new(Suit::Heart, Power::Queen);
        assert!(jack.strength() > ace.strength());
        assert!(queen.strength() > jack.strength());
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::new(Suit::Club, Power::Ten).to_string(), "10♣");
        assert_eq!(
            Card::masked(Suit::Club, Power::Ace, Suit::Heart).to_string(),
            "?♥"
        );
    }
}
