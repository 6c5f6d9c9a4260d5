use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::card::{Card, Suit};
use super::error::GameError;

pub const TRICK_SIZE: usize = 5;
pub const TRICKS_PER_HAND: usize = 6;
pub const SEATS: usize = 5;

/// How the picker chose to play the hand. Every style except Alone comes
/// with a called card whose holder is the picker's hidden partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickStyle {
    CalledAce,
    Alone,
    Under,
    CalledTen,
}

/// A readonly ordered set of cards with a maximum length of 5
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trick {
    cards: Vec<Card>,
}

impl Trick {
    pub fn new() -> Trick {
        Trick { cards: vec![] }
    }

    pub fn with_cards(cards: Vec<Card>) -> Result<Trick, GameError> {
        let mut trick = Trick::new();
        for card in cards {
            trick = trick.play(card)?;
        }
        Ok(trick)
    }

    /// Returns a new Trick with the card appended
    pub fn play(&self, card: Card) -> Result<Trick, GameError> {
        if self.cards.contains(&card) {
            return Err(GameError::DuplicateCard(card));
        }
        if self.is_full() {
            return Err(GameError::TrickFull);
        }
        let mut cards = self.cards.clone();
        cards.push(card);
        Ok(Trick { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() == TRICK_SIZE
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn position(&self, card: &Card) -> Option<usize> {
        self.cards.iter().position(|c| c == card)
    }

    pub fn points(&self) -> i32 {
        self.cards.iter().map(|c| c.points()).sum()
    }
}

impl Index<usize> for Trick {
    type Output = Card;

    fn index(&self, i: usize) -> &Card {
        &self.cards[i]
    }
}

/// A readonly ordered set of tricks with a maximum length of 6, plus the
/// fixed metadata of the hand being played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hand {
    dealer_seat: usize,
    picker_seat: usize,
    pick_style: PickStyle,
    called_card: Option<Card>,
    tricks: Vec<Trick>,
}

impl Hand {
    pub fn new(
        dealer_seat: usize,
        picker_seat: usize,
        pick_style: PickStyle,
        called_card: Option<Card>,
    ) -> Result<Hand, GameError> {
        let legal = match pick_style {
            PickStyle::Alone => called_card.is_none(),
            _ => called_card.is_some(),
        };
        if !legal {
            return Err(GameError::IllegalPickCombination {
                style: pick_style,
                called_card,
            });
        }
        Ok(Hand {
            dealer_seat,
            picker_seat,
            pick_style,
            called_card,
            tricks: vec![],
        })
    }

    /// Returns a new Hand with the card appended to the open trick, opening
    /// a fresh trick when there is none or the last one is full
    pub fn play(&self, card: Card) -> Result<Hand, GameError> {
        let mut tricks = self.tricks.clone();
        match tricks.last_mut() {
            Some(last) if !last.is_full() => {
                *last = last.play(card)?;
            }
            _ => {
                if tricks.len() == TRICKS_PER_HAND {
                    return Err(GameError::HandFull);
                }
                tricks.push(Trick::with_cards(vec![card])?);
            }
        }
        Ok(Hand { tricks, ..self.clone() })
    }

    pub fn dealer_seat(&self) -> usize {
        self.dealer_seat
    }

    pub fn picker_seat(&self) -> usize {
        self.picker_seat
    }

    pub fn pick_style(&self) -> PickStyle {
        self.pick_style
    }

    pub fn called_card(&self) -> Option<Card> {
        self.called_card
    }

    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trick> {
        self.tricks.iter()
    }

    pub fn len(&self) -> usize {
        self.tricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tricks.is_empty()
    }

    pub fn last_trick(&self) -> Option<&Trick> {
        self.tricks.last()
    }

    pub fn is_complete(&self) -> bool {
        self.tricks.len() == TRICKS_PER_HAND && self.tricks.iter().all(|t| t.is_full())
    }

    /// True once the called suit has been the lead suit of a finished or
    /// ongoing trick. Obligations on the called card lapse at that point.
    pub fn called_suit_was_led(&self) -> bool {
        let called_suit = match self.called_card {
            Some(card) => card.suit(),
            None => return false,
        };
        self.tricks
            .iter()
            .filter_map(|trick| trick.cards().first())
            .any(|lead| lead.is_fail() && lead.suit() == called_suit)
    }

    /// The tricks won by any of the given seats, derived by replaying the
    /// hand trick by trick and rotating the lead to each winner
    pub fn tricks_taken_by(&self, seats: &[usize]) -> Vec<Trick> {
        let mut taken = vec![];
        let mut lead_seat = (self.dealer_seat + 1) % SEATS;
        for trick in &self.tricks {
            let winning_idx = winning_card_idx(trick, self.called_card)
                .expect("tricks in a hand are never empty");
            let winner_seat = (winning_idx + lead_seat) % SEATS;
            if seats.contains(&winner_seat) {
                taken.push(trick.clone());
            }
            // winner always leads the next trick
            lead_seat = winner_seat;
        }
        taken
    }

    pub fn points_taken_by(&self, seats: &[usize]) -> i32 {
        self.tricks_taken_by(seats)
            .iter()
            .map(|trick| trick.points())
            .sum()
    }

    /// The seat that played the given card
    pub fn seat_with_card(&self, card: Card) -> Result<usize, GameError> {
        let mut lead_seat = (self.dealer_seat + 1) % SEATS;
        for trick in &self.tricks {
            if let Some(card_idx) = trick.position(&card) {
                return Ok((card_idx + lead_seat) % SEATS);
            }
            let winning_idx = winning_card_idx(trick, self.called_card)
                .expect("tricks in a hand are never empty");
            lead_seat = (winning_idx + lead_seat) % SEATS;
        }
        Err(GameError::CardNotFound(card))
    }
}

impl Index<usize> for Hand {
    type Output = Trick;

    fn index(&self, i: usize) -> &Trick {
        &self.tricks[i]
    }
}

/// Index of the winning card of a trick.
///
/// Trump always wins. Otherwise the called card takes the trick whenever its
/// suit was led and it is on the table, even against a stronger card of the
/// same suit (the called-ten rule). Otherwise the strongest fail card of the
/// lead suit wins. The earliest of equally strong cards wins.
pub fn winning_card_idx(trick: &Trick, called_card: Option<Card>) -> Result<usize, GameError> {
    if trick.is_empty() {
        return Err(GameError::EmptyTrick);
    }
    if trick.iter().any(|c| c.is_trump()) {
        return Ok(strongest(trick, |c| c.is_trump()));
    }

    let lead_suit = trick[0].suit();
    if let Some(called) = called_card {
        if trick.contains(&called) && lead_suit == called.suit() {
            return Ok(trick.position(&called).expect("called card is in the trick"));
        }
    }

    Ok(strongest(trick, |c| c.is_fail() && c.suit() == lead_suit))
}

pub fn winning_card(trick: &Trick, called_card: Option<Card>) -> Result<Card, GameError> {
    Ok(trick[winning_card_idx(trick, called_card)?])
}

fn strongest(trick: &Trick, eligible: impl Fn(&Card) -> bool) -> usize {
    let mut best: Option<(usize, i32)> = None;
    for (idx, card) in trick.iter().enumerate() {
        if !eligible(card) {
            continue;
        }
        let strength = card.strength();
        if best.map_or(true, |(_, s)| strength > s) {
            best = Some((idx, strength));
        }
    }
    best.expect("at least one card must be eligible").0
}
