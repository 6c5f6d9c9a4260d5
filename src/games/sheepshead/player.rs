use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::utils::pop_random;

use super::card::{Card, Power, Suit};
use super::hand::{Hand, PickStyle, Trick, SEATS, TRICKS_PER_HAND, TRICK_SIZE};

/// A decision provider for one seat at the table. The game loop treats every
/// call as a synchronous request that always returns a legal decision.
pub trait Player {
    fn name(&self) -> &str;
    fn seat(&self) -> usize;
    fn score(&self) -> i32;
    fn add_score(&mut self, delta: i32);

    /// Asked once per hand, in seat order starting left of the dealer
    fn wants_to_pick(&mut self) -> bool;

    /// Pick up the blind, bury two cards, and choose how to play the hand
    fn pick(&mut self, blind: Vec<Card>) -> (PickStyle, Option<Card>);

    /// Produce a new Hand with exactly one additional card appended, drawn
    /// from this player's held cards and honoring the role's obligations
    fn play(&mut self, hand: &Hand) -> Hand;

    fn get_deal(&mut self, cards: Vec<Card>);

    /// All players are told the picker's choice before the first trick
    fn update_picker_choice(&mut self, style: PickStyle, called_card: Option<Card>);

    /// Bank a trick this player won. Hidden cards are revealed; only the
    /// player taking the trick ever sees an under card's true face.
    fn take(&mut self, trick: &Trick);

    /// Card points from tricks taken plus, for the picker, the bury
    fn points_taken(&self) -> i32;

    fn is_picker(&self) -> bool;
    fn is_partner(&self) -> bool;
    fn is_opposition(&self) -> bool {
        !(self.is_picker() || self.is_partner())
    }

    /// Whether this player can tell who the picker's partner is, derived
    /// from their own cards and the public trick history
    fn partner_is_known(&self, hand: &Hand) -> bool;

    /// Clears per-hand state, preserving name, seat, and score
    fn reset(&mut self);

    fn description(&self) -> String {
        self.name().to_string()
    }
}

/// The per-role play logic. Assigned once when the picker's choice is
/// announced and terminal for the remainder of the hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayStrategy {
    #[default]
    Opposition,
    CalledAcePicker,
    CalledTenPicker,
    UnderPicker,
    Partner,
}

impl PlayStrategy {
    /// Opens a new trick. Only legal when the hand is empty or the previous
    /// trick is finished; anything else is a caller bug.
    pub fn lead(&self, cards: &mut Vec<Card>, hand: &Hand, rng: &mut impl Rng) -> Hand {
        assert!(
            hand.is_empty() || hand.last_trick().map_or(true, |t| t.is_empty() || t.is_full()),
            "lead called mid-trick"
        );
        assert_eq!(cards.len(), TRICKS_PER_HAND - hand.len());

        if cards.len() == 1 {
            let card = cards.pop().expect("exactly one card remains");
            return hand.play(card).expect("the last card is always playable");
        }

        match self {
            PlayStrategy::Opposition | PlayStrategy::CalledAcePicker => {
                lead_random(cards, hand, None, rng)
            }
            PlayStrategy::UnderPicker => {
                // the under card stays back until its suit is led
                let under = cards.iter().copied().find(|c| c.is_hidden());
                lead_random(cards, hand, under, rng)
            }
            PlayStrategy::CalledTenPicker => {
                // leading the called suit means leading the retained ace
                let called = hand.called_card().expect("called-ten hands call a card");
                let compliment = cards.iter().copied().find(|c| {
                    c.is_fail() && c.suit() == called.suit() && c.power() == Power::Ace
                });
                let Some(compliment) = compliment else {
                    return lead_random(cards, hand, None, rng);
                };
                let mut card = *cards.choose(rng).expect("more than one card remains");
                if card.is_fail() && card.suit() == compliment.suit() {
                    card = compliment;
                }
                remove_card(cards, card);
                hand.play(card).expect("a held card is always playable")
            }
            PlayStrategy::Partner => {
                // leading the called suit means leading the called card
                let called = hand.called_card().expect("partnered hands call a card");
                let mut card = *cards.choose(rng).expect("more than one card remains");
                if cards.contains(&called) && card.is_fail() && card.suit() == called.suit() {
                    card = called;
                }
                remove_card(cards, card);
                hand.play(card).expect("a held card is always playable")
            }
        }
    }

    /// Plays to the open trick. Only legal mid-trick; anything else is a
    /// caller bug.
    pub fn follow(&self, cards: &mut Vec<Card>, hand: &Hand, rng: &mut impl Rng) -> Hand {
        let current = hand.last_trick().expect("follow requires an open trick");
        assert!(
            !current.is_empty() && !current.is_full(),
            "follow requires an open trick"
        );
        assert_eq!(cards.len(), TRICKS_PER_HAND + 1 - hand.len());

        if cards.len() == 1 {
            let card = cards.pop().expect("exactly one card remains");
            return hand.play(card).expect("the last card is always playable");
        }

        let lead = current[0];
        match self {
            PlayStrategy::Opposition => follow_random(cards, hand, None, rng),
            PlayStrategy::Partner => {
                let called = hand.called_card().expect("partnered hands call a card");
                if cards.contains(&called) && lead.is_fail() && lead.suit() == called.suit() {
                    remove_card(cards, called);
                    return hand.play(called).expect("the called card is held");
                }
                follow_random(cards, hand, Some(called), rng)
            }
            PlayStrategy::CalledTenPicker => {
                let called = hand.called_card().expect("called-ten hands call a card");
                let compliment = cards.iter().copied().find(|c| {
                    c.is_fail() && c.suit() == called.suit() && c.power() == Power::Ace
                });
                if let Some(compliment) = compliment {
                    if lead.is_fail() && lead.suit() == called.suit() {
                        remove_card(cards, compliment);
                        return hand.play(compliment).expect("the retained ace is held");
                    }
                }
                follow_random(cards, hand, compliment, rng)
            }
            PlayStrategy::CalledAcePicker => {
                let called = hand.called_card().expect("called-ace hands call a card");
                if !hand.called_suit_was_led() {
                    let compliment = cards
                        .iter()
                        .copied()
                        .find(|c| c.is_fail() && c.suit() == called.suit())
                        .expect("the picker retains a card of the called suit");
                    return follow_random(cards, hand, Some(compliment), rng);
                }
                follow_random(cards, hand, None, rng)
            }
            PlayStrategy::UnderPicker => {
                let called = hand.called_card().expect("under hands call a card");
                if !hand.called_suit_was_led() {
                    let under = cards
                        .iter()
                        .copied()
                        .find(|c| c.is_hidden() && c.suit() == called.suit())
                        .expect("the picker retains the under card");
                    return follow_random(cards, hand, Some(under), rng);
                }
                follow_random(cards, hand, None, rng)
            }
        }
    }
}

fn remove_card(cards: &mut Vec<Card>, card: Card) {
    let idx = cards
        .iter()
        .position(|c| *c == card)
        .expect("the chosen card is held");
    cards.remove(idx);
}

/// Leads a random card. The illegal card is only led if nothing else remains.
fn lead_random(cards: &mut Vec<Card>, hand: &Hand, illegal: Option<Card>, rng: &mut impl Rng) -> Hand {
    let card = pop_random(cards, illegal.as_ref(), rng);
    hand.play(card).expect("a held card is always playable")
}

/// Follows the lead suit with a random card: trump must answer trump, a fail
/// lead must be followed in suit. A void discards randomly, excluding the
/// fallback unless it is the only remaining choice.
fn follow_random(cards: &mut Vec<Card>, hand: &Hand, fallback: Option<Card>, rng: &mut impl Rng) -> Hand {
    let fallback = if cards.len() == 1 { None } else { fallback };
    let lead = hand.last_trick().expect("follow requires an open trick")[0];
    let followers: Vec<Card> = if lead.is_trump() {
        cards.iter().copied().filter(|c| c.is_trump()).collect()
    } else {
        cards
            .iter()
            .copied()
            .filter(|c| c.is_fail() && c.suit() == lead.suit())
            .collect()
    };
    let card = match followers.choose(rng) {
        Some(card) => *card,
        None => {
            let candidates: Vec<Card> = cards
                .iter()
                .copied()
                .filter(|c| Some(*c) != fallback)
                .collect();
            *candidates.choose(rng).expect("a legal card remains")
        }
    };
    remove_card(cards, card);
    hand.play(card).expect("a held card is always playable")
}

/// A basic implementation of the player interface.
/// Follows the rules but otherwise plays randomly.
pub struct DefaultPlayer {
    name: String,
    seat: usize,
    score: i32,
    tricks: Vec<Trick>,
    dealt_cards: Vec<Card>,
    bury: Option<Vec<Card>>,
    partner_seat: Option<usize>,
    strategy: PlayStrategy,
    rng: StdRng,
}

impl DefaultPlayer {
    pub fn new(name: &str, seat: usize) -> DefaultPlayer {
        Self::with_rng(name, seat, StdRng::from_entropy())
    }

    pub fn with_rng(name: &str, seat: usize, rng: StdRng) -> DefaultPlayer {
        assert!(seat < SEATS, "expected a seat between 0-4 but got {}", seat);
        DefaultPlayer {
            name: name.to_string(),
            seat,
            score: 0,
            tricks: vec![],
            dealt_cards: vec![],
            bury: None,
            partner_seat: None,
            strategy: PlayStrategy::default(),
            rng,
        }
    }

    fn bury_two(&mut self) {
        let first = self.dealt_cards.pop().expect("the picker holds eight cards");
        let second = self.dealt_cards.pop().expect("the picker holds eight cards");
        self.bury = Some(vec![first, second]);
    }

    /// Removes `keep` while the bury is popped so it cannot be thrown away
    fn keep_and_bury(&mut self, keep: Card) {
        remove_card(&mut self.dealt_cards, keep);
        self.bury_two();
        self.dealt_cards.push(keep);
    }

    /// Evaluates the eight-card pool (six dealt plus the blind) and commits
    /// to a call. Split from `pick` so the decision tree stays deterministic
    /// under test; `pick` adds the random go-alone shortcut on top.
    fn choose_pick(&mut self, blind: Vec<Card>) -> (PickStyle, Option<Card>) {
        self.dealt_cards.extend(blind);

        let fail: Vec<Card> = self
            .dealt_cards
            .iter()
            .copied()
            .filter(|c| c.is_fail())
            .collect();
        if fail.is_empty() {
            // no fail cards: go under with a suit we cannot possibly hold
            self.bury_two();
            let any_card = self.dealt_cards.pop().expect("the picker holds six cards");
            let mask = *Suit::fail_suits()
                .choose(&mut self.rng)
                .expect("there are three fail suits");
            self.dealt_cards
                .push(Card::masked(any_card.suit(), any_card.power(), mask));
            return (PickStyle::Under, Some(Card::new(mask, Power::Ace)));
        }

        let fail_aces: Vec<Card> = fail
            .iter()
            .copied()
            .filter(|c| c.power() == Power::Ace)
            .collect();
        if fail_aces.is_empty() {
            // any fail can serve as the match to the partner's ace
            let fail_to_keep = fail[0];
            self.keep_and_bury(fail_to_keep);
            return (
                PickStyle::CalledAce,
                Some(Card::new(fail_to_keep.suit(), Power::Ace)),
            );
        }

        if fail_aces.len() == 3 {
            let fail_tens: Vec<Card> = fail
                .iter()
                .copied()
                .filter(|c| c.power() == Power::Ten)
                .collect();
            if fail_tens.len() == 3 {
                // all the fail aces and all the fail tens leaves nobody to call
                self.bury_two();
                return (PickStyle::Alone, None);
            }
            let ten_suits: Vec<Suit> = fail_tens.iter().map(|c| c.suit()).collect();
            let chosen_ace = *fail_aces
                .iter()
                .find(|ace| !ten_suits.contains(&ace.suit()))
                .expect("some fail suit is missing its ten");
            self.keep_and_bury(chosen_ace);
            return (
                PickStyle::CalledTen,
                Some(Card::new(chosen_ace.suit(), Power::Ten)),
            );
        }

        let fail_ace_suits: Vec<Suit> = fail_aces.iter().map(|c| c.suit()).collect();
        let keepable = fail
            .iter()
            .copied()
            .find(|c| !fail_ace_suits.contains(&c.suit()));
        if let Some(fail_to_keep) = keepable {
            // at least one fail suit is missing its ace: call it
            self.keep_and_bury(fail_to_keep);
            return (
                PickStyle::CalledAce,
                Some(Card::new(fail_to_keep.suit(), Power::Ace)),
            );
        }

        // we hold the ace of every fail suit we hold; go under with one of
        // the suits whose ace is elsewhere
        self.bury_two();
        let possible: Vec<Suit> = Suit::fail_suits()
            .into_iter()
            .filter(|s| !fail_ace_suits.contains(s))
            .collect();
        let mask = *possible
            .choose(&mut self.rng)
            .expect("not all three fail aces are held");
        let any_card = self.dealt_cards.pop().expect("the picker holds six cards");
        self.dealt_cards
            .push(Card::masked(any_card.suit(), any_card.power(), mask));
        (PickStyle::Under, Some(Card::new(mask, Power::Ace)))
    }
}

impl Player for DefaultPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn seat(&self) -> usize {
        self.seat
    }

    fn score(&self) -> i32 {
        self.score
    }

    fn add_score(&mut self, delta: i32) {
        self.score += delta;
    }

    fn wants_to_pick(&mut self) -> bool {
        self.rng.gen::<f64>() < 0.2
    }

    fn pick(&mut self, blind: Vec<Card>) -> (PickStyle, Option<Card>) {
        debug!("{} picks up the blind {:?}", self.name, blind);
        if self.rng.gen::<f64>() <= 0.25 {
            // bury the blind sight unseen and go it alone
            self.bury = Some(blind);
            return (PickStyle::Alone, None);
        }
        self.choose_pick(blind)
    }

    fn play(&mut self, hand: &Hand) -> Hand {
        debug!("{}'s cards: {:?}", self.name, self.dealt_cards);
        let strategy = self.strategy;
        let leading =
            hand.is_empty() || hand.last_trick().map_or(true, |t| t.is_empty() || t.is_full());
        if leading {
            strategy.lead(&mut self.dealt_cards, hand, &mut self.rng)
        } else {
            strategy.follow(&mut self.dealt_cards, hand, &mut self.rng)
        }
    }

    fn get_deal(&mut self, cards: Vec<Card>) {
        assert_eq!(cards.len(), 6, "each player is dealt six cards");
        self.dealt_cards = cards;
        self.dealt_cards.sort_by_key(|c| c.power());
    }

    fn update_picker_choice(&mut self, style: PickStyle, called_card: Option<Card>) {
        if called_card.map_or(false, |c| self.dealt_cards.contains(&c)) {
            self.partner_seat = Some(self.seat);
            self.strategy = PlayStrategy::Partner;
        } else if self.is_picker() {
            self.strategy = match style {
                PickStyle::Alone => PlayStrategy::Opposition,
                PickStyle::Under => PlayStrategy::UnderPicker,
                PickStyle::CalledAce => PlayStrategy::CalledAcePicker,
                PickStyle::CalledTen => PlayStrategy::CalledTenPicker,
            };
        } else {
            self.strategy = PlayStrategy::Opposition;
        }
    }

    fn take(&mut self, trick: &Trick) {
        assert_eq!(trick.len(), TRICK_SIZE);
        debug!("{} takes {:?}", self.name, trick);
        let taken = if trick.iter().any(|c| c.is_hidden()) {
            Trick::with_cards(trick.iter().map(|c| c.reveal()).collect())
                .expect("a revealed trick holds the same five cards")
        } else {
            trick.clone()
        };
        self.tricks.push(taken);
    }

    fn points_taken(&self) -> i32 {
        let from_tricks: i32 = self.tricks.iter().map(|t| t.points()).sum();
        let from_bury: i32 = self
            .bury
            .iter()
            .flatten()
            .map(|c| c.points())
            .sum();
        from_tricks + from_bury
    }

    fn is_picker(&self) -> bool {
        self.bury.is_some()
    }

    fn is_partner(&self) -> bool {
        self.partner_seat == Some(self.seat)
    }

    fn partner_is_known(&self, hand: &Hand) -> bool {
        let Some(called) = hand.called_card() else {
            return false;
        };
        // the holder knows immediately; everyone else learns when the
        // called card shows up on the table
        self.is_partner()
            || self.dealt_cards.contains(&called)
            || hand.iter().any(|trick| trick.contains(&called))
    }

    fn reset(&mut self) {
        self.tricks.clear();
        self.dealt_cards.clear();
        self.bury = None;
        self.partner_seat = None;
        self.strategy = PlayStrategy::default();
    }

    fn description(&self) -> String {
        if self.is_picker() {
            format!("{} (picker)", self.name)
        } else {
            format!("{} (seat {})", self.name, self.seat)
        }
    }
}
