use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::hand::{Hand, PickStyle, SEATS, TRICKS_PER_HAND};

/// Classification of a finished hand from the picker team's point of view.
///
/// Point Total | Picker (Alone) | Picker (w/ Partner) | Partner | Opponents
/// ------------|----------------|---------------------|---------|----------
/// All Tricks  |      +12       |         +6          |   +3    |   -3
/// 91 to 120   |       +8       |         +4          |   +2    |   -2
/// 61 to 90    |       +4       |         +2          |   +1    |   -1
/// 31 to 60    |       -4       |         -2          |   -1    |   +1
/// 0 to 30     |       -8       |         -4          |   -2    |   +2
/// No Tricks   |      -12       |         -6          |   -3    |   +3
///
/// Points are exchanged on a zero-sum basis. The picker team needs over half
/// the card points, i.e. 61, to win. Taking all six tricks or none of them
/// overrides the point bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    WinAllTricks = 12,
    WinNoSchneider = 8,
    WinWithSchneider = 4,
    LoseWithSchneider = -4,
    LoseNoSchneider = -8,
    LoseNoTricks = -12,
}

impl Outcome {
    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// Classifies by the picker team's trick count and card points. Trick
    /// checks come first: 120 points does not prove every trick was taken
    /// (a 0-point trick can be lost) and 0 points does not prove none was.
    pub fn classify(tricks_taken: usize, points_taken: i32) -> Outcome {
        if tricks_taken == TRICKS_PER_HAND {
            Outcome::WinAllTricks
        } else if tricks_taken == 0 {
            Outcome::LoseNoTricks
        } else if points_taken >= 91 {
            Outcome::WinNoSchneider
        } else if points_taken >= 61 {
            Outcome::WinWithSchneider
        } else if points_taken >= 31 {
            Outcome::LoseWithSchneider
        } else {
            Outcome::LoseNoSchneider
        }
    }
}

/// Classifies a completed hand and distributes the per-seat score deltas.
///
/// `points_taken` is each seat's final tally of card points from tricks taken
/// plus, for the picker, the bury. Partnered hands derive the partner seat
/// from whoever played the called card.
pub fn score_hand(
    hand: &Hand,
    points_taken: &[i32; SEATS],
) -> Result<(Outcome, [i32; SEATS]), GameError> {
    let picker_seat = hand.picker_seat();
    let mut deltas = [0; SEATS];

    if hand.pick_style() == PickStyle::Alone {
        let tricks = hand.tricks_taken_by(&[picker_seat]).len();
        let outcome = Outcome::classify(tricks, points_taken[picker_seat]);
        for (seat, delta) in deltas.iter_mut().enumerate() {
            *delta = if seat == picker_seat {
                outcome.value()
            } else {
                -outcome.value() / 4
            };
        }
        return Ok((outcome, deltas));
    }

    let called_card = hand
        .called_card()
        .expect("every partnered pick style has a called card");
    let partner_seat = hand.seat_with_card(called_card)?;
    let tricks = hand.tricks_taken_by(&[picker_seat, partner_seat]).len();
    let team_points = points_taken[picker_seat] + points_taken[partner_seat];
    let outcome = Outcome::classify(tricks, team_points);
    for (seat, delta) in deltas.iter_mut().enumerate() {
        *delta = if seat == picker_seat {
            outcome.value() / 2
        } else if seat == partner_seat {
            outcome.value() / 4
        } else {
            -outcome.value() / 4
        };
    }
    Ok((outcome, deltas))
}
