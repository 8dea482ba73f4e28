use serde::{Deserialize, Serialize};

use crate::scoring::PlayerId;

/// A player's recent points-per-turn for one game type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAverage {
    pub player_id: PlayerId,
    pub average: f64,
}

impl PlayerAverage {
    pub fn new(player_id: impl Into<PlayerId>, average: f64) -> Self {
        Self {
            player_id: player_id.into(),
            average,
        }
    }

    fn is_usable(&self) -> bool {
        self.average.is_finite() && self.average > 0.0
    }
}

/// Suggested head start for the weaker of two players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandicapOffer {
    pub player_id: PlayerId,
    pub bonus: u32,
}

/// Projects how far the weaker player would get in the number of turns the
/// stronger player needs to reach the target, and offers the gap as a bonus.
///
/// No offer is made without a usable average for both players or when the
/// averages are equal.
pub fn compute_offer(
    first: &PlayerAverage,
    second: &PlayerAverage,
    target_score: u32,
) -> Option<HandicapOffer> {
    if !first.is_usable() || !second.is_usable() || first.average == second.average {
        return None;
    }

    let (strong, weak) = if first.average > second.average {
        (first, second)
    } else {
        (second, first)
    };

    let target = f64::from(target_score);
    let turns_for_stronger = target / strong.average;
    let weaker_projected = turns_for_stronger * weak.average;
    let bonus = (target - weaker_projected).round();

    if bonus < 1.0 {
        return None;
    }

    Some(HandicapOffer {
        player_id: weak.player_id.clone(),
        bonus: bonus as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, 10.0)]
    #[case(0.0, 3.0)]
    #[case(4.0, 0.0)]
    #[case(0.0, 0.0)]
    #[case(f64::NAN, 2.0)]
    fn no_offer_without_a_clear_signal(#[case] a: f64, #[case] b: f64) {
        let offer = compute_offer(
            &PlayerAverage::new("alice", a),
            &PlayerAverage::new("bob", b),
            100,
        );
        assert_eq!(offer, None);
    }

    #[test]
    fn weaker_player_gets_the_projected_gap() {
        let offer = compute_offer(
            &PlayerAverage::new("alice", 2.0),
            &PlayerAverage::new("bob", 1.0),
            100,
        );

        assert_eq!(
            offer,
            Some(HandicapOffer {
                player_id: "bob".to_string(),
                bonus: 50,
            })
        );
    }

    #[test]
    fn argument_order_does_not_matter() {
        let alice = PlayerAverage::new("alice", 3.0);
        let bob = PlayerAverage::new("bob", 5.0);

        let forward = compute_offer(&alice, &bob, 60);
        let backward = compute_offer(&bob, &alice, 60);

        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            Some(HandicapOffer {
                player_id: "alice".to_string(),
                bonus: 24,
            })
        );
    }

    #[rstest]
    #[case(1.5, 1.0, 25, 8)] // 25 - 16.67 = 8.33
    #[case(3.0, 2.0, 10, 3)] // 10 - 6.67 = 3.33
    #[case(4.0, 3.0, 50, 13)] // 50 - 37.5 rounds half away from zero
    fn bonus_is_rounded(
        #[case] strong: f64,
        #[case] weak: f64,
        #[case] target: u32,
        #[case] expected: u32,
    ) {
        let offer = compute_offer(
            &PlayerAverage::new("strong", strong),
            &PlayerAverage::new("weak", weak),
            target,
        )
        .unwrap();

        assert_eq!(offer.player_id, "weak");
        assert_eq!(offer.bonus, expected);
    }

    #[test]
    fn tiny_gap_rounds_to_no_offer() {
        let offer = compute_offer(
            &PlayerAverage::new("alice", 1.01),
            &PlayerAverage::new("bob", 1.0),
            10,
        );
        assert_eq!(offer, None);
    }
}
