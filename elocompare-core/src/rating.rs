/// Elo-style pairwise rating updates.
///
/// Each side's expected score is a logistic function of the rating gap. The
/// winner gains `K * (1 - expected_winner)` and the loser gives up exactly the
/// same amount, so every comparison is zero-sum.
use crate::constants::{DEFAULT_K_FACTOR, ELO_SCALE};
use crate::pool::ItemPool;

/// Expected score of an item rated `rating` against one rated `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / ELO_SCALE))
}

/// Points transferred from loser to winner for one comparison.
pub fn rating_exchange(winner_rating: f64, loser_rating: f64, k_factor: f64) -> f64 {
    // The loser's expected score is 1 - expected_winner, so a single delta
    // applied with opposite signs reproduces both halves of the update.
    // Taken directly rather than as 1 - expected_winner, which cancels to 0
    // once the gap passes a few thousand points.
    let exchange = k_factor * expected_score(loser_rating, winner_rating);
    // Never smaller than the float spacing at either rating, so both move.
    exchange
        .max(float_spacing(winner_rating))
        .max(float_spacing(loser_rating))
}

/// Distance from |x| to the next larger representable f64.
fn float_spacing(x: f64) -> f64 {
    let magnitude = x.abs();
    f64::from_bits(magnitude.to_bits() + 1) - magnitude
}

/// Result of applying one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingChange {
    pub winner_before: f64,
    pub loser_before: f64,
    /// Points moved from loser to winner.
    pub exchange: f64,
}

impl RatingChange {
    pub fn winner_after(&self) -> f64 {
        self.winner_before + self.exchange
    }

    pub fn loser_after(&self) -> f64 {
        self.loser_before - self.exchange
    }
}

/// Applies comparisons to a pool with a fixed K-factor.
#[derive(Debug, Clone, Copy)]
pub struct RatingEngine {
    k_factor: f64,
}

impl Default for RatingEngine {
    fn default() -> Self {
        RatingEngine::new(DEFAULT_K_FACTOR)
    }
}

impl RatingEngine {
    pub fn new(k_factor: f64) -> Self {
        assert!(
            k_factor.is_finite() && k_factor > 0.0,
            "K-factor must be a positive finite number, got {}",
            k_factor
        );
        RatingEngine { k_factor }
    }

    pub fn k_factor(&self) -> f64 {
        self.k_factor
    }

    /// Record that `winner` was preferred over `loser`.
    ///
    /// Both must be distinct members of the pool; anything else panics.
    pub fn update(&self, pool: &mut ItemPool, winner: &str, loser: &str) -> RatingChange {
        let winner_idx = pool.to_idx(winner);
        let loser_idx = pool.to_idx(loser);
        self.update_indexed(pool, winner_idx, loser_idx)
    }

    pub(crate) fn update_indexed(&self, pool: &mut ItemPool, winner: usize, loser: usize) -> RatingChange {
        assert_ne!(winner, loser, "An item cannot be compared against itself: {}", pool.item_at(winner));

        let winner_before = pool.rating_at(winner);
        let loser_before = pool.rating_at(loser);
        let exchange = rating_exchange(winner_before, loser_before, self.k_factor);

        pool.set_rating_at(winner, winner_before + exchange);
        pool.set_rating_at(loser, loser_before - exchange);
        pool.record_outcome(winner, loser);

        RatingChange { winner_before, loser_before, exchange }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_scores_sum_to_one() {
        for &(a, b) in &[(1000.0, 1000.0), (1200.0, 1000.0), (-300.0, 2500.0), (0.0, 1.0)] {
            let total = expected_score(a, b) + expected_score(b, a);
            assert!((total - 1.0).abs() < 1e-12, "{a} vs {b}: {total}");
        }
    }

    #[test]
    fn test_equal_ratings_first_round() {
        let mut pool = ItemPool::new(["A", "B", "C"]).unwrap();
        let change = RatingEngine::default().update(&mut pool, "A", "B");

        assert!((change.exchange - 16.0).abs() < 1e-12);
        assert!((pool.rating("A") - 1016.0).abs() < 1e-12);
        assert!((pool.rating("B") - 984.0).abs() < 1e-12);
        assert_eq!(pool.rating("C"), 1000.0);
    }

    #[test]
    fn test_favorite_wins_small_gain() {
        let gain = rating_exchange(1200.0, 1000.0, 32.0);
        assert!((expected_score(1200.0, 1000.0) - 0.7597).abs() < 1e-3);
        assert!((gain - 7.688).abs() < 1e-3, "gain = {gain}");
    }

    #[test]
    fn test_upset_large_gain() {
        let gain = rating_exchange(1000.0, 1200.0, 32.0);
        assert!((gain - 24.312).abs() < 1e-3, "gain = {gain}");
        assert!(gain > rating_exchange(1200.0, 1000.0, 32.0));
    }

    #[test]
    fn test_update_is_zero_sum_and_monotone() {
        let engine = RatingEngine::new(24.0);
        let starts = [
            (1000.0, 1000.0),
            (1400.0, 900.0),
            (850.0, 1325.5),
            (-40.0, 60.0),
            (8000.0, 0.0),
            (0.0, 8000.0),
            (1.0e6, -1.0e6),
        ];
        for &(rw, rl) in &starts {
            let mut pool = ItemPool::new(["w", "l"]).unwrap();
            pool.set_rating("w", rw);
            pool.set_rating("l", rl);
            let change = engine.update(&mut pool, "w", "l");

            let gained = pool.rating("w") - rw;
            let lost = pool.rating("l") - rl;
            assert!((gained + lost).abs() < 1e-9, "exchange not symmetric for {rw} vs {rl}");
            assert_eq!(change.winner_after(), pool.rating("w"));
            assert_eq!(change.loser_after(), pool.rating("l"));
            assert!(pool.rating("w") > rw);
            assert!(pool.rating("l") < rl);
        }
    }

    #[test]
    fn test_lopsided_gap_still_moves_ratings() {
        let gain = rating_exchange(8000.0, 0.0, 32.0);
        assert!(gain > 0.0);
        assert!(8000.0 + gain > 8000.0);
        assert!(0.0 - gain < 0.0);

        let upset = rating_exchange(0.0, 8000.0, 32.0);
        assert!((upset - 32.0).abs() < 1e-9, "upset = {upset}");
    }

    #[test]
    fn test_update_tracks_games_and_wins() {
        let mut pool = ItemPool::new(["a", "b", "c"]).unwrap();
        let engine = RatingEngine::default();
        engine.update(&mut pool, "a", "b");
        engine.update(&mut pool, "c", "a");

        assert_eq!(pool.games_played("a"), 2);
        assert_eq!(pool.wins("a"), 1);
        assert_eq!(pool.games_played("b"), 1);
        assert_eq!(pool.wins("b"), 0);
        assert_eq!(pool.wins("c"), 1);
    }

    #[test]
    fn test_rating_change_after_values() {
        let change = RatingChange { winner_before: 1000.0, loser_before: 1000.0, exchange: 16.0 };
        assert_eq!(change.winner_after(), 1016.0);
        assert_eq!(change.loser_after(), 984.0);
    }

    #[test]
    #[should_panic(expected = "cannot be compared against itself")]
    fn test_self_comparison_panics() {
        let mut pool = ItemPool::new(["a", "b"]).unwrap();
        RatingEngine::default().update(&mut pool, "a", "a");
    }

    #[test]
    #[should_panic(expected = "K-factor must be a positive")]
    fn test_zero_k_factor_rejected() {
        let _ = RatingEngine::new(0.0);
    }
}
