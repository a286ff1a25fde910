/// Rank snapshots and the per-round rank displacement metric.
///
/// Displacement is the mean absolute rank change across the pool between two
/// consecutive snapshots. It tends toward zero as ratings settle, but nothing
/// here enforces that; it is an observational signal only.
use crate::pool::ItemPool;

/// 1-based rank of every item, indexed by pool position.
///
/// Ranks always form a permutation of `1..=N`. Items with equal ratings take
/// consecutive ranks in pool order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankSnapshot {
    ranks: Vec<usize>,
}

impl RankSnapshot {
    pub fn from_pool(pool: &ItemPool) -> Self {
        let ratings = pool.ratings();
        let mut order: Vec<usize> = (0..ratings.len()).collect();
        // Stable sort: ties stay in pool order.
        order.sort_by(|&a, &b| ratings[b].total_cmp(&ratings[a]));

        let mut ranks = vec![0; ratings.len()];
        for (position, &idx) in order.iter().enumerate() {
            ranks[idx] = position + 1;
        }
        RankSnapshot { ranks }
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Rank of `item` in this snapshot. Panics if the item is not in the pool.
    pub fn rank_of(&self, pool: &ItemPool, item: &str) -> usize {
        self.ranks[pool.to_idx(item)]
    }

    /// Ranks in pool order.
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Mean absolute rank change from `previous` to `self`.
    pub fn displacement_from(&self, previous: &RankSnapshot) -> f64 {
        assert_eq!(
            self.ranks.len(),
            previous.ranks.len(),
            "Snapshots cover different pools"
        );
        if self.ranks.is_empty() {
            return 0.0;
        }
        let total: usize = self.ranks.iter()
            .zip(&previous.ranks)
            .map(|(&current, &before)| current.abs_diff(before))
            .sum();
        total as f64 / self.ranks.len() as f64
    }
}

/// Rank the pool as it stands and measure movement against `previous`.
///
/// Returns the new snapshot, which should replace `previous`, together with
/// the displacement.
pub fn record_round(pool: &ItemPool, previous: &RankSnapshot) -> (RankSnapshot, f64) {
    let current = RankSnapshot::from_pool(pool);
    let displacement = current.displacement_from(previous);
    (current, displacement)
}

/// Holds the previous round's snapshot between rounds.
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    previous: RankSnapshot,
}

impl ConvergenceTracker {
    /// Start tracking from the pool's current ordering.
    pub fn new(pool: &ItemPool) -> Self {
        ConvergenceTracker {
            previous: RankSnapshot::from_pool(pool),
        }
    }

    /// Snapshot the pool, return the displacement since the last call.
    pub fn record_round(&mut self, pool: &ItemPool) -> f64 {
        let (current, displacement) = record_round(pool, &self.previous);
        self.previous = current;
        displacement
    }

    pub fn last_snapshot(&self) -> &RankSnapshot {
        &self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingEngine;

    fn assert_permutation(snapshot: &RankSnapshot) {
        let mut ranks = snapshot.ranks().to_vec();
        ranks.sort_unstable();
        let expected: Vec<usize> = (1..=snapshot.len()).collect();
        assert_eq!(ranks, expected);
    }

    #[test]
    fn test_initial_snapshot_follows_pool_order() {
        let pool = ItemPool::new(["A", "B", "C"]).unwrap();
        let snapshot = RankSnapshot::from_pool(&pool);
        assert_eq!(snapshot.ranks(), &[1, 2, 3]);
    }

    #[test]
    fn test_snapshot_orders_by_descending_rating() {
        let mut pool = ItemPool::new(["a", "b", "c", "d"]).unwrap();
        pool.set_rating("a", 950.0);
        pool.set_rating("b", 1100.0);
        pool.set_rating("c", 1000.0);
        pool.set_rating("d", 1100.0);

        let snapshot = RankSnapshot::from_pool(&pool);
        assert_eq!(snapshot.rank_of(&pool, "b"), 1);
        assert_eq!(snapshot.rank_of(&pool, "d"), 2);
        assert_eq!(snapshot.rank_of(&pool, "c"), 3);
        assert_eq!(snapshot.rank_of(&pool, "a"), 4);
        assert_permutation(&snapshot);
    }

    #[test]
    fn test_first_round_displacement() {
        let mut pool = ItemPool::new(["A", "B", "C"]).unwrap();
        let previous = RankSnapshot::from_pool(&pool);

        RatingEngine::default().update(&mut pool, "A", "B");
        let (current, displacement) = record_round(&pool, &previous);

        // A stays 1st, C moves 3 -> 2, B moves 2 -> 3.
        assert_eq!(current.rank_of(&pool, "A"), 1);
        assert_eq!(current.rank_of(&pool, "C"), 2);
        assert_eq!(current.rank_of(&pool, "B"), 3);
        assert!((displacement - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_displacement_iff_identical() {
        let mut pool = ItemPool::new(["a", "b", "c", "d", "e"]).unwrap();
        let mut tracker = ConvergenceTracker::new(&pool);
        assert_eq!(tracker.record_round(&pool), 0.0);

        pool.set_rating("e", 2000.0);
        let moved = tracker.record_round(&pool);
        assert!(moved > 0.0);
        assert_eq!(tracker.record_round(&pool), 0.0);
    }

    #[test]
    fn test_displacement_never_negative() {
        let mut pool = ItemPool::new((0..8).map(|i| format!("item{i}"))).unwrap();
        let mut tracker = ConvergenceTracker::new(&pool);
        let engine = RatingEngine::default();
        let items = pool.all_items().to_vec();

        for round in 0..40 {
            let winner = &items[(round * 3) % 8];
            let loser = &items[(round * 5 + 1) % 8];
            if winner == loser {
                continue;
            }
            engine.update(&mut pool, winner, loser);
            assert!(tracker.record_round(&pool) >= 0.0);
            assert_permutation(tracker.last_snapshot());
        }
    }

    #[test]
    fn test_full_reversal_displacement() {
        let mut pool = ItemPool::new(["a", "b", "c", "d"]).unwrap();
        let before = RankSnapshot::from_pool(&pool);
        pool.set_rating("a", 1.0);
        pool.set_rating("b", 2.0);
        pool.set_rating("c", 3.0);
        pool.set_rating("d", 4.0);
        let after = RankSnapshot::from_pool(&pool);
        // |4-1| + |3-2| + |2-3| + |1-4| = 8, over 4 items.
        assert_eq!(after.displacement_from(&before), 2.0);
    }
}
