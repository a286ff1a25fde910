/// Pair selection with a short-term no-repeat constraint.
///
/// Pairs are drawn uniformly at random from the items that are not in the
/// recency window. When fewer than two such items remain the window is
/// cleared and the whole pool becomes eligible again.
use std::collections::VecDeque;

use rand::Rng;

use crate::constants::RECENCY_WINDOW_SIZE;
use crate::error::{Error, Result};
use crate::pool::ItemPool;
use crate::types::{IndexedPair, Pair};

/// The most recently shown items, oldest first.
#[derive(Debug, Clone)]
pub struct RecencyWindow {
    entries: VecDeque<usize>,
    capacity: usize,
}

impl Default for RecencyWindow {
    fn default() -> Self {
        RecencyWindow::new(RECENCY_WINDOW_SIZE)
    }
}

impl RecencyWindow {
    pub fn new(capacity: usize) -> Self {
        RecencyWindow {
            entries: VecDeque::with_capacity(capacity + 2),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Identifiers of the items in the window, oldest first.
    pub fn items<'a>(&'a self, pool: &'a ItemPool) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().map(move |&idx| pool.item_at(idx))
    }

    pub(crate) fn contains(&self, idx: usize) -> bool {
        self.entries.contains(&idx)
    }

    /// Append a shown pair and evict the oldest entries beyond capacity.
    pub(crate) fn push_pair(&mut self, (a, b): IndexedPair) {
        self.entries.push_back(a);
        self.entries.push_back(b);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

/// Choose the next pair to show and record it in the window.
///
/// Fails only when the pool has fewer than two items.
pub fn select_pair(
    pool: &ItemPool,
    window: &mut RecencyWindow,
    rng: &mut impl Rng,
) -> Result<Pair> {
    let (a, b) = select_pair_indexed(pool, window, rng)?;
    Ok((pool.item_at(a).to_string(), pool.item_at(b).to_string()))
}

pub(crate) fn select_pair_indexed(
    pool: &ItemPool,
    window: &mut RecencyWindow,
    rng: &mut impl Rng,
) -> Result<IndexedPair> {
    let num_items = pool.len();
    if num_items < 2 {
        return Err(Error::InsufficientItems { found: num_items });
    }

    let mut candidates: Vec<usize> = (0..num_items)
        .filter(|&idx| !window.contains(idx))
        .collect();

    if candidates.len() < 2 {
        tracing::debug!(
            eligible = candidates.len(),
            window = window.len(),
            "Recency window exhausted the pool, resetting"
        );
        window.clear();
        candidates = (0..num_items).collect();
    }

    let pair = draw_two(&mut candidates, rng);
    window.push_pair(pair);
    Ok(pair)
}

/// Uniform draw of two distinct entries, without replacement.
fn draw_two(candidates: &mut Vec<usize>, rng: &mut impl Rng) -> IndexedPair {
    let first = candidates.swap_remove(rng.random_range(0..candidates.len()));
    let second = candidates[rng.random_range(0..candidates.len())];
    (first, second)
}
