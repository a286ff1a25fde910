/// The fixed set of items under comparison and their mutable ratings.
///
/// Membership never changes after construction. Callers address items by
/// identifier; the crate maps them to pool positions internally.
use std::collections::HashMap;

use crate::constants::INITIAL_RATING;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ItemPool {
    items: Vec<String>,
    index: HashMap<String, usize>,
    ratings: Vec<f64>,
    games_played: Vec<usize>,
    wins: Vec<usize>,
}

impl ItemPool {
    /// Build a pool where every item starts at the baseline rating.
    ///
    /// Items keep the order they were supplied in; that order is what
    /// `all_items()` returns and what breaks rating ties when ranking.
    pub fn new<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_initial_rating(items, INITIAL_RATING)
    }

    pub fn with_initial_rating<I, S>(items: I, initial_rating: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();

        let mut index = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if index.insert(item.clone(), idx).is_some() {
                return Err(Error::DuplicateItem(item.clone()));
            }
        }

        if items.len() < 2 {
            return Err(Error::InsufficientItems { found: items.len() });
        }

        let n = items.len();
        Ok(ItemPool {
            items,
            index,
            ratings: vec![initial_rating; n],
            games_played: vec![0; n],
            wins: vec![0; n],
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in pool order.
    pub fn all_items(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, item: &str) -> bool {
        self.index.contains_key(item)
    }

    /// Current rating of `item`. Panics if the item is not in the pool.
    pub fn rating(&self, item: &str) -> f64 {
        self.ratings[self.to_idx(item)]
    }

    /// Overwrite the rating of `item`. Panics if the item is not in the pool.
    pub fn set_rating(&mut self, item: &str, rating: f64) {
        let idx = self.to_idx(item);
        self.ratings[idx] = rating;
    }

    /// Ratings in pool order.
    pub fn ratings(&self) -> &[f64] {
        &self.ratings
    }

    /// Number of recorded comparisons `item` took part in.
    pub fn games_played(&self, item: &str) -> usize {
        self.games_played[self.to_idx(item)]
    }

    pub fn wins(&self, item: &str) -> usize {
        self.wins[self.to_idx(item)]
    }

    pub(crate) fn to_idx(&self, item: &str) -> usize {
        *self.index.get(item)
            .unwrap_or_else(|| panic!("Unknown item: {}", item))
    }

    pub(crate) fn item_at(&self, idx: usize) -> &str {
        &self.items[idx]
    }

    pub(crate) fn rating_at(&self, idx: usize) -> f64 {
        self.ratings[idx]
    }

    pub(crate) fn set_rating_at(&mut self, idx: usize, rating: f64) {
        self.ratings[idx] = rating;
    }

    pub(crate) fn record_outcome(&mut self, winner: usize, loser: usize) {
        self.games_played[winner] += 1;
        self.games_played[loser] += 1;
        self.wins[winner] += 1;
    }
}
