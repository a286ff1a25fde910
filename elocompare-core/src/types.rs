/// Shared data types.
///
/// Items are opaque string identifiers (file names, paths, labels). Inside the
/// crate they are addressed by their position in the pool.

/// Two items to be shown side by side, in display order.
pub type Pair = (String, String);

/// Internal indexed pair (pool positions, not identifiers).
pub(crate) type IndexedPair = (usize, usize);

/// What the choice provider answered for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Choice {
    /// The first item of the pair is preferred.
    First,
    /// The second item of the pair is preferred.
    Second,
    /// No choice; end the session without recording this pair.
    Stop,
}

/// One completed round, as appended to the session log.
///
/// Field order matches the results artifact columns:
/// `Image1, Image2, Chosen, NotChosen, Rank_diff`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonRecord {
    /// First item shown.
    pub item1: String,
    /// Second item shown.
    pub item2: String,
    pub chosen: String,
    pub not_chosen: String,
    /// Mean absolute rank change across the pool caused by this round.
    pub rank_displacement: f64,
}

/// Final score of a single item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalRating {
    pub item: String,
    pub score: f64,
}

/// Everything a persistence sink needs once a session has ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionResults {
    /// Round log, in round order.
    pub records: Vec<ComparisonRecord>,
    /// One entry per item, in pool order.
    pub final_ratings: Vec<FinalRating>,
}

impl SessionResults {
    /// Final ratings sorted by descending score. Equal scores keep pool order.
    pub fn standings(&self) -> Vec<FinalRating> {
        let mut sorted = self.final_ratings.clone();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        sorted
    }
}
