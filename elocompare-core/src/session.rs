/// Session orchestrator.
///
/// Owns all per-session state (pool, recency window, rank snapshot, round log)
/// and drives one round at a time. Presentation and persistence stay outside:
/// the caller supplies a `ChoiceProvider` for each round and receives plain
/// data from `finalize()`.
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{DEFAULT_K_FACTOR, DEFAULT_MAX_ROUNDS, INITIAL_RATING, RECENCY_WINDOW_SIZE};
use crate::convergence::{ConvergenceTracker, RankSnapshot};
use crate::error::{Error, Result};
use crate::pairing::{select_pair_indexed, RecencyWindow};
use crate::pool::ItemPool;
use crate::rating::RatingEngine;
use crate::types::{Choice, ComparisonRecord, FinalRating, SessionResults};

/// Configuration for a session.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    pub k_factor: f64,
    /// The session finishes once this many rounds are recorded.
    pub max_rounds: usize,
    pub recency_window: usize,
    pub initial_rating: f64,
    /// Fixed RNG seed for reproducible pair selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            k_factor: DEFAULT_K_FACTOR,
            max_rounds: DEFAULT_MAX_ROUNDS,
            recency_window: RECENCY_WINDOW_SIZE,
            initial_rating: INITIAL_RATING,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    Running,
    Finished,
}

/// Shows a pair to the user and reports which one they preferred.
///
/// May block for as long as it likes. Returning `Choice::Stop` ends the
/// session without recording the pair.
pub trait ChoiceProvider {
    fn choose(&mut self, first: &str, second: &str) -> Choice;
}

impl<F> ChoiceProvider for F
where
    F: FnMut(&str, &str) -> Choice,
{
    fn choose(&mut self, first: &str, second: &str) -> Choice {
        self(first, second)
    }
}

pub struct Session {
    pool: ItemPool,
    window: RecencyWindow,
    tracker: ConvergenceTracker,
    engine: RatingEngine,
    records: Vec<ComparisonRecord>,
    round: usize,
    max_rounds: usize,
    state: SessionState,
    finalized: Option<SessionResults>,
    rng: StdRng,
}

impl Session {
    /// Start a session over `items`. Fails if fewer than two distinct items
    /// are supplied.
    pub fn new<I, S>(items: I, config: SessionConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        assert!(config.max_rounds >= 1, "Session requires max_rounds >= 1.");

        let pool = ItemPool::with_initial_rating(items, config.initial_rating)?;
        let tracker = ConvergenceTracker::new(&pool);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::debug!(
            items = pool.len(),
            k_factor = config.k_factor,
            max_rounds = config.max_rounds,
            recency_window = config.recency_window,
            "Session started"
        );

        Ok(Session {
            pool,
            window: RecencyWindow::new(config.recency_window),
            tracker,
            engine: RatingEngine::new(config.k_factor),
            records: Vec::new(),
            round: 0,
            max_rounds: config.max_rounds,
            state: SessionState::Running,
            finalized: None,
            rng,
        })
    }

    /// Play one round: pick a pair, ask the provider, update ratings, log it.
    ///
    /// Returns `Ok(None)` when the provider answered `Choice::Stop`; the
    /// session is then finished and the pair is not recorded.
    pub fn run_round(&mut self, provider: &mut impl ChoiceProvider) -> Result<Option<ComparisonRecord>> {
        if self.state == SessionState::Finished {
            return Err(Error::SessionFinished);
        }

        let (first, second) = select_pair_indexed(&self.pool, &mut self.window, &mut self.rng)?;

        let choice = provider.choose(self.pool.item_at(first), self.pool.item_at(second));
        let (winner, loser) = match choice {
            Choice::First => (first, second),
            Choice::Second => (second, first),
            Choice::Stop => {
                tracing::info!(round = self.round, "Stop requested by choice provider");
                self.state = SessionState::Finished;
                return Ok(None);
            }
        };

        // Everything below runs to completion once a choice is in hand.
        let change = self.engine.update_indexed(&mut self.pool, winner, loser);
        let rank_displacement = self.tracker.record_round(&self.pool);

        let record = ComparisonRecord {
            item1: self.pool.item_at(first).to_string(),
            item2: self.pool.item_at(second).to_string(),
            chosen: self.pool.item_at(winner).to_string(),
            not_chosen: self.pool.item_at(loser).to_string(),
            rank_displacement,
        };
        self.records.push(record.clone());
        self.round += 1;

        tracing::debug!(
            round = self.round,
            chosen = %record.chosen,
            not_chosen = %record.not_chosen,
            exchange = change.exchange,
            rank_displacement,
            "Round recorded"
        );

        if self.round >= self.max_rounds {
            tracing::info!(rounds = self.round, "Round limit reached");
            self.state = SessionState::Finished;
        }

        Ok(Some(record))
    }

    /// Run rounds until the session finishes, then finalize.
    pub fn run(&mut self, provider: &mut impl ChoiceProvider) -> Result<&SessionResults> {
        while !self.is_finished() {
            self.run_round(provider)?;
        }
        Ok(self.finalize())
    }

    /// External stop signal. Rounds are synchronous, so this takes effect
    /// before the next round starts.
    pub fn request_stop(&mut self) {
        if self.state == SessionState::Running {
            tracing::info!(round = self.round, "Stop requested");
            self.state = SessionState::Finished;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Close the session and hand back its log and final ratings.
    ///
    /// The first call freezes the results; later calls return the same data.
    pub fn finalize(&mut self) -> &SessionResults {
        self.state = SessionState::Finished;
        let pool = &self.pool;
        let records = &self.records;
        self.finalized.get_or_insert_with(|| {
            tracing::info!(rounds = records.len(), items = pool.len(), "Session finalized");
            SessionResults {
                records: records.clone(),
                final_ratings: pool.all_items().iter()
                    .zip(pool.ratings())
                    .map(|(item, &score)| FinalRating { item: item.clone(), score })
                    .collect(),
            }
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Completed rounds. Always equals `records().len()`.
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn pool(&self) -> &ItemPool {
        &self.pool
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn recency_window(&self) -> &RecencyWindow {
        &self.window
    }

    pub fn last_snapshot(&self) -> &RankSnapshot {
        self.tracker.last_snapshot()
    }

    pub fn k_factor(&self) -> f64 {
        self.engine.k_factor()
    }
}
