//! elocompare-core: rating and sampling core for pairwise preference experiments.
//!
//! Show two items, record which one the user prefers, keep an Elo-style score
//! per item, and watch the ranking settle. No IO, no UI. Presentation and
//! persistence are the caller's job.
//!
//! Items are identified by caller-provided strings (file names, labels).
//!
//! # Quick start
//!
//! ```rust
//! use elocompare_core::{Choice, Session, SessionConfig};
//!
//! let items = vec!["cat.jpg", "dog.jpg", "owl.jpg"];
//! let mut session = Session::new(items, SessionConfig {
//!     max_rounds: 20,
//!     seed: Some(7),
//!     ..SessionConfig::default()
//! }).unwrap();
//!
//! // Stand-in for a real user: always prefer the first item shown.
//! let results = session.run(&mut |_: &str, _: &str| Choice::First).unwrap();
//!
//! assert_eq!(results.records.len(), 20);
//! for r in results.standings() {
//!     println!("{}: {:.1}", r.item, r.score);
//! }
//! ```

pub mod constants;
pub mod convergence;
pub mod error;
pub mod pairing;
pub mod pool;
pub mod rating;
pub mod session;
pub mod types;

// Re-export primary public API at crate root.
pub use convergence::{record_round, ConvergenceTracker, RankSnapshot};
pub use error::{Error, Result};
pub use pairing::{select_pair, RecencyWindow};
pub use pool::ItemPool;
pub use rating::{expected_score, rating_exchange, RatingChange, RatingEngine};
pub use session::{ChoiceProvider, Session, SessionConfig, SessionState};
pub use types::{Choice, ComparisonRecord, FinalRating, Pair, SessionResults};
