/// Baseline rating assigned to every item when the pool is created.
pub const INITIAL_RATING: f64 = 1000.0;

/// Default K-factor: the largest rating change a single comparison can cause.
/// Held fixed for the whole session.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rating difference at which the favored item is expected to win ten times
/// as often as it loses.
pub const ELO_SCALE: f64 = 400.0;

/// Number of recently shown items kept out of the next selection.
///
/// Every round pushes two items, so a window of 10 keeps roughly the last five
/// pairs off screen. With pools of 11 items or fewer the candidate set regularly
/// drops below two and the window resets, which is expected.
pub const RECENCY_WINDOW_SIZE: usize = 10;

/// Round count at which a session finishes on its own.
pub const DEFAULT_MAX_ROUNDS: usize = 2000;
