//! Date handling: which dates to fetch and what "today" is.

pub mod clock;
pub mod heuristic;

pub use clock::{Clock, FixedClock, SystemClock};
pub use heuristic::{DateHeuristic, SeasonWindow};
