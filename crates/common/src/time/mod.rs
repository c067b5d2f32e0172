//! Time abstraction for testability
//!
//! Cache freshness is decided against wall-clock UTC timestamps, so the
//! clock hands out `DateTime<Utc>` rather than monotonic instants.

mod clock;

pub use clock::{Clock, MockClock, SystemClock};
