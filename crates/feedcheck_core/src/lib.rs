//! Feedcheck core: relative-time normalization, sort validation and the
//! rate-limit retry state machine. Pure logic, no IO.
mod item;
mod retry;
mod sort;
mod time;

pub use item::Item;
pub use retry::{
    update, RateLimitSignal, RetryEffect, RetryMsg, RetryPhase, RetryState, WaitOutcome,
    DEFAULT_MAX_ATTEMPTS,
};
pub use sort::{validate, OrderingViolation, SortVerdict, DEFAULT_TOLERANCE_MS};
pub use time::{normalize, parse_relative, Instant, LabelDefect, MalformedLabel, RelativeAge, TimeUnit};
