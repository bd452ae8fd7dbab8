//! Rate-limit recovery as a pure state machine driven by messages.
mod effect;
mod msg;
mod state;
mod update;

pub use effect::RetryEffect;
pub use msg::{RetryMsg, WaitOutcome};
pub use state::{RateLimitSignal, RetryPhase, RetryState, DEFAULT_MAX_ATTEMPTS};
pub use update::update;
