/// Reloads allowed while the rate-limit marker stays visible.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPhase {
    #[default]
    Idle,
    Awaiting,
    Detected,
    Retrying,
    Succeeded,
    Failed,
}

/// Most recent observation that fed the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateLimitSignal {
    #[default]
    None,
    RateLimited,
    NavigationTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    phase: RetryPhase,
    attempt: u32,
    max_attempts: u32,
    last_signal: RateLimitSignal,
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            phase: RetryPhase::Idle,
            attempt: 0,
            max_attempts,
            last_signal: RateLimitSignal::None,
        }
    }

    pub fn phase(&self) -> RetryPhase {
        self.phase
    }

    /// Number of reloads performed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn last_signal(&self) -> RateLimitSignal {
        self.last_signal
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, RetryPhase::Succeeded | RetryPhase::Failed)
    }

    pub(crate) fn can_retry(&self) -> bool {
        self.attempt < self.max_attempts
    }

    pub(crate) fn enter(&mut self, phase: RetryPhase) {
        self.phase = phase;
    }

    pub(crate) fn observe(&mut self, signal: RateLimitSignal) {
        self.last_signal = signal;
    }

    pub(crate) fn record_reload(&mut self) {
        self.attempt += 1;
    }
}
