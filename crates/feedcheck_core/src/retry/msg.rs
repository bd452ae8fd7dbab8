#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Settled,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryMsg {
    /// Start the loop from `Idle`.
    Begin,
    /// Navigation wait after the action or a reload ended.
    NavigationFinished(WaitOutcome),
    /// Result of looking for the rate-limit marker on the current page.
    MarkerChecked { visible: bool },
    /// Reload finished; a settle timeout is not fatal.
    ReloadFinished(WaitOutcome),
}
