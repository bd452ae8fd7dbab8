/// Work the driver performs against the session on behalf of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEffect {
    /// Perform the guarded action (form submission).
    PerformAction,
    /// Wait for navigation with the configured timeout; answer with
    /// [`crate::RetryMsg::NavigationFinished`].
    WaitForNavigation,
    /// Answer with [`crate::RetryMsg::MarkerChecked`].
    CheckMarker,
    /// Reload the page and wait for it to settle; answer with
    /// [`crate::RetryMsg::ReloadFinished`].
    ReloadAndSettle,
}
