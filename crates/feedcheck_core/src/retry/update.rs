use feedcheck_logging::{check_debug, check_info, check_warn};

use super::{RateLimitSignal, RetryEffect, RetryMsg, RetryPhase, RetryState, WaitOutcome};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current phase are ignored.
pub fn update(mut state: RetryState, msg: RetryMsg) -> (RetryState, Vec<RetryEffect>) {
    let effects = match (state.phase(), msg) {
        (RetryPhase::Idle, RetryMsg::Begin) => {
            state.enter(RetryPhase::Awaiting);
            vec![RetryEffect::PerformAction, RetryEffect::WaitForNavigation]
        }
        (RetryPhase::Awaiting, RetryMsg::NavigationFinished(outcome)) => {
            // Both a clean wait and a timeout end up asking the same question.
            match outcome {
                WaitOutcome::Settled => state.observe(RateLimitSignal::None),
                WaitOutcome::TimedOut => {
                    check_info!("Navigation timeout. Checking page state...");
                    state.observe(RateLimitSignal::NavigationTimeout);
                }
            }
            state.enter(RetryPhase::Detected);
            vec![RetryEffect::CheckMarker]
        }
        (RetryPhase::Detected, RetryMsg::MarkerChecked { visible: false }) => {
            check_info!("No rate-limit marker after {} reloads", state.attempt());
            state.enter(RetryPhase::Succeeded);
            Vec::new()
        }
        (RetryPhase::Detected, RetryMsg::MarkerChecked { visible: true }) => {
            state.observe(RateLimitSignal::RateLimited);
            if state.can_retry() {
                check_warn!(
                    "Rate-limiting detected, reloading (attempt {} of {})",
                    state.attempt() + 1,
                    state.max_attempts()
                );
                state.enter(RetryPhase::Retrying);
                vec![RetryEffect::ReloadAndSettle]
            } else {
                check_warn!("Rate-limiting detected and no reloads are allowed");
                state.enter(RetryPhase::Failed);
                Vec::new()
            }
        }
        (RetryPhase::Retrying, RetryMsg::ReloadFinished(outcome)) => {
            if outcome == WaitOutcome::TimedOut {
                check_warn!("Reload did not settle in time");
            }
            state.record_reload();
            if state.can_retry() {
                state.enter(RetryPhase::Awaiting);
                vec![RetryEffect::WaitForNavigation]
            } else {
                check_warn!("Max retries reached after {} reloads", state.attempt());
                state.enter(RetryPhase::Failed);
                Vec::new()
            }
        }
        (phase, msg) => {
            check_debug!("Ignoring {:?} in phase {:?}", msg, phase);
            Vec::new()
        }
    };

    (state, effects)
}
