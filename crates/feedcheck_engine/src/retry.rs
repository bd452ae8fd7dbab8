use std::collections::VecDeque;
use std::time::Duration;

use feedcheck_core::{
    update, RateLimitSignal, RetryEffect, RetryMsg, RetryPhase, RetryState, WaitOutcome,
    DEFAULT_MAX_ATTEMPTS,
};
use feedcheck_logging::{check_debug, check_info, check_warn};

use crate::types::settle;
use crate::{ActorError, Credentials, RetryError, SessionActor};

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
    /// Wait for navigation after the submit and after each reload.
    pub navigation_timeout: Duration,
    /// Bound on a reload's settle wait; `None` waits until idle.
    pub settle_timeout: Option<Duration>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            navigation_timeout: Duration::from_millis(5000),
            settle_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    pub reloads: u32,
    pub last_signal: RateLimitSignal,
}

/// Submits the login form and reloads while the rate-limit marker stays
/// visible, up to `max_attempts` reloads.
///
/// Returns [`RetryError::RateLimitExceeded`] once the reloads are spent and
/// the marker is still there.
pub async fn login_with_retry<A>(
    actor: &mut A,
    credentials: &Credentials,
    settings: &RetrySettings,
) -> Result<LoginOutcome, RetryError>
where
    A: SessionActor + ?Sized,
{
    let (mut state, effects) = update(RetryState::new(settings.max_attempts), RetryMsg::Begin);
    let mut pending: VecDeque<RetryEffect> = effects.into();

    while let Some(effect) = pending.pop_front() {
        let Some(msg) = run_effect(actor, credentials, settings, effect).await? else {
            continue;
        };
        let (next, effects) = update(state, msg);
        check_debug!(
            "{:?} -> phase {:?}, attempt {}",
            msg,
            next.phase(),
            next.attempt()
        );
        state = next;
        pending.extend(effects);
    }

    match state.phase() {
        RetryPhase::Succeeded => Ok(LoginOutcome {
            reloads: state.attempt(),
            last_signal: state.last_signal(),
        }),
        RetryPhase::Failed => Err(RetryError::RateLimitExceeded {
            attempts: state.attempt(),
        }),
        phase => Err(RetryError::Stalled(phase)),
    }
}

async fn run_effect<A>(
    actor: &mut A,
    credentials: &Credentials,
    settings: &RetrySettings,
    effect: RetryEffect,
) -> Result<Option<RetryMsg>, ActorError>
where
    A: SessionActor + ?Sized,
{
    match effect {
        RetryEffect::PerformAction => {
            check_info!("Submitting login form for {}", credentials.username);
            actor.submit_login_form(credentials).await?;
            Ok(None)
        }
        RetryEffect::WaitForNavigation => {
            let outcome = actor
                .wait_for_navigation_or_timeout(settings.navigation_timeout)
                .await?;
            Ok(Some(RetryMsg::NavigationFinished(outcome)))
        }
        RetryEffect::CheckMarker => {
            let visible = actor.is_rate_limit_marker_visible().await?;
            Ok(Some(RetryMsg::MarkerChecked { visible }))
        }
        RetryEffect::ReloadAndSettle => {
            let outcome =
                match settle(settings.settle_timeout, "reload", actor.reload_and_settle()).await {
                    Ok(()) => WaitOutcome::Settled,
                    Err(err @ ActorError::SettleTimeout { .. }) => {
                        check_warn!("{}", err);
                        WaitOutcome::TimedOut
                    }
                    Err(err) => return Err(err),
                };
            Ok(Some(RetryMsg::ReloadFinished(outcome)))
        }
    }
}
