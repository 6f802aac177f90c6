use crate::error::KernelError;
use fritz_domain::config::RetryPolicySettings;
use std::borrow::Cow;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed attempt budget with a constant delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A policy that never sleeps.
    #[must_use]
    pub const fn immediate(attempts: u32) -> Self {
        Self::new(attempts, Duration::ZERO)
    }

    /// At least one attempt is always made.
    const fn budget(&self) -> u32 {
        if self.attempts == 0 { 1 } else { self.attempts }
    }

    fn pause(&self, attempt: u32) {
        if attempt < self.budget() && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl From<RetryPolicySettings> for RetryPolicy {
    fn from(settings: RetryPolicySettings) -> Self {
        Self::new(settings.attempts, settings.delay())
    }
}

/// Calls `check` until it reports ready, sleeping between attempts.
///
/// Returns the attempt (1-based) that succeeded. After the whole budget has
/// reported not-ready, fails with [`KernelError::Timeout`]. Errors from
/// `check` abort immediately.
///
/// # Errors
/// [`KernelError::Timeout`] or whatever `check` returns.
pub fn poll_until<F>(
    policy: RetryPolicy,
    what: impl Into<Cow<'static, str>>,
    mut check: F,
) -> Result<u32, KernelError>
where
    F: FnMut(u32) -> Result<bool, KernelError>,
{
    let what = what.into();
    let budget = policy.budget();
    for attempt in 1..=budget {
        if check(attempt)? {
            debug!(attempt, what = %what, "Ready");
            return Ok(attempt);
        }
        warn!(attempt, max = budget, what = %what, "Not ready yet");
        policy.pause(attempt);
    }
    Err(KernelError::Timeout { what, attempts: budget, context: None })
}

/// Runs `op` until it succeeds, returning the last error once the budget is spent.
///
/// # Errors
/// The error of the final attempt.
pub fn retry<T, F>(policy: RetryPolicy, what: &str, mut op: F) -> Result<T, KernelError>
where
    F: FnMut(u32) -> Result<T, KernelError>,
{
    let budget = policy.budget();
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if attempt < budget => {
                warn!(attempt, max = budget, what, error = %err, "Attempt failed, retrying");
                policy.pause(attempt);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
