//! Bounded retry policy for opening storage connections.
//!
//! Only the storage connection is retried. Data-source fetches are attempted
//! once and surface their failure immediately.

use std::{fmt, thread, time::Duration};

use log::warn;

/// Default number of connection attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default fixed delay between connection attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Delay schedule applied between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay after every failure.
    Fixed(Duration),
    /// Doubling delay starting at `initial`, capped at `max`.
    Exponential {
        /// Delay after the first failure.
        initial: Duration,
        /// Upper bound for any single delay.
        max: Duration,
    },
}

impl Backoff {
    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use popstat_core::Backoff;
    ///
    /// let backoff = Backoff::Exponential {
    ///     initial: Duration::from_millis(100),
    ///     max: Duration::from_millis(350),
    /// };
    /// assert_eq!(backoff.delay_after(1), Duration::from_millis(100));
    /// assert_eq!(backoff.delay_after(2), Duration::from_millis(200));
    /// assert_eq!(backoff.delay_after(3), Duration::from_millis(350));
    /// ```
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { initial, max } => 2_u32
                .checked_pow(attempt.saturating_sub(1))
                .and_then(|factor| initial.checked_mul(factor))
                .map_or(max, |delay| delay.min(max)),
        }
    }
}

/// Source of delays between attempts.
///
/// Production code sleeps the current thread; tests substitute a recording
/// clock so retry schedules can be asserted without waiting.
pub trait Sleeper {
    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Failure reported once every attempt has been used.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Number of attempts made.
    pub attempts: u32,
    /// Error returned by the final attempt.
    pub last_error: E,
}

/// Maximum attempts plus the delay schedule between them.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use popstat_core::{Backoff, RetryPolicy, Sleeper};
///
/// struct NoWait;
/// impl Sleeper for NoWait {
///     fn sleep(&self, _: Duration) {}
/// }
///
/// let policy = RetryPolicy::new(3, Backoff::Fixed(Duration::from_secs(2)));
/// let outcome: Result<u32, _> = policy.run(&NoWait, |attempt| {
///     if attempt < 3 { Err("not yet") } else { Ok(attempt) }
/// });
/// assert_eq!(outcome.ok(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Backoff::Fixed(DEFAULT_DELAY))
    }
}

impl RetryPolicy {
    /// Build a policy. A zero attempt budget is raised to one.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Policy that tries exactly once.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Fixed(Duration::ZERO),
        }
    }

    /// Number of attempts the policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay schedule between attempts.
    #[must_use]
    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Run `operation` until it succeeds or the budget is spent.
    ///
    /// The closure receives the 1-based attempt number. No delay follows the
    /// final attempt.
    ///
    /// # Errors
    /// Returns [`RetryExhausted`] carrying the last error when every attempt
    /// fails.
    pub fn run<T, E, F>(&self, sleeper: &dyn Sleeper, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        E: fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(last_error) if attempt >= self.max_attempts => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error,
                    });
                }
                Err(error) => {
                    let delay = self.backoff.delay_after(attempt);
                    warn!(
                        "event=retry status=failed attempt={attempt} max_attempts={} delay_ms={} error={error}",
                        self.max_attempts,
                        delay.as_millis()
                    );
                    sleeper.sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
