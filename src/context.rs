//! Per-call deadlines.
//!
//! Every request is built against a [`Context`]. Dropping the returned future
//! cancels the call outright; a context additionally bounds how long the
//! round trip may take.

use std::time::{Duration, Instant};

/// Deadline carried by a single API call.
///
/// # Examples
///
/// ```
/// use affise::Context;
/// use std::time::Duration;
///
/// let ctx = Context::with_timeout(Duration::from_secs(5));
/// assert!(ctx.deadline().is_some());
/// assert!(Context::background().deadline().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// A context with no deadline. The client's default timeout still applies.
    pub fn background() -> Self {
        Self { deadline: None }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, saturating at zero.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == Some(Duration::ZERO)
    }
}
