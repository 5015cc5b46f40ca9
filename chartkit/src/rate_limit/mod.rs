//! Timer-driven gates on how often a callback runs.
//!
//! Limiters schedule onto the tokio runtime they were created in, and use
//! [`tokio::time`] so they follow a paused clock in tests.

mod debounce;
mod throttle;

use std::time::Duration;

use tokio::runtime::Handle;

pub use debounce::{debounce, Debounce};
pub use throttle::{throttle, Throttle, ThrottleOptions, ThrottleState};

use crate::{Error, Result};

/// Quiet period used by [`debounce()`]
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Window used by [`throttle()`]
pub const DEFAULT_WAIT: Duration = Duration::from_millis(100);

/// Common control surface of the rate limiters, for owners that tear them down.
pub trait RateLimited {
    /// Drop any scheduled run. Superseded arguments are released immediately.
    fn cancel(&self);

    /// Whether a run of the callback is scheduled for later.
    fn is_pending(&self) -> bool;
}

fn current_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|_| Error::NoRuntime)
}
