use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle, time::Instant};

use super::{current_runtime, RateLimited, DEFAULT_WAIT};
use crate::Result;

/// Which edges of a throttle window run the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleOptions {
    /// Run the first call of a window immediately
    pub leading: bool,
    /// Run the latest call that arrived during a window when the window ends
    pub trailing: bool,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

/// Where a throttle is in its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// No window is open; the next call opens one
    Idle,
    /// A window is open and nothing is waiting for its end
    Cooldown,
    /// A window is open and a trailing call will run when it ends
    CooldownWithPendingTrailing,
}

/// Throttle `callback` with the [`DEFAULT_WAIT`], running on both edges.
pub fn throttle<Args, R, F>(callback: F) -> Result<Throttle<Args, R, F>>
where
    Args: Send + 'static,
    R: Clone + Send + 'static,
    F: FnMut(Args) -> R + Send + 'static,
{
    Throttle::new(callback, DEFAULT_WAIT, ThrottleOptions::default())
}

/// Runs a callback at most once per `wait` window.
///
/// A call on an idle throttle opens a window. With `leading` it runs right
/// away. Calls made while the window is open are throttled. With `trailing`,
/// the latest of them runs when the window closes and opens the next window,
/// so no two runs are closer than `wait`. A window that closes with nothing
/// pending returns the throttle to idle. If neither edge is enabled, the
/// callback never runs.
///
/// The callback runs under a lock. A callback that panics poisons it, which
/// disables the throttle: every later run panics instead of calling back.
///
/// ```
/// # let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().expect("runtime can be built");
/// # runtime.block_on(async {
/// use chartkit::{ThrottleOptions, ThrottleState, Throttle};
///
/// let throttled = Throttle::new(|x: u32| x * 2, std::time::Duration::from_millis(100), ThrottleOptions::default())
///     .expect("inside a runtime");
/// assert_eq!(Some(2), throttled.call(1));
/// // Throttled: the stale result comes back and 2 runs when the window ends.
/// assert_eq!(Some(2), throttled.call(2));
/// assert_eq!(ThrottleState::CooldownWithPendingTrailing, throttled.state());
/// # });
/// ```
pub struct Throttle<Args, R, F> {
    inner: Arc<Inner<Args, R, F>>,
}

struct Inner<Args, R, F> {
    wait: Duration,
    options: ThrottleOptions,
    runtime: Handle,
    state: Mutex<State<Args, R>>,
    callback: Mutex<F>,
}

struct State<Args, R> {
    timer: Option<JoinHandle<()>>,
    last_args: Option<Args>,
    last_invoke_time: Option<Instant>,
    last_result: Option<R>,
    generation: u64,
}

impl<Args, R, F> Clone for Throttle<Args, R, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Args, R, F> std::fmt::Debug for Throttle<Args, R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("wait", &self.inner.wait)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl<Args, R, F> Throttle<Args, R, F>
where
    Args: Send + 'static,
    R: Clone + Send + 'static,
    F: FnMut(Args) -> R + Send + 'static,
{
    /// Create a throttle on the current tokio runtime.
    pub fn new(callback: F, wait: Duration, options: ThrottleOptions) -> Result<Self> {
        if !options.leading && !options.trailing {
            log::debug!("throttle has neither leading nor trailing edge; it will never run");
        }
        Ok(Self {
            inner: Arc::new(Inner {
                wait,
                options,
                runtime: current_runtime()?,
                state: Mutex::new(State {
                    timer: None,
                    last_args: None,
                    last_invoke_time: None,
                    last_result: None,
                    generation: 0,
                }),
                callback: Mutex::new(callback),
            }),
        })
    }

    /// Offer a call to the throttle. Returns the most recent result of the
    /// callback, which is stale when this call was throttled.
    pub fn call(&self, args: Args) -> Option<R> {
        let ThrottleOptions { leading, trailing } = self.inner.options;
        if !leading && !trailing {
            return None;
        }

        let mut state = self.inner.lock_state();
        if state.timer.is_none() {
            self.inner.open_window(&mut state);
            if leading {
                drop(state);
                log::trace!("leading call");
                return Some(self.inner.invoke(args));
            }
            state.last_args = Some(args);
        } else if trailing {
            state.last_args = Some(args);
        }
        state.last_result.clone()
    }

    /// Where the throttle is in its window.
    pub fn state(&self) -> ThrottleState {
        let state = self.inner.lock_state();
        match (&state.timer, &state.last_args) {
            (None, _) => ThrottleState::Idle,
            (Some(_), None) => ThrottleState::Cooldown,
            (Some(_), Some(_)) => ThrottleState::CooldownWithPendingTrailing,
        }
    }

    /// When the callback last ran.
    pub fn last_invoke_time(&self) -> Option<Instant> {
        self.inner.lock_state().last_invoke_time
    }

    /// The window length.
    pub fn wait(&self) -> Duration {
        self.inner.wait
    }

    /// The configured edges.
    pub fn options(&self) -> ThrottleOptions {
        self.inner.options
    }
}

impl<Args, R, F> RateLimited for Throttle<Args, R, F> {
    /// Close the current window without running the trailing call. The last
    /// result is kept.
    fn cancel(&self) {
        let mut state = self.inner.lock_state();
        if let Some(timer) = state.timer.take() {
            log::debug!("cancelling throttle window");
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        state.last_args = None;
    }

    fn is_pending(&self) -> bool {
        self.inner.lock_state().last_args.is_some()
    }
}

impl<Args, R, F> Inner<Args, R, F>
where
    Args: Send + 'static,
    R: Clone + Send + 'static,
    F: FnMut(Args) -> R + Send + 'static,
{
    fn open_window(self: &Arc<Self>, state: &mut State<Args, R>) {
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let wait = self.wait;
        let inner = Arc::downgrade(self);
        state.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            if let Some(inner) = Weak::upgrade(&inner) {
                inner.close_window(generation);
            }
        }));
    }

    /// A trailing run opens the next window so runs stay `wait` apart.
    fn close_window(self: &Arc<Self>, generation: u64) {
        let args = {
            let mut state = self.lock_state();
            if state.generation != generation {
                log::trace!("stale throttle timer woke up");
                return;
            }
            state.timer = None;
            let args = state.last_args.take();
            if args.is_some() {
                self.open_window(&mut state);
            }
            args
        };
        match args {
            Some(args) => {
                log::debug!("trailing call");
                self.invoke(args);
            }
            None => log::trace!("throttle window closed"),
        }
    }

    fn invoke(&self, args: Args) -> R {
        let started = Instant::now();
        let result = {
            let mut callback = self
                .callback
                .lock()
                .expect("local mutex should not be poisoned");
            (*callback)(args)
        };
        let mut state = self.lock_state();
        state.last_invoke_time = Some(started);
        state.last_result = Some(result.clone());
        result
    }
}

impl<Args, R, F> Inner<Args, R, F> {
    fn lock_state(&self) -> MutexGuard<'_, State<Args, R>> {
        self.state
            .lock()
            .expect("local mutex should not be poisoned")
    }
}

impl<Args, R, F> Drop for Inner<Args, R, F> {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut() {
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
    }
}
