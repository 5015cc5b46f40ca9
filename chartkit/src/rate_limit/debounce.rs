use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};

use super::{current_runtime, RateLimited, DEFAULT_DELAY};
use crate::Result;

/// Debounce `callback` with the [`DEFAULT_DELAY`].
pub fn debounce<Args, F>(callback: F) -> Result<Debounce<Args, F>>
where
    Args: Send + 'static,
    F: FnMut(Args) + Send + 'static,
{
    Debounce::new(callback, DEFAULT_DELAY)
}

/// Runs a callback once calls have stopped arriving for `delay`, with the
/// arguments of the last call.
///
/// Clones share the same pending call. When the last clone is dropped, the
/// pending call is dropped with it.
///
/// The callback runs under a lock. A callback that panics poisons it, which
/// disables the debouncer: every later run panics instead of calling back.
pub struct Debounce<Args, F> {
    inner: Arc<Inner<Args, F>>,
}

struct Inner<Args, F> {
    delay: Duration,
    runtime: Handle,
    state: Mutex<State<Args>>,
    callback: Mutex<F>,
}

struct State<Args> {
    timer: Option<JoinHandle<()>>,
    last_args: Option<Args>,
    generation: u64,
}

impl<Args, F> Clone for Debounce<Args, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Args, F> std::fmt::Debug for Debounce<Args, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounce")
            .field("delay", &self.inner.delay)
            .finish_non_exhaustive()
    }
}

impl<Args, F> Debounce<Args, F>
where
    Args: Send + 'static,
    F: FnMut(Args) + Send + 'static,
{
    /// Create a debouncer on the current tokio runtime.
    pub fn new(callback: F, delay: Duration) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Inner {
                delay,
                runtime: current_runtime()?,
                state: Mutex::new(State {
                    timer: None,
                    last_args: None,
                    generation: 0,
                }),
                callback: Mutex::new(callback),
            }),
        })
    }

    /// Replace any pending call with this one, to run after `delay` of quiet.
    pub fn call(&self, args: Args) {
        let mut state = self.inner.lock_state();
        if let Some(timer) = state.timer.take() {
            log::trace!("superseding pending debounced call");
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        state.last_args = Some(args);

        let generation = state.generation;
        let delay = self.inner.delay;
        let inner = Arc::downgrade(&self.inner);
        state.timer = Some(self.inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = Weak::upgrade(&inner) {
                inner.fire(generation);
            }
        }));
    }

    /// Run the pending call now, if there is one.
    pub fn flush(&self) {
        let args = {
            let mut state = self.inner.lock_state();
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.generation = state.generation.wrapping_add(1);
            state.last_args.take()
        };
        if let Some(args) = args {
            log::debug!("flushing debounced call");
            self.inner.invoke(args);
        }
    }

    /// The quiet period this debouncer waits for.
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

impl<Args, F> RateLimited for Debounce<Args, F> {
    fn cancel(&self) {
        let mut state = self.inner.lock_state();
        if let Some(timer) = state.timer.take() {
            log::debug!("cancelling debounced call");
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        state.last_args = None;
    }

    fn is_pending(&self) -> bool {
        self.inner.lock_state().last_args.is_some()
    }
}

impl<Args, F> Inner<Args, F> {
    fn lock_state(&self) -> MutexGuard<'_, State<Args>> {
        self.state
            .lock()
            .expect("local mutex should not be poisoned")
    }

    fn fire(&self, generation: u64)
    where
        F: FnMut(Args),
    {
        let args = {
            let mut state = self.lock_state();
            if state.generation != generation {
                log::trace!("stale debounce timer woke up");
                return;
            }
            state.timer = None;
            state.last_args.take()
        };
        if let Some(args) = args {
            log::debug!("running debounced call");
            self.invoke(args);
        }
    }

    fn invoke(&self, args: Args)
    where
        F: FnMut(Args),
    {
        let mut callback = self
            .callback
            .lock()
            .expect("local mutex should not be poisoned");
        (*callback)(args)
    }
}

impl<Args, F> Drop for Inner<Args, F> {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut() {
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use tokio::time::sleep;

    use super::{debounce, Debounce};
    use crate::{rate_limit::RateLimited, Error};

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl FnMut(u32) + Send + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        (calls, move |value: u32| {
            recorded.lock().expect("test mutex").push(value)
        })
    }

    fn recorded(calls: &Arc<Mutex<Vec<u32>>>) -> Vec<u32> {
        calls.lock().expect("test mutex").clone()
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn rapid_calls_run_once_with_last_arguments() {
        let (calls, callback) = recorder();
        let debounced = tokio_test::assert_ok!(debounce(callback));

        debounced.call(1);
        sleep(Duration::from_millis(30)).await;
        debounced.call(2);
        sleep(Duration::from_millis(30)).await;
        debounced.call(3);
        assert!(debounced.is_pending());
        assert_eq!(Vec::<u32>::new(), recorded(&calls));

        sleep(Duration::from_millis(101)).await;
        assert_eq!(vec![3], recorded(&calls));
        assert!(!debounced.is_pending());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(vec![3], recorded(&calls));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn each_quiet_period_runs() {
        let (calls, callback) = recorder();
        let debounced = tokio_test::assert_ok!(Debounce::new(callback, Duration::from_millis(50)));

        debounced.call(1);
        sleep(Duration::from_millis(51)).await;
        debounced.call(2);
        sleep(Duration::from_millis(51)).await;
        assert_eq!(vec![1, 2], recorded(&calls));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn cancel_drops_the_pending_call() {
        let (calls, callback) = recorder();
        let debounced = tokio_test::assert_ok!(debounce(callback));

        debounced.call(1);
        debounced.cancel();
        assert!(!debounced.is_pending());
        sleep(Duration::from_millis(200)).await;
        assert_eq!(Vec::<u32>::new(), recorded(&calls));

        debounced.call(2);
        sleep(Duration::from_millis(101)).await;
        assert_eq!(vec![2], recorded(&calls));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn flush_runs_immediately() {
        let (calls, callback) = recorder();
        let debounced = tokio_test::assert_ok!(debounce(callback));

        debounced.flush();
        assert_eq!(Vec::<u32>::new(), recorded(&calls));

        debounced.call(7);
        debounced.flush();
        assert_eq!(vec![7], recorded(&calls));
        sleep(Duration::from_millis(200)).await;
        assert_eq!(vec![7], recorded(&calls));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn clones_share_the_pending_call() {
        let (calls, callback) = recorder();
        let debounced = tokio_test::assert_ok!(debounce(callback));
        let cloned = debounced.clone();

        cloned.call(1);
        debounced.call(2);
        sleep(Duration::from_millis(101)).await;
        assert_eq!(vec![2], recorded(&calls));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn dropping_releases_the_pending_call() {
        let (calls, callback) = recorder();
        let debounced = tokio_test::assert_ok!(debounce(callback));

        debounced.call(1);
        drop(debounced);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(Vec::<u32>::new(), recorded(&calls));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn panicking_callback_disables_the_debouncer() {
        let runs = Arc::new(Mutex::new(0));
        let counted = Arc::clone(&runs);
        let debounced = tokio_test::assert_ok!(debounce(move |_: u32| {
            *counted.lock().expect("test mutex") += 1;
            panic!("callback failed");
        }));

        debounced.call(1);
        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| debounced.flush()));
        assert!(first.is_err());

        debounced.call(2);
        assert!(debounced.is_pending(), "scheduling still works");
        let second = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| debounced.flush()));
        assert!(second.is_err());
        assert_eq!(1, *runs.lock().expect("test mutex"));
    }

    #[test_log::test]
    fn requires_a_runtime() {
        assert!(matches!(
            debounce(|_: u32| {}),
            Err(Error::NoRuntime)
        ));
    }
}
