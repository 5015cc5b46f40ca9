//! Numeric and timing helpers for chart code.
//!
//! [`chartkit`](crate) bins samples into histograms, densifies series by
//! linear interpolation, and gates noisy callbacks with debounce and throttle.
//!
//! # Histograms
//!
//! ```
//! use chartkit::{histogram_by, BinningMode};
//!
//! let histogram = histogram_by([1.5_f64, 2.0, 9.5, 10.0], 2, BinningMode::Uniform, |v| *v)
//!     .expect("bin count is positive");
//! assert_eq!(vec![2, 2], histogram.counts());
//! ```
//!
//! # Rate limiting
//!
//! Rate limiters run their timers on tokio. Create them from within a runtime:
//!
//! ```
//! # let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().expect("runtime can be built");
//! # runtime.block_on(async {
//! use chartkit::{debounce, RateLimited};
//!
//! let on_resize = debounce(|(width, height): (u32, u32)| println!("{width}x{height}"))
//!     .expect("inside a runtime");
//! on_resize.call((640, 480));
//! on_resize.call((800, 600));
//! // Only 800x600 would be printed, 100ms from now. Tear down instead:
//! on_resize.cancel();
//! # });
//! ```

mod error;
mod extent;
pub mod histogram;
pub mod interpolate;
pub mod rate_limit;

pub use error::{Error, Result};
pub use extent::Extent;
pub use histogram::{histogram, histogram_by, Bin, BinningMode, Histogram};
pub use interpolate::{interpolate, interpolate_by};
pub use rate_limit::{
    debounce, throttle, Debounce, RateLimited, Throttle, ThrottleOptions, ThrottleState,
    DEFAULT_DELAY, DEFAULT_WAIT,
};
