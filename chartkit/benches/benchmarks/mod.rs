pub mod histogram;
pub mod interpolate;
pub mod rate_limit;
