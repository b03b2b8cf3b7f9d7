#![forbid(unsafe_code)]

pub mod model;
pub mod play;
pub mod time;

pub use time::Clock;
