//! Tally counter for the terminal. Keeps a running count for the current day, a per-day
//! history and a lifetime total, and stores everything in a single JSON document that is
//! validated every time it's loaded.
//!

pub mod cli;
pub mod config;
pub mod counter;
pub mod session;
pub mod storage;
pub mod utils;
pub mod watch;
