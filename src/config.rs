//! Static configuration shared by the counter, storage and the front ends.

use std::time::Duration;

/// Steps a user can pick from. Anything else falls back to [DEFAULT_STEP].
pub const ALLOWED_STEPS: [u64; 5] = [1, 3, 10, 33, 100];

pub const DEFAULT_STEP: u64 = 1;

/// Lower bound for every count, history entry and the lifetime total.
pub const MIN_COUNT: u64 = 0;

/// Key under which the whole record is stored.
pub const STORAGE_KEY: &str = "tasbih-pro-state";

/// How often long running front ends re-check whether the day changed.
pub const ROLLOVER_CHECK_INTERVAL: Duration = Duration::from_secs(30);

pub fn is_allowed_step(step: u64) -> bool {
    ALLOWED_STEPS.contains(&step)
}

/// Returns `step` if it's allowed, otherwise [DEFAULT_STEP].
pub fn effective_step(step: u64) -> u64 {
    if is_allowed_step(step) {
        step
    } else {
        DEFAULT_STEP
    }
}
