use tracing::{debug, instrument};

use crate::config::{effective_step, MIN_COUNT};

use super::record::{shift, CounterRecord};

/// Moves the record to `today` if the active day changed since the last check. Returns `true`
/// when a rollover happened. Prior days' history is never touched.
#[instrument(skip(record), fields(last_active = %record.last_active_date))]
pub fn rollover_if_needed(record: &mut CounterRecord, today: &str) -> bool {
    if record.last_active_date == today {
        record.ensure_day(today);
        return false;
    }

    debug!("Rolling over to {today}");
    record.last_active_date = today.to_owned();
    record.current_count = MIN_COUNT;
    record.ensure_day(today);
    true
}

/// Result of a count mutation. [CountChange::Unchanged] lets callers skip saving and
/// re-rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChange {
    Unchanged,
    Changed { previous: u64, current: u64 },
}

impl CountChange {
    fn between(previous: u64, current: u64) -> Self {
        if previous == current {
            CountChange::Unchanged
        } else {
            CountChange::Changed { previous, current }
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, CountChange::Changed { .. })
    }
}

/// The only way the record is supposed to be mutated. Every action works on today's entry of
/// the history, so [rollover_if_needed] should be called before creating it.
pub struct Actions<'a> {
    record: &'a mut CounterRecord,
    today: &'a str,
}

impl<'a> Actions<'a> {
    pub fn new(record: &'a mut CounterRecord, today: &'a str) -> Self {
        Self { record, today }
    }

    pub fn increment(&mut self) -> CountChange {
        let step = effective_step(self.record.step);
        let previous = self.record.current_count;

        self.record.current_count = previous.saturating_add(step);
        let day = self.record.ensure_day(self.today);
        *day = shift(*day, step as i128);
        self.record.lifetime_total = shift(self.record.lifetime_total, step as i128);

        CountChange::between(previous, self.record.current_count)
    }

    /// Never goes below zero. At zero the record is left exactly as it was.
    pub fn decrement(&mut self) -> CountChange {
        let step = effective_step(self.record.step);
        let previous = self.record.current_count;
        let delta = step.min(previous);
        if delta == 0 {
            return CountChange::Unchanged;
        }

        self.record.current_count = previous - delta;
        let day = self.record.ensure_day(self.today);
        *day = shift(*day, -(delta as i128));
        self.record.lifetime_total = shift(self.record.lifetime_total, -(delta as i128));

        CountChange::between(previous, self.record.current_count)
    }

    pub fn set_step(&mut self, step: u64) {
        self.record.step = effective_step(step);
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.record.sound_enabled = !self.record.sound_enabled;
        self.record.sound_enabled
    }

    pub fn toggle_vibration(&mut self) -> bool {
        self.record.vibration_enabled = !self.record.vibration_enabled;
        self.record.vibration_enabled
    }

    /// Clears today's count. What was removed is taken out of the lifetime total as well.
    pub fn reset_today(&mut self) -> CountChange {
        let previous = self.record.current_count;

        self.record.current_count = MIN_COUNT;
        *self.record.ensure_day(self.today) = MIN_COUNT;
        self.record.lifetime_total = shift(self.record.lifetime_total, -(previous as i128));

        CountChange::between(previous, MIN_COUNT)
    }

    /// Sets the count to a user supplied value. Fractions are floored, negatives become zero and
    /// non-finite input keeps the current count. The difference is carried into today's history
    /// and the lifetime total.
    pub fn set_current_count(&mut self, value: f64) -> CountChange {
        let previous = self.record.current_count;
        let safe_value = if value.is_finite() {
            // `as` saturates at u64::MAX.
            value.floor().max(MIN_COUNT as f64) as u64
        } else {
            previous
        };
        let delta = safe_value as i128 - previous as i128;

        self.record.current_count = safe_value;
        let day = self.record.ensure_day(self.today);
        *day = shift(*day, delta);
        self.record.lifetime_total = shift(self.record.lifetime_total, delta);

        CountChange::between(previous, safe_value)
    }
}
