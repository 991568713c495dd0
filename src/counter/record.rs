use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_STEP, MIN_COUNT};

/// The struct persisted under [STORAGE_KEY](crate::config::STORAGE_KEY). Field names follow the
/// stored JSON document, which is shared with older versions of the app.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CounterRecord {
    pub current_count: u64,
    pub step: u64,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    /// Count per date-key. Keyed by `YYYY-MM-DD`, so ordering is only cosmetic.
    pub daily_history: BTreeMap<String, u64>,
    pub lifetime_total: u64,
    pub last_active_date: String,
}

impl CounterRecord {
    /// Record for a first launch on `today`.
    pub fn with_defaults(today: &str) -> Self {
        Self {
            current_count: MIN_COUNT,
            step: DEFAULT_STEP,
            sound_enabled: true,
            vibration_enabled: true,
            daily_history: BTreeMap::from([(today.to_owned(), MIN_COUNT)]),
            lifetime_total: MIN_COUNT,
            last_active_date: today.to_owned(),
        }
    }

    pub fn history_for(&self, date_key: &str) -> u64 {
        self.daily_history.get(date_key).copied().unwrap_or(MIN_COUNT)
    }

    /// Inserts an empty entry for `today` if there is none yet.
    pub(crate) fn ensure_day(&mut self, today: &str) -> &mut u64 {
        self.daily_history
            .entry(today.to_owned())
            .or_insert(MIN_COUNT)
    }
}

/// Applies a signed delta and keeps the result inside `MIN_COUNT..=u64::MAX`.
pub(crate) fn shift(value: u64, delta: i128) -> u64 {
    (value as i128 + delta).clamp(MIN_COUNT as i128, u64::MAX as i128) as u64
}
