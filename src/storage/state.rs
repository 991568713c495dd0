use tracing::{debug, instrument, warn};

use crate::{
    config::STORAGE_KEY,
    counter::{normalize::normalize_record, record::CounterRecord},
};

use super::key_value::KeyValueStore;

/// Loads the record stored under [STORAGE_KEY]. Missing, unreadable and unparsable values all
/// mean "no prior state" and produce defaults for `today`.
#[instrument(skip(store))]
pub async fn load_state(store: &impl KeyValueStore, today: &str) -> CounterRecord {
    read_state(store, today)
        .await
        .unwrap_or_else(|| CounterRecord::with_defaults(today))
}

/// Like [load_state], but returns `None` instead of defaults when there is nothing usable in
/// the store.
pub async fn read_state(store: &impl KeyValueStore, today: &str) -> Option<CounterRecord> {
    let raw = match store.get(STORAGE_KEY).await {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => {
            debug!("No stored state");
            return None;
        }
        Err(e) => {
            warn!("Failed to read stored state: {e:?}");
            return None;
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => Some(normalize_record(&value, today)),
        Err(e) => {
            // Might happen if a write got cut off.
            warn!("Stored state is not valid json: {e}");
            None
        }
    }
}

/// Saves the record. Failures are logged and otherwise ignored, the in-memory record is still
/// the source of truth. Returns whether the write went through.
#[instrument(skip_all)]
pub async fn persist_state(store: &impl KeyValueStore, record: &CounterRecord) -> bool {
    let serialized = match serde_json::to_string(record) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to serialize state: {e}");
            return false;
        }
    };

    match store.set(STORAGE_KEY, &serialized).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to persist state: {e:?}");
            false
        }
    }
}
