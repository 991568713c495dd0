use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    config::{is_allowed_step, MIN_COUNT},
    utils::time::is_date_key,
};

use super::record::CounterRecord;

/// Turns whatever was found in storage into a valid [CounterRecord]. Every field is validated on
/// its own and replaced by its default when it doesn't make sense, so a corrupted or partially
/// upgraded document never reaches the actions.
pub fn normalize_record(value: &Value, today: &str) -> CounterRecord {
    let defaults = CounterRecord::with_defaults(today);
    let Some(object) = value.as_object() else {
        debug!("Stored value is not an object, using defaults");
        return defaults;
    };

    let step = number_field(object, "step")
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && is_allowed_step(*v as u64))
        .map(|v| v as u64)
        .unwrap_or(defaults.step);

    let current_count = count_field(object, "currentCount").unwrap_or(defaults.current_count);
    let lifetime_total = count_field(object, "lifetimeTotal").unwrap_or(defaults.lifetime_total);

    let mut daily_history = object
        .get("dailyHistory")
        .and_then(Value::as_object)
        .map(normalize_history)
        .unwrap_or_default();
    if daily_history.is_empty() {
        daily_history = defaults.daily_history;
    }

    let last_active_date = object
        .get("lastActiveDate")
        .and_then(Value::as_str)
        .filter(|v| is_date_key(v))
        .map(str::to_owned)
        .unwrap_or(defaults.last_active_date);

    CounterRecord {
        current_count,
        step,
        sound_enabled: flag_field(object, "soundEnabled").unwrap_or(defaults.sound_enabled),
        vibration_enabled: flag_field(object, "vibrationEnabled")
            .unwrap_or(defaults.vibration_enabled),
        daily_history,
        lifetime_total,
        last_active_date,
    }
}

fn normalize_history(history: &Map<String, Value>) -> BTreeMap<String, u64> {
    history
        .iter()
        .filter(|(date, _)| is_date_key(date))
        .filter_map(|(date, count)| Some((date.clone(), to_count(coerce_number(count)?)?)))
        .collect()
}

fn number_field(object: &Map<String, Value>, name: &str) -> Option<f64> {
    object.get(name).and_then(coerce_number)
}

fn count_field(object: &Map<String, Value>, name: &str) -> Option<u64> {
    number_field(object, name).and_then(to_count)
}

/// Loose numeric conversion of a stored value. `None` stands for "not a number".
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(v) => v.as_f64(),
        Value::String(v) if v.trim().is_empty() => Some(0.),
        Value::String(v) => parse_loose_number(v.trim()),
        Value::Bool(v) => Some(if *v { 1. } else { 0. }),
        Value::Null => Some(0.),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Decimal and exponent notation, plus unsigned `0x`, `0o` and `0b` integer literals.
fn parse_loose_number(text: &str) -> Option<f64> {
    let radix = match text.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return text.parse::<f64>().ok(),
    };
    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    // Literals wider than u128 are far past any count anyway.
    Some(u128::from_str_radix(digits, radix).map_or(f64::INFINITY, |v| v as f64))
}

/// Finite values become counts: floored and clamped to `MIN_COUNT..=u64::MAX`.
fn to_count(value: f64) -> Option<u64> {
    value
        .is_finite()
        .then(|| value.floor().max(MIN_COUNT as f64) as u64)
}

/// Absent and `null` mean "use the default". Anything else is judged by truthiness, so an
/// explicit `false` survives.
fn flag_field(object: &Map<String, Value>, name: &str) -> Option<bool> {
    match object.get(name)? {
        Value::Null => None,
        Value::Bool(v) => Some(*v),
        Value::Number(v) => Some(v.as_f64().is_some_and(|v| v != 0. && !v.is_nan())),
        Value::String(v) => Some(!v.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }
}
