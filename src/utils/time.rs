use chrono::{DateTime, NaiveDate, Utc};

/// This is the standard way of converting a date to a history key in tasbih.
pub fn date_to_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Key of the UTC calendar day containing `moment`.
pub fn day_key(moment: DateTime<Utc>) -> String {
    date_to_key(moment.date_naive())
}

/// Checks the shape `DDDD-DD-DD` only. Values such as `2024-99-99` pass, the same way they
/// would pass a `^\d{4}-\d{2}-\d{2}$` pattern.
pub fn is_date_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}
