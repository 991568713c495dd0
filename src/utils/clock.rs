use chrono::{DateTime, Utc};

use super::time::day_key;

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    /// Date-key of the current day.
    fn today(&self) -> String {
        day_key(self.time())
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a moment that tests move forward by hand.
#[cfg(test)]
#[derive(Clone)]
pub struct TestClock {
    now: std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>,
}

#[cfg(test)]
impl TestClock {
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        use chrono::TimeZone;

        Self {
            now: std::sync::Arc::new(std::sync::Mutex::new(
                Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
            )),
        }
    }

    pub fn advance(&self, duration: chrono::Duration) {
        *self.now.lock().unwrap() += duration;
    }
}

#[cfg(test)]
impl Clock for TestClock {
    fn time(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
