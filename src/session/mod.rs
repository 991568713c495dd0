//! [Session] owns the counter record and drives every user event through the same chain:
//! reload, rollover check, action, save, feedback.
//!
//! Reloading picks up what another process saved since the last action. Two processes acting at
//! the very same moment can still overwrite each other, the last save wins.

pub mod feedback;

use feedback::Feedback;
use tracing::{debug, info};

use crate::{
    counter::{
        actions::{rollover_if_needed, Actions, CountChange},
        record::CounterRecord,
    },
    storage::{
        key_value::KeyValueStore,
        state::{load_state, persist_state, read_state},
    },
    utils::clock::Clock,
};

pub struct Session<S: KeyValueStore> {
    record: CounterRecord,
    store: S,
    clock: Box<dyn Clock>,
    feedback: Box<dyn Feedback>,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads the stored record and brings it to the current day.
    pub async fn open(store: S, clock: Box<dyn Clock>, feedback: Box<dyn Feedback>) -> Self {
        let record = load_state(&store, &clock.today()).await;
        let mut session = Self {
            record,
            store,
            clock,
            feedback,
        };
        session.roll_over().await;
        session
    }

    pub fn record(&self) -> &CounterRecord {
        &self.record
    }

    pub fn today(&self) -> String {
        self.clock.today()
    }

    /// Safe to call at any moment. Saves only when the day actually changed.
    pub async fn apply_day_rollover(&mut self) -> bool {
        self.reload().await;
        self.roll_over().await
    }

    /// Replaces the in-memory record with the stored one. When the store has nothing usable the
    /// in-memory record is kept.
    async fn reload(&mut self) {
        if let Some(record) = read_state(&self.store, &self.clock.today()).await {
            self.record = record;
        }
    }

    async fn roll_over(&mut self) -> bool {
        let rolled = rollover_if_needed(&mut self.record, &self.clock.today());
        if rolled {
            info!("New day {}, count reset", self.record.last_active_date);
            self.save().await;
        }
        rolled
    }

    pub async fn increment(&mut self) -> CountChange {
        self.apply_day_rollover().await;
        let today = self.clock.today();
        let change = Actions::new(&mut self.record, &today).increment();

        if self.record.sound_enabled {
            self.feedback.sound();
        }
        if self.record.vibration_enabled {
            self.feedback.vibrate();
        }

        self.save().await;
        change
    }

    /// Nothing is saved when the count is already zero.
    pub async fn decrement(&mut self) -> CountChange {
        self.apply_day_rollover().await;
        let today = self.clock.today();
        let change = Actions::new(&mut self.record, &today).decrement();
        if change.is_changed() {
            self.save().await;
        } else {
            debug!("Decrement at zero skipped");
        }
        change
    }

    pub async fn set_step(&mut self, step: u64) -> u64 {
        self.reload().await;
        let today = self.clock.today();
        Actions::new(&mut self.record, &today).set_step(step);
        self.save().await;
        self.record.step
    }

    pub async fn toggle_sound(&mut self) -> bool {
        self.reload().await;
        let today = self.clock.today();
        let enabled = Actions::new(&mut self.record, &today).toggle_sound();
        self.save().await;
        enabled
    }

    pub async fn toggle_vibration(&mut self) -> bool {
        self.reload().await;
        let today = self.clock.today();
        let enabled = Actions::new(&mut self.record, &today).toggle_vibration();
        self.save().await;
        enabled
    }

    pub async fn reset_today(&mut self) -> CountChange {
        self.apply_day_rollover().await;
        let today = self.clock.today();
        let change = Actions::new(&mut self.record, &today).reset_today();
        self.save().await;
        change
    }

    pub async fn set_current_count(&mut self, value: f64) -> CountChange {
        self.apply_day_rollover().await;
        let today = self.clock.today();
        let change = Actions::new(&mut self.record, &today).set_current_count(value);
        if change.is_changed() {
            self.save().await;
        }
        change
    }

    async fn save(&self) {
        persist_state(&self.store, &self.record).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};

    use crate::{
        config::STORAGE_KEY,
        counter::actions::CountChange,
        session::feedback::{MockFeedback, SilentFeedback},
        storage::key_value::{KeyValueStore, MemoryStore, MockKeyValueStore},
        utils::{clock::TestClock, logging::TEST_LOGGING},
    };

    use super::Session;

    async fn stored_json(store: &MemoryStore) -> Result<serde_json::Value> {
        let raw = store
            .get(STORAGE_KEY)
            .await?
            .ok_or_else(|| anyhow!("nothing stored"))?;
        Ok(serde_json::from_str(&raw)?)
    }

    #[tokio::test]
    async fn actions_are_persisted() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let clock = TestClock::at(2024, 4, 1);
        let mut session =
            Session::open(store.clone(), Box::new(clock), Box::new(SilentFeedback)).await;

        session.set_step(10).await;
        session.increment().await;
        session.increment().await;
        session.decrement().await;

        let stored = stored_json(&store).await?;
        assert_eq!(stored["currentCount"], 10);
        assert_eq!(stored["step"], 10);
        assert_eq!(stored["dailyHistory"]["2024-04-01"], 10);
        assert_eq!(stored["lifetimeTotal"], 10);
        Ok(())
    }

    #[tokio::test]
    async fn reopening_restores_state() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let clock = TestClock::at(2024, 4, 1);
        let mut session =
            Session::open(store.clone(), Box::new(clock.clone()), Box::new(SilentFeedback)).await;
        session.set_current_count(41.0).await;
        session.toggle_sound().await;
        let before = session.record().clone();
        drop(session);

        let session = Session::open(store, Box::new(clock), Box::new(SilentFeedback)).await;
        assert_eq!(session.record(), &before);
        Ok(())
    }

    #[tokio::test]
    async fn day_change_resets_count_before_action() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let clock = TestClock::at(2024, 4, 1);
        let mut session =
            Session::open(store.clone(), Box::new(clock.clone()), Box::new(SilentFeedback)).await;
        session.set_current_count(7.0).await;

        clock.advance(chrono::Duration::days(1));
        let change = session.increment().await;

        assert_eq!(change, CountChange::Changed { previous: 0, current: 1 });
        let record = session.record();
        assert_eq!(record.last_active_date, "2024-04-02");
        assert_eq!(record.history_for("2024-04-01"), 7);
        assert_eq!(record.history_for("2024-04-02"), 1);
        assert_eq!(record.lifetime_total, 8);
        Ok(())
    }

    #[tokio::test]
    async fn rollover_is_saved_once() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let clock = TestClock::at(2024, 4, 1);
        let mut session =
            Session::open(store.clone(), Box::new(clock.clone()), Box::new(SilentFeedback)).await;
        session.increment().await;

        clock.advance(chrono::Duration::days(1));
        assert!(session.apply_day_rollover().await);
        assert!(!session.apply_day_rollover().await);

        let stored = stored_json(&store).await?;
        assert_eq!(stored["currentCount"], 0);
        assert_eq!(stored["lastActiveDate"], "2024-04-02");
        Ok(())
    }

    #[tokio::test]
    async fn decrement_at_zero_does_not_write() {
        *TEST_LOGGING;
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_set().never();

        let mut session = Session::open(
            store,
            Box::new(TestClock::at(2024, 4, 1)),
            Box::new(SilentFeedback),
        )
        .await;

        assert_eq!(session.decrement().await, CountChange::Unchanged);
        assert_eq!(session.record().current_count, 0);
    }

    #[tokio::test]
    async fn failing_store_never_blocks_actions() {
        *TEST_LOGGING;
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(anyhow!("storage disabled")));
        store
            .expect_set()
            .returning(|_, _| Err(anyhow!("storage disabled")));

        let mut session = Session::open(
            store,
            Box::new(TestClock::at(2024, 4, 1)),
            Box::new(SilentFeedback),
        )
        .await;

        session.increment().await;
        session.increment().await;
        session.reset_today().await;
        session.increment().await;

        assert_eq!(session.record().current_count, 1);
        assert_eq!(session.record().lifetime_total, 1);
    }

    #[tokio::test]
    async fn feedback_follows_preferences() {
        *TEST_LOGGING;
        let mut feedback = MockFeedback::new();
        feedback.expect_sound().times(1).return_const(());
        feedback.expect_vibrate().times(2).return_const(());

        let mut session = Session::open(
            MemoryStore::default(),
            Box::new(TestClock::at(2024, 4, 1)),
            Box::new(feedback),
        )
        .await;

        session.increment().await;
        assert!(!session.toggle_sound().await);
        session.increment().await;
        assert!(!session.toggle_vibration().await);
        session.increment().await;
        session.decrement().await;
    }

    #[tokio::test]
    async fn changes_from_another_session_are_kept() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let clock = TestClock::at(2024, 4, 1);
        let mut watching =
            Session::open(store.clone(), Box::new(clock.clone()), Box::new(SilentFeedback)).await;
        let mut one_shot =
            Session::open(store.clone(), Box::new(clock.clone()), Box::new(SilentFeedback)).await;

        watching.increment().await;
        one_shot.increment().await;
        one_shot.toggle_sound().await;
        watching.increment().await;

        assert_eq!(watching.record().current_count, 3);
        assert!(!watching.record().sound_enabled);
        let stored = stored_json(&store).await?;
        assert_eq!(stored["currentCount"], 3);
        assert_eq!(stored["lifetimeTotal"], 3);
        assert_eq!(stored["soundEnabled"], false);
        Ok(())
    }
}
