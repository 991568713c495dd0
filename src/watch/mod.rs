//! Interactive mode. Lines from the input act like key presses, and the day is re-checked on a
//! fixed interval so a counter left open overnight starts the new day at zero.

pub mod input;
pub mod shutdown;

use std::{io::Write, time::Duration};

use anyhow::Result;
use input::{parse_command, WatchCommand, HELP};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    cli::output::{format_change, format_status},
    session::Session,
    storage::key_value::KeyValueStore,
};

/// Executes the watch event loop until the input ends, `q` is typed or `shutdown` is
/// cancelled. Everything runs on the calling task, so user input and rollover checks never
/// overlap. Returns the session for the caller to inspect.
pub async fn run_watch<S: KeyValueStore>(
    mut session: Session<S>,
    input: impl AsyncBufRead + Unpin,
    mut out: impl Write,
    shutdown: CancellationToken,
    check_interval: Duration,
) -> Result<Session<S>> {
    let mut lines = input.lines();
    let mut rollover_check = tokio::time::interval(check_interval);
    rollover_check.set_missed_tick_behavior(MissedTickBehavior::Delay);

    writeln!(out, "{HELP}")?;
    render(&mut out, &session)?;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Watch cancelled");
                break;
            }
            _ = rollover_check.tick() => {
                if session.apply_day_rollover().await {
                    writeln!(out, "New day {}", session.record().last_active_date)?;
                    render(&mut out, &session)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                match parse_command(&line) {
                    Some(WatchCommand::Quit) => break,
                    Some(command) => apply(&mut session, command, &mut out).await?,
                    None => writeln!(out, "Unknown input {line:?}. {HELP}")?,
                }
            }
        }
    }

    Ok(session)
}

async fn apply<S: KeyValueStore>(
    session: &mut Session<S>,
    command: WatchCommand,
    out: &mut impl Write,
) -> Result<()> {
    debug!("Applying {command:?}");
    match command {
        WatchCommand::Increment => {
            let change = session.increment().await;
            writeln!(out, "{}", format_change(change))?;
        }
        WatchCommand::Decrement => {
            let change = session.decrement().await;
            if !change.is_changed() {
                return Ok(());
            }
            writeln!(out, "{}", format_change(change))?;
        }
        WatchCommand::Reset => {
            let change = session.reset_today().await;
            writeln!(out, "{}", format_change(change))?;
        }
        WatchCommand::Set(value) => {
            let change = session.set_current_count(value).await;
            writeln!(out, "{}", format_change(change))?;
        }
        WatchCommand::Step(step) => {
            let step = session.set_step(step).await;
            writeln!(out, "Step is now +{step}")?;
        }
        WatchCommand::ToggleSound => {
            session.toggle_sound().await;
        }
        WatchCommand::ToggleVibration => {
            session.toggle_vibration().await;
        }
        WatchCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(());
        }
        WatchCommand::Quit => return Ok(()),
    }
    render(out, session)
}

fn render<S: KeyValueStore>(out: &mut impl Write, session: &Session<S>) -> Result<()> {
    writeln!(out, "{}", format_status(session.record(), &session.today()))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{io::sink, time::Duration};

    use anyhow::Result;
    use tokio::io::{AsyncWriteExt, BufReader};
    use tokio_util::sync::CancellationToken;

    use crate::{
        session::{feedback::SilentFeedback, Session},
        storage::key_value::MemoryStore,
        utils::{clock::TestClock, logging::TEST_LOGGING},
    };

    use super::run_watch;

    #[tokio::test]
    async fn scripted_input() -> Result<()> {
        *TEST_LOGGING;
        let session = Session::open(
            MemoryStore::default(),
            Box::new(TestClock::at(2024, 8, 1)),
            Box::new(SilentFeedback),
        )
        .await;
        let input = BufReader::new("+\n\nstep 10\nk\n-\nnonsense\n-\n-\n=7\n".as_bytes());

        let session = run_watch(
            session,
            input,
            sink(),
            CancellationToken::new(),
            Duration::from_secs(30),
        )
        .await?;

        let record = session.record();
        assert_eq!(record.current_count, 7);
        assert_eq!(record.step, 10);
        assert_eq!(record.history_for("2024-08-01"), 7);
        assert_eq!(record.lifetime_total, 7);
        Ok(())
    }

    #[tokio::test]
    async fn quit_stops_before_remaining_input() -> Result<()> {
        *TEST_LOGGING;
        let session = Session::open(
            MemoryStore::default(),
            Box::new(TestClock::at(2024, 8, 1)),
            Box::new(SilentFeedback),
        )
        .await;
        let input = BufReader::new("+\ns\nq\n+\n+\n".as_bytes());
        let mut out = Vec::new();

        let session = run_watch(
            session,
            input,
            &mut out,
            CancellationToken::new(),
            Duration::from_secs(30),
        )
        .await?;

        assert_eq!(session.record().current_count, 1);
        assert!(!session.record().sound_enabled);
        assert!(String::from_utf8(out)?.contains("sound off"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_check_rolls_over() -> Result<()> {
        *TEST_LOGGING;
        let clock = TestClock::at(2024, 8, 1);
        let mut session = Session::open(
            MemoryStore::default(),
            Box::new(clock.clone()),
            Box::new(SilentFeedback),
        )
        .await;
        session.set_current_count(12.).await;

        // Input that stays open, like an idle terminal.
        let (reader, mut writer) = tokio::io::duplex(64);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_watch(
            session,
            BufReader::new(reader),
            sink(),
            shutdown.clone(),
            Duration::from_secs(30),
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        clock.advance(chrono::Duration::days(1));
        tokio::time::sleep(Duration::from_secs(31)).await;
        shutdown.cancel();

        let session = handle.await??;
        writer.shutdown().await?;

        let record = session.record();
        assert_eq!(record.current_count, 0);
        assert_eq!(record.last_active_date, "2024-08-02");
        assert_eq!(record.history_for("2024-08-01"), 12);
        Ok(())
    }
}
