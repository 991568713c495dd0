use ansi_term::{Colour, Style};

use crate::counter::{actions::CountChange, record::CounterRecord};

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// One line summary of the record, the terminal counterpart of the main screen.
pub fn format_status(record: &CounterRecord, today: &str) -> String {
    format!(
        "{}\tstep +{}\ttoday {}\tlifetime {}\tsound {}\tvibration {}",
        Style::new().bold().paint(record.current_count.to_string()),
        record.step,
        record.history_for(today),
        record.lifetime_total,
        on_off(record.sound_enabled),
        on_off(record.vibration_enabled),
    )
}

pub fn format_change(change: CountChange) -> String {
    match change {
        CountChange::Unchanged => Colour::Yellow.paint("unchanged").to_string(),
        CountChange::Changed { previous, current } if current >= previous => {
            format!("{previous} {} {current}", Colour::Green.paint("↑"))
        }
        CountChange::Changed { previous, current } => {
            format!("{previous} {} {current}", Colour::Red.paint("↓"))
        }
    }
}

/// Latest `days` entries of the history, newest first. Today is marked with `*`.
pub fn format_history(record: &CounterRecord, days: usize, today: &str) -> Vec<String> {
    record
        .daily_history
        .iter()
        .rev()
        .take(days)
        .map(|(date, count)| {
            let marker = if date == today { "*" } else { " " };
            format!("{marker} {date}\t{count}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::counter::{actions::CountChange, record::CounterRecord};

    use super::{format_change, format_history, format_status};

    const TODAY: &str = "2024-07-03";

    #[test]
    fn status_mentions_everything() {
        let mut record = CounterRecord::with_defaults(TODAY);
        record.current_count = 5;
        record.step = 33;
        record.lifetime_total = 13;
        record.sound_enabled = false;
        record.daily_history.insert(TODAY.into(), 5);

        let status = format_status(&record, TODAY);
        assert!(status.contains('5'));
        assert!(status.contains("step +33"));
        assert!(status.contains("today 5"));
        assert!(status.contains("lifetime 13"));
        assert!(status.contains("sound off"));
        assert!(status.contains("vibration on"));
    }

    #[test]
    fn change_direction() {
        assert!(format_change(CountChange::Unchanged).contains("unchanged"));
        let up = format_change(CountChange::Changed { previous: 1, current: 2 });
        assert!(up.starts_with("1 ") && up.ends_with(" 2") && up.contains('↑'));
        let down = format_change(CountChange::Changed { previous: 9, current: 0 });
        assert!(down.contains('↓'));
    }

    #[test]
    fn history_newest_first() {
        let mut record = CounterRecord::with_defaults(TODAY);
        record.daily_history.insert("2024-07-01".into(), 4);
        record.daily_history.insert("2024-07-02".into(), 8);

        let lines = format_history(&record, 2, TODAY);
        assert_eq!(lines, vec!["* 2024-07-03\t0", "  2024-07-02\t8"]);
    }
}
