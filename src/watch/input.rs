/// A single line typed while watching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatchCommand {
    Increment,
    Decrement,
    Reset,
    ToggleSound,
    ToggleVibration,
    /// Raw user value. Anything that doesn't parse becomes NaN and is ignored by the action.
    Set(f64),
    Step(u64),
    Help,
    Quit,
}

/// Maps a line onto a command. Returns `None` for input that means nothing.
pub fn parse_command(line: &str) -> Option<WatchCommand> {
    let line = line.trim();
    let lowercase = line.to_lowercase();

    let command = match lowercase.as_str() {
        "" | "+" | "k" | "up" => WatchCommand::Increment,
        "-" | "j" | "down" => WatchCommand::Decrement,
        "reset" => WatchCommand::Reset,
        "s" | "sound" => WatchCommand::ToggleSound,
        "v" | "vibration" => WatchCommand::ToggleVibration,
        "?" | "h" | "help" => WatchCommand::Help,
        "q" | "quit" | "exit" => WatchCommand::Quit,
        other => {
            if let Some(value) = other.strip_prefix('=').or_else(|| other.strip_prefix("set ")) {
                WatchCommand::Set(value.trim().parse().unwrap_or(f64::NAN))
            } else if let Some(step) = other.strip_prefix("step ") {
                WatchCommand::Step(step.trim().trim_start_matches('+').parse().ok()?)
            } else {
                return None;
            }
        }
    };
    Some(command)
}

pub const HELP: &str = "enter/+/k: add  -/j: subtract  =N: set  step N: change step  \
                        s: sound  v: vibration  reset: clear today  q: quit";
