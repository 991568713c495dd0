use std::io::Write;

use tracing::trace;

/// Sound and vibration cues. Implementations are best effort: they can't fail and they must
/// never hold up the action that triggered them.
#[cfg_attr(test, mockall::automock)]
pub trait Feedback: Send + Sync {
    fn sound(&mut self);

    fn vibrate(&mut self);
}

/// Rings the terminal bell. Terminals can't vibrate, so that cue is only traced.
pub struct TerminalFeedback;

impl Feedback for TerminalFeedback {
    fn sound(&mut self) {
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            trace!("Bell unavailable {e}");
        }
    }

    fn vibrate(&mut self) {
        trace!("Vibration is not supported in a terminal");
    }
}

pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn sound(&mut self) {}

    fn vibrate(&mut self) {}
}
