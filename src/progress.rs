//! Single-line spinner feedback for CLI steps.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner style used while a remote step is in flight.
/// - Yellow spinner with braille-style frames.
/// - Shows the current message (`{wide_msg}`) and dimmed elapsed time.
fn running_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg} \x1b[2m{elapsed}\x1b[0m")
        .unwrap()
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// Style used when a step finishes successfully.
/// - Green check mark followed by the final message.
fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}").unwrap()
}

/// Style used when a step fails.
/// - Red cross followed by the error message.
fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}").unwrap()
}

/// One remote step shown as a spinner until it settles as ✔ or ✘.
pub struct Step {
    pb: ProgressBar,
}

impl Step {
    pub fn start(msg: String) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(running_style());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb.set_message(msg);
        Step { pb }
    }

    /// Print a finished sub-step above the spinner line.
    pub fn done_line(&self, msg: &str) {
        self.pb.println(format!("\x1b[32m✔\x1b[0m {}", msg));
    }

    pub fn ok(self, msg: String) {
        self.pb.set_style(ok_style());
        self.pb.finish_with_message(msg);
    }

    pub fn fail(self, msg: String) {
        self.pb.set_style(err_style());
        self.pb.finish_with_message(msg);
    }
}
