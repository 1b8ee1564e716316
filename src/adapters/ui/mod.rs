pub mod banner;
pub mod progress;
pub mod tui;

use std::io::IsTerminal;

/// Prints the welcome banner when attached to a terminal.
/// Call once at startup (e.g. in main after tracing init).
pub fn init_ui() {
    if std::io::stdout().is_terminal() {
        banner::print_welcome();
    }
}
