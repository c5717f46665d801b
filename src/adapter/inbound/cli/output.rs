//! Terminal output for the CLI.
//!
//! Every helper honours the global `--json` and `--quiet` flags. In JSON mode
//! each line becomes one object `{"type": .., "payload": ..}` on stdout, so a
//! workflow run can be followed by another program.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Output flags shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    /// Human-readable lines are dropped in quiet mode; JSON always flows.
    const fn prints_human(self) -> bool {
        !self.json && !self.quiet
    }
}

static CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn current() -> OutputConfig {
    let cell = CONFIG.get_or_init(RwLock::default);
    match cell.read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply the global flags. Call once, before any output.
pub fn configure(config: OutputConfig) {
    let cell = CONFIG.get_or_init(RwLock::default);
    match cell.write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

/// Outcome mark printed in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Failure,
}

impl Status {
    const fn kind(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Failure => "error",
        }
    }

    fn mark(self) -> String {
        match self {
            Self::Success => "✓".green().to_string(),
            Self::Warning => "⚠".yellow().to_string(),
            Self::Failure => "×".red().to_string(),
        }
    }
}

fn emit(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

fn status(status: Status, message: &str) {
    let config = current();
    if config.json {
        emit(status.kind(), json!({ "message": message }));
    } else if config.prints_human() || status == Status::Warning {
        println!("  {} {message}", status.mark());
    }
}

/// Print a labelled value, e.g. an account or a transaction hash.
pub fn field(label: &str, value: impl Display) {
    let config = current();
    let value = value.to_string();
    if config.json {
        emit("field", json!({ "label": label, "value": value }));
    } else if config.prints_human() {
        println!("  {:<12} {value}", label.dimmed());
    }
}

pub fn success(message: &str) {
    status(Status::Success, message);
}

/// Printed even in quiet mode.
pub fn warning(message: &str) {
    status(Status::Warning, message);
}

/// Print a failure to stderr, whatever the flags.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", Status::Failure.mark());
    }
}

/// Start a new block of output under `title`.
pub fn section(title: &str) {
    let config = current();
    if config.json {
        emit("section", json!({ "title": title }));
    } else if config.prints_human() {
        println!();
        println!("{}", title.bold());
    }
}

/// Secondary guidance, e.g. how to retry.
pub fn hint(message: &str) {
    let config = current();
    if config.json {
        emit("hint", json!({ "message": message }));
    } else if config.prints_human() {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    }
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner shown while waiting on the network. Hidden in JSON and quiet mode.
#[must_use]
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if current().prints_human() {
        let style = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = ProgressBar::new_spinner().with_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    } else {
        ProgressBar::hidden()
    };
    pb.set_message(message.to_string());
    pb
}

/// Stop a spinner, leaving a status line in its place.
pub fn finish_spinner(pb: &ProgressBar, outcome: Status, message: &str) {
    let config = current();
    if config.json {
        emit(
            "wait_finished",
            json!({ "status": outcome.kind(), "message": message }),
        );
        pb.finish_and_clear();
    } else if config.quiet && outcome != Status::Failure {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {message}", outcome.mark()));
    }
}

/// Emphasise a value such as an explorer link. Plain in JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}

/// De-emphasise a value. Plain in JSON mode.
pub fn muted(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.dimmed().to_string()
    }
}

/// Print a whole JSON document, for commands with a structured result.
pub fn json_value(value: &Value) {
    println!("{value}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_drops_human_lines_only() {
        assert!(OutputConfig::new(false, false).prints_human());
        assert!(!OutputConfig::new(false, true).prints_human());
        assert!(!OutputConfig::new(true, false).prints_human());
    }

    #[test]
    fn status_kinds_match_json_types() {
        assert_eq!(Status::Success.kind(), "success");
        assert_eq!(Status::Warning.kind(), "warning");
        assert_eq!(Status::Failure.kind(), "error");
    }
}
