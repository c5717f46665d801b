//! CLI module graph.

pub mod allowance;
pub mod command;
pub mod confirm;
pub mod console;
pub mod modal;
pub mod output;
pub mod run;
