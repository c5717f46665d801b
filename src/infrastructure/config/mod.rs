//! Infrastructure configuration modules.

pub mod chain;
pub mod contracts;
pub mod logging;
pub mod settings;
pub mod wallet;
pub mod workflow;

pub use settings::Config;
