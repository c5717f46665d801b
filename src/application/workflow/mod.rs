//! Two-phase transaction workflow: optional approval, then the main action.

mod engine;
mod machine;

pub use engine::{ChainPorts, EngineSettings, WorkflowEngine, DEFAULT_RESET_DELAY};
pub use machine::{
    Command, IgnoreReason, RunOutcome, Signal, SignalOutcome, Workflow, WorkflowSnapshot,
};
