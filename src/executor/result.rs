//! Execution result types
//!
//! One [`ExecutionOutcome`] is produced per statement sent to the store.

use std::fmt;

use crate::connection::Reply;

/// Outcome of running a single command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The store answered with a value
    Reply(String),

    /// The store answered with nil
    Nil,

    /// The command could not be run or the store rejected it
    Failed(String),
}

impl ExecutionOutcome {
    /// Check whether execution should continue after this outcome
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Reply(_))
    }
}

impl From<Reply> for ExecutionOutcome {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Nil => ExecutionOutcome::Nil,
            Reply::Value(text) => ExecutionOutcome::Reply(text),
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Reply(text) => f.write_str(text),
            ExecutionOutcome::Nil => f.write_str("redis: nil"),
            ExecutionOutcome::Failed(msg) => f.write_str(msg),
        }
    }
}
