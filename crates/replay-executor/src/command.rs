//! Commands carried from a builder to the executor

use replay_core::{Postback, Value};

/// One unit of executor work
#[derive(Debug)]
pub enum Command {
    /// Push a value onto the executor's value stack
    Push(Value),
    /// Pop the top value and deliver its encoding to the postback
    Post(Postback),
}

impl Command {
    /// Short name for logging
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Push(_) => "push",
            Command::Post(_) => "post",
        }
    }
}
