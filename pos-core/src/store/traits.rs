//! Command and event traits
//!
//! Each business operation is a [`CommandHandler`]: it reads the state
//! through a [`CommandContext`] and returns the [`StoreEvent`]s describing
//! its effect. Each event is then written by an applier
//! (see [`super::appliers`]).

use super::{CheckoutResult, CommandContext, StoreEvent};
use crate::auth::Operator;

/// Who issued a command, when, and under which idempotency key
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator: Operator,
    /// Unix millis
    pub timestamp: i64,
}

impl CommandMetadata {
    /// Fresh command id, current time
    pub fn new(operator: &Operator) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            operator: operator.clone(),
            timestamp: shared::util::now_millis(),
        }
    }

    pub fn with_command_id(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = command_id.into();
        self
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Name written to the `user` field of records
    pub fn operator_name(&self) -> &str {
        &self.operator.display_name
    }
}

pub trait CommandHandler {
    /// Name used in logs
    fn name(&self) -> &'static str;

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>>;
}
