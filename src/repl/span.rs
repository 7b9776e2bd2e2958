use uuid::Uuid;

use super::commands::Command;

/// Identifier attached to the logs of one executed command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandId(pub Uuid);

impl CommandId {
    /// Creates a new random command ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span wrapping everything logged while `command` runs
///
/// Only the command name is recorded; `sign_in` and `sign_up` arguments hold passwords.
pub fn make_span_with_command_id(command: &Command, command_id: &CommandId) -> tracing::Span {
    tracing::info_span!(
        "command",
        name = command.name(),
        command_id = %command_id,
    )
}
