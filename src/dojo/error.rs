//! Engine error taxonomy

use thiserror::Error;

use super::person::Role;
use super::room::RoomKind;

/// Errors raised by mutating engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DojoError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Room is full: {0}")]
    RoomFull(String),

    #[error("Person not found: {0}")]
    PersonNotFound(u32),

    #[error("A {role} cannot be allocated a {kind}")]
    InvalidRoomKind { role: Role, kind: RoomKind },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
