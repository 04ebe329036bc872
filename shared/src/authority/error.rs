use thiserror::Error;

use crate::{EntityId, FrameId, ParticipantId};

/// Errors that can occur during authority operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    /// Entity is already registered and cannot be registered again
    #[error("{entity} is already registered with the authority manager")]
    EntityAlreadyRegistered { entity: EntityId },

    /// Entity is not registered when required
    #[error("{entity} is not registered - operation '{operation}' requires registration")]
    EntityNotRegistered {
        entity: EntityId,
        operation: &'static str,
    },

    /// Initial ownership was already assigned; use a transfer instead
    #[error("{entity} already has an owner ({owner})")]
    AlreadyAssigned { entity: EntityId, owner: ParticipantId },

    /// Entity has no owner yet
    #[error("{entity} has no owner - operation '{operation}' requires one")]
    NotAssigned {
        entity: EntityId,
        operation: &'static str,
    },

    /// MasterSend entities are always written by the designated master
    #[error("{entity} is master-controlled and its authority cannot be handed off")]
    MasterControlled { entity: EntityId },

    /// Another hand-off for this entity has not completed yet. Retryable.
    #[error("a transfer of {entity} to {pending_to} is already in flight")]
    TransferInFlight {
        entity: EntityId,
        pending_to: ParticipantId,
    },

    /// The transfer point would rewrite frames the current writer already owns
    #[error("transfer point {at_frame} for {entity} is before the earliest allowed frame {earliest}")]
    InvalidTransferPoint {
        entity: EntityId,
        at_frame: FrameId,
        earliest: FrameId,
    },

    #[error("{entity} is already written by {participant}")]
    TransferToSelf {
        entity: EntityId,
        participant: ParticipantId,
    },

    /// The ticket does not match the entity's in-flight transfer
    #[error("no matching transfer in flight for {entity}")]
    NoSuchTransfer { entity: EntityId },
}

impl AuthorityError {
    /// Conflicts clear once the in-flight transfer commits or aborts
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthorityError::TransferInFlight { .. })
    }
}
