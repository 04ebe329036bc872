use std::collections::{HashMap, VecDeque};

use log::info;

use crate::{
    authority::{AuthorityError, AuthorityState, ReplicationMode},
    EntityId, FrameId, ParticipantId,
};

// How many past writers are remembered for validating late frames
const WRITER_HISTORY: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WriterEpoch {
    writer: ParticipantId,
    since: FrameId,
}

/// Handle for the single in-flight hand-off of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferTicket {
    entity: EntityId,
    from: ParticipantId,
    to: ParticipantId,
    at_frame: FrameId,
    sequence: u64,
}

impl TransferTicket {
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn from(&self) -> ParticipantId {
        self.from
    }

    pub fn to(&self) -> ParticipantId {
        self.to
    }

    /// First frame written under the new authority
    pub fn at_frame(&self) -> FrameId {
        self.at_frame
    }
}

/// Emitted whenever an entity's authority state transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorityChange {
    pub entity: EntityId,
    pub state: AuthorityState,
    pub is_mine: bool,
}

struct AuthorityRecord {
    mode: ReplicationMode,
    owner: Option<ParticipantId>,
    // oldest first, the back is the current writer
    epochs: VecDeque<WriterEpoch>,
    pending: Option<TransferTicket>,
}

impl AuthorityRecord {
    fn new(mode: ReplicationMode) -> Self {
        Self {
            mode,
            owner: None,
            epochs: VecDeque::with_capacity(WRITER_HISTORY),
            pending: None,
        }
    }

    fn current(&self) -> Option<&WriterEpoch> {
        self.epochs.back()
    }

    fn writer_at(&self, frame_id: FrameId) -> Option<ParticipantId> {
        self.epochs
            .iter()
            .rev()
            .find(|epoch| epoch.since <= frame_id)
            .map(|epoch| epoch.writer)
    }

    fn push_epoch(&mut self, epoch: WriterEpoch) {
        if self.epochs.len() == WRITER_HISTORY {
            self.epochs.pop_front();
        }
        self.epochs.push_back(epoch);
    }

    fn state(&self, local: ParticipantId) -> AuthorityState {
        match self.current() {
            None => AuthorityState::Unowned,
            Some(epoch) if epoch.writer == local => AuthorityState::OwnedLocal,
            Some(_) => AuthorityState::OwnedRemote,
        }
    }
}

/// Decides, per entity, which participant may produce authoritative captures.
///
/// Exactly one writer is current at a time. A hand-off is two-phase: the
/// request freezes capture on the old writer and partitions frame ids at the
/// transfer point, the commit installs the new writer. Frames below the
/// transfer point remain attributed to the old writer, so late packets from
/// either side can be validated without ever accepting two writers for the
/// same frame.
pub struct AuthorityManager {
    local: ParticipantId,
    master: ParticipantId,
    records: HashMap<EntityId, AuthorityRecord>,
    next_sequence: u64,
}

impl AuthorityManager {
    pub fn new(local: ParticipantId, master: ParticipantId) -> Self {
        Self {
            local,
            master,
            records: HashMap::new(),
            next_sequence: 0,
        }
    }

    pub fn local(&self) -> ParticipantId {
        self.local
    }

    pub fn master(&self) -> ParticipantId {
        self.master
    }

    /// Registers an entity. MasterSend entities are immediately written by the master.
    pub fn register_entity(
        &mut self,
        entity: EntityId,
        mode: ReplicationMode,
    ) -> Result<Option<AuthorityChange>, AuthorityError> {
        if self.records.contains_key(&entity) {
            return Err(AuthorityError::EntityAlreadyRegistered { entity });
        }

        let mut record = AuthorityRecord::new(mode);
        if mode == ReplicationMode::MasterSend {
            record.push_epoch(WriterEpoch {
                writer: self.master,
                since: 0,
            });
        }
        let change = match record.state(self.local) {
            AuthorityState::Unowned => None,
            state => Some(AuthorityChange {
                entity,
                state,
                is_mine: state.is_mine(),
            }),
        };
        self.records.insert(entity, record);

        Ok(change)
    }

    /// Discards the entity's authority record. An in-flight transfer is dropped
    /// without notification.
    pub fn deregister_entity(&mut self, entity: &EntityId) -> bool {
        self.records.remove(entity).is_some()
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        self.records.contains_key(entity)
    }

    pub fn mode(&self, entity: &EntityId) -> Option<ReplicationMode> {
        self.records.get(entity).map(|record| record.mode)
    }

    pub fn state(&self, entity: &EntityId) -> Option<AuthorityState> {
        self.records
            .get(entity)
            .map(|record| record.state(self.local))
    }

    pub fn is_mine(&self, entity: &EntityId) -> bool {
        self.state(entity) == Some(AuthorityState::OwnedLocal)
    }

    pub fn owner(&self, entity: &EntityId) -> Option<ParticipantId> {
        self.records.get(entity).and_then(|record| record.owner)
    }

    pub fn writer(&self, entity: &EntityId) -> Option<ParticipantId> {
        self.records
            .get(entity)
            .and_then(|record| record.current().map(|epoch| epoch.writer))
    }

    pub fn pending_transfer(&self, entity: &EntityId) -> Option<TransferTicket> {
        self.records.get(entity).and_then(|record| record.pending)
    }

    /// Whether the local participant may capture `frame_id` of this entity.
    /// Capture freezes as soon as a transfer is requested, and a new writer
    /// starts at its transfer point.
    pub fn may_capture(&self, entity: &EntityId, frame_id: FrameId) -> bool {
        let Some(record) = self.records.get(entity) else {
            return false;
        };
        if record.pending.is_some() {
            return false;
        }
        record
            .current()
            .is_some_and(|epoch| epoch.writer == self.local && frame_id >= epoch.since)
    }

    /// Initial ownership assignment, `Unowned -> OwnedLocal | OwnedRemote`.
    /// For MasterSend entities this only records the owner.
    pub fn assign_owner(
        &mut self,
        entity: EntityId,
        owner: ParticipantId,
    ) -> Result<Option<AuthorityChange>, AuthorityError> {
        let local = self.local;
        let record = self
            .records
            .get_mut(&entity)
            .ok_or(AuthorityError::EntityNotRegistered {
                entity,
                operation: "assign_owner",
            })?;

        if let Some(existing) = record.owner {
            return Err(AuthorityError::AlreadyAssigned {
                entity,
                owner: existing,
            });
        }
        record.owner = Some(owner);

        if record.mode == ReplicationMode::MasterSend {
            return Ok(None);
        }

        record.push_epoch(WriterEpoch {
            writer: owner,
            since: 0,
        });
        let state = record.state(local);
        info!("{} assigned to {} ({})", entity, owner, state.name());

        Ok(Some(AuthorityChange {
            entity,
            state,
            is_mine: state.is_mine(),
        }))
    }

    /// Starts a hand-off to `to`, effective from `at_frame`. Rejected with
    /// [`AuthorityError::TransferInFlight`] while another hand-off is pending.
    pub fn request_transfer(
        &mut self,
        entity: EntityId,
        to: ParticipantId,
        at_frame: FrameId,
    ) -> Result<TransferTicket, AuthorityError> {
        let record = self
            .records
            .get_mut(&entity)
            .ok_or(AuthorityError::EntityNotRegistered {
                entity,
                operation: "request_transfer",
            })?;

        if record.mode == ReplicationMode::MasterSend {
            return Err(AuthorityError::MasterControlled { entity });
        }
        if let Some(pending) = record.pending {
            return Err(AuthorityError::TransferInFlight {
                entity,
                pending_to: pending.to,
            });
        }
        let Some(current) = record.current().copied() else {
            return Err(AuthorityError::NotAssigned {
                entity,
                operation: "request_transfer",
            });
        };
        if current.writer == to {
            return Err(AuthorityError::TransferToSelf {
                entity,
                participant: to,
            });
        }
        if at_frame < current.since {
            return Err(AuthorityError::InvalidTransferPoint {
                entity,
                at_frame,
                earliest: current.since,
            });
        }

        let ticket = TransferTicket {
            entity,
            from: current.writer,
            to,
            at_frame,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        record.pending = Some(ticket);

        info!(
            "transfer of {} requested: {} -> {} at frame {}",
            entity, current.writer, to, at_frame
        );

        Ok(ticket)
    }

    /// Installs the new writer agreed in `ticket`. Returns the state change if
    /// the local participant gained or lost authority.
    pub fn commit_transfer(
        &mut self,
        ticket: &TransferTicket,
    ) -> Result<Option<AuthorityChange>, AuthorityError> {
        let local = self.local;
        let entity = ticket.entity;
        let record = self
            .records
            .get_mut(&entity)
            .ok_or(AuthorityError::EntityNotRegistered {
                entity,
                operation: "commit_transfer",
            })?;

        if record.pending != Some(*ticket) {
            return Err(AuthorityError::NoSuchTransfer { entity });
        }

        let before = record.state(local);
        record.pending = None;
        record.owner = Some(ticket.to);
        record.push_epoch(WriterEpoch {
            writer: ticket.to,
            since: ticket.at_frame,
        });
        let after = record.state(local);

        info!(
            "transfer of {} committed: {} -> {} at frame {}",
            entity, ticket.from, ticket.to, ticket.at_frame
        );

        if before == after {
            return Ok(None);
        }
        Ok(Some(AuthorityChange {
            entity,
            state: after,
            is_mine: after.is_mine(),
        }))
    }

    /// Cancels the in-flight transfer; the old writer resumes capturing.
    pub fn abort_transfer(&mut self, entity: EntityId) -> Result<TransferTicket, AuthorityError> {
        let record = self
            .records
            .get_mut(&entity)
            .ok_or(AuthorityError::EntityNotRegistered {
                entity,
                operation: "abort_transfer",
            })?;

        let ticket = record
            .pending
            .take()
            .ok_or(AuthorityError::NoSuchTransfer { entity })?;

        info!("transfer of {} to {} aborted", entity, ticket.to);

        Ok(ticket)
    }

    /// Whether a record from `sender` for `frame_id` may be applied.
    ///
    /// While a transfer is in flight, frames at or past the transfer point are
    /// only accepted from the incoming writer, and only when it claims authority.
    pub fn accepts(
        &self,
        entity: &EntityId,
        sender: ParticipantId,
        frame_id: FrameId,
        claims_authority: bool,
    ) -> bool {
        let Some(record) = self.records.get(entity) else {
            return false;
        };

        if let Some(pending) = record.pending {
            if frame_id >= pending.at_frame {
                return claims_authority && sender == pending.to;
            }
        }

        record.writer_at(frame_id) == Some(sender)
    }
}
