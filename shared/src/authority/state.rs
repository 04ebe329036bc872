#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthorityState {
    Unowned,
    OwnedLocal,
    OwnedRemote,
}

impl AuthorityState {
    pub fn is_mine(self) -> bool {
        self == AuthorityState::OwnedLocal
    }

    pub fn name(self) -> &'static str {
        match self {
            AuthorityState::Unowned => "Unowned",
            AuthorityState::OwnedLocal => "OwnedLocal",
            AuthorityState::OwnedRemote => "OwnedRemote",
        }
    }
}

/// Who is permitted to write an entity's streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplicationMode {
    /// The entity's owner (e.g. its controlling player) writes.
    OwnerSend,
    /// The designated master participant always writes, whoever owns the entity.
    MasterSend,
}
