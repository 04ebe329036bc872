/// Which side of the simulation an entity's stream lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Realm {
    /// Fully simulated; may become authoritative.
    Primary,
    /// Remote visual proxy only; never authoritative.
    Ghost,
    Both,
}

impl Realm {
    /// Whether captures may ever originate from this realm
    pub fn can_originate(self) -> bool {
        match self {
            Realm::Primary | Realm::Both => true,
            Realm::Ghost => false,
        }
    }

    pub fn is_ghost(self) -> bool {
        self == Realm::Ghost
    }

    pub fn name(self) -> &'static str {
        match self {
            Realm::Primary => "Primary",
            Realm::Ghost => "Ghost",
            Realm::Both => "Both",
        }
    }
}
