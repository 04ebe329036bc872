mod authority_manager;
mod error;
mod state;

pub use authority_manager::{AuthorityChange, AuthorityManager, TransferTicket};
pub use error::AuthorityError;
pub use state::{AuthorityState, ReplicationMode};
