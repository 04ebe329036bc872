mod config;
mod error;
mod handler;
mod registry;
mod sync_stream;

pub use config::{InterpolationMode, StreamConfig};
pub use error::StreamError;
pub use handler::{Capabilities, StreamHandler};
pub use registry::SyncRegistry;
pub use sync_stream::SyncStream;
