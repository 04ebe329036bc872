mod frame_buffer;
mod frame_record;

pub use frame_buffer::{FrameBuffer, Surrounding};
pub use frame_record::FrameRecord;
