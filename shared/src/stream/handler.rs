use bitflags::bitflags;

use crate::{value::SyncValue, FrameId, Realm};

bitflags! {
    /// The set of callbacks a stream handler opts into. The core only invokes a
    /// callback when the matching capability is present.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const CAPTURE = 1 << 0;
        const QUANTIZE = 1 << 1;
        const SNAPSHOT = 1 << 2;
        const INTERPOLATE = 1 << 3;
        const AUTHORITY = 1 << 4;
    }
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities::empty();
    pub const ALL: Capabilities = Capabilities::all();
}

/// Implemented by whatever owns a stream's live value. All callbacks default
/// to doing nothing.
pub trait StreamHandler {
    fn capabilities(&self) -> Capabilities;

    /// Samples the live value at capture time. `None` skips this tick.
    fn on_capture_current_values(
        &mut self,
        _frame_id: FrameId,
        _am_acting_authority: bool,
        _realm: Realm,
    ) -> Option<SyncValue> {
        None
    }

    /// Called right before an out-of-band encode of the latest record
    fn on_quantize(&mut self, _frame_id: FrameId, _realm: Realm) {}

    /// A new record was applied. `initialize` is only set for the first record
    /// the stream ever receives.
    fn on_snapshot(
        &mut self,
        _frame_id: FrameId,
        _is_acting_authority: bool,
        _initialize: bool,
        _value: &SyncValue,
    ) {
    }

    fn on_interpolate(&mut self, _t: f32, _value: &SyncValue) {}

    fn on_change_authority(&mut self, _is_mine: bool) {}
}
