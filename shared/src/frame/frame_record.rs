use crate::FrameId;

/// One captured value of one stream at one simulation tick.
///
/// Once sealed into a [`FrameBuffer`](crate::FrameBuffer) a record is only
/// handed out by shared reference; newer state is appended as a new record.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRecord<T> {
    frame_id: FrameId,
    value: T,
    has_changed: bool,
}

impl<T> FrameRecord<T> {
    pub fn new(frame_id: FrameId, value: T, has_changed: bool) -> Self {
        Self {
            frame_id,
            value,
            has_changed,
        }
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn has_changed(&self) -> bool {
        self.has_changed
    }
}

impl<T: Clone + PartialEq> FrameRecord<T> {
    /// Builds the record that follows `previous`, flagging whether the value moved.
    /// The first record of a stream always counts as changed.
    pub fn seal_after(previous: Option<&FrameRecord<T>>, frame_id: FrameId, value: T) -> Self {
        let has_changed = match previous {
            Some(previous) => previous.value != value,
            None => true,
        };
        Self::new(frame_id, value, has_changed)
    }

    /// Overwrites this record with a copy of `source`. Used to recycle arena slots.
    pub fn copy_from(&mut self, source: &FrameRecord<T>) {
        self.frame_id = source.frame_id;
        self.value.clone_from(&source.value);
        self.has_changed = source.has_changed;
    }

    /// Whether both records carry the same value, regardless of frame
    pub fn compare(&self, other: &FrameRecord<T>) -> bool {
        self.value == other.value
    }
}
