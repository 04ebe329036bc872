use crate::{frame::FrameRecord, FrameId};

/// Bounded, strictly ordered history of one stream's frame records.
///
/// Records live in a fixed arena of `capacity` slots that is reused ring-style,
/// so steady-state inserts never allocate. Frame ids strictly increase from the
/// oldest slot to the newest; anything at or below the highest frame id ever
/// inserted is dropped as stale, even after the newer record was evicted.
pub struct FrameBuffer<T> {
    slots: Vec<FrameRecord<T>>,
    head: usize,
    len: usize,
    capacity: usize,
    highest: Option<FrameId>,
    render_cursor: Option<FrameId>,
    interpolation_cursor: Option<FrameId>,
}

/// The records bracketing a playback target.
#[derive(Debug)]
pub enum Surrounding<'a, T> {
    /// Target is outside the buffered range, or on the newest record: hold it.
    Hold(&'a FrameRecord<T>),
    Between {
        previous: Option<&'a FrameRecord<T>>,
        from: &'a FrameRecord<T>,
        to: &'a FrameRecord<T>,
        next: Option<&'a FrameRecord<T>>,
    },
}

impl<'a, T> Surrounding<'a, T> {
    /// Position of `target` between the two brackets, clamped to [0, 1]
    pub fn blend_factor(&self, target: f64) -> f32 {
        match self {
            Surrounding::Hold(_) => 0.0,
            Surrounding::Between { from, to, .. } => {
                let start = from.frame_id() as f64;
                let span = to.frame_id() as f64 - start;
                if span <= 0.0 {
                    return 0.0;
                }
                ((target - start) / span).clamp(0.0, 1.0) as f32
            }
        }
    }

    /// The earliest record this bracket reads
    pub fn earliest(&self) -> &'a FrameRecord<T> {
        match self {
            Surrounding::Hold(record) => record,
            Surrounding::Between { previous, from, .. } => previous.unwrap_or(from),
        }
    }
}

impl<T: Clone + PartialEq> FrameBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            len: 0,
            capacity,
            highest: None,
            render_cursor: None,
            interpolation_cursor: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest frame id ever accepted, including records since evicted
    pub fn highest_frame(&self) -> Option<FrameId> {
        self.highest
    }

    /// Returns whether the record was applied. Stale or duplicate frame ids are
    /// silently refused.
    pub fn insert(&mut self, record: FrameRecord<T>) -> bool {
        if let Some(highest) = self.highest {
            if record.frame_id() <= highest {
                return false;
            }
        }

        if self.len == self.capacity {
            self.pop_oldest();
        }

        let index = (self.head + self.len) % self.capacity;
        if index < self.slots.len() {
            self.slots[index].copy_from(&record);
        } else {
            self.slots.push(record);
        }
        self.len += 1;
        self.highest = Some(self.get(self.len - 1).frame_id());

        true
    }

    /// Seals `value` as the record for `frame_id`, deriving `has_changed` from the latest record
    pub fn push_value(&mut self, frame_id: FrameId, value: T) -> bool {
        let record = FrameRecord::seal_after(self.latest(), frame_id, value);
        self.insert(record)
    }

    pub fn latest(&self) -> Option<&FrameRecord<T>> {
        if self.len == 0 {
            return None;
        }
        Some(self.get(self.len - 1))
    }

    pub fn oldest(&self) -> Option<&FrameRecord<T>> {
        if self.len == 0 {
            return None;
        }
        Some(self.get(0))
    }

    pub fn at(&self, frame_id: FrameId) -> Option<&FrameRecord<T>> {
        let index = self.partition_point(|record| record.frame_id() < frame_id);
        if index < self.len && self.get(index).frame_id() == frame_id {
            return Some(self.get(index));
        }
        None
    }

    /// Finds the last record at or before `target` and the first one after it.
    /// Targets outside the buffered range clamp to the nearest end.
    pub fn surrounding(&self, target: f64) -> Option<Surrounding<'_, T>> {
        if self.len == 0 {
            return None;
        }

        let after = self.partition_point(|record| record.frame_id() as f64 <= target);

        if after == 0 {
            return Some(Surrounding::Hold(self.get(0)));
        }
        if after == self.len {
            return Some(Surrounding::Hold(self.get(self.len - 1)));
        }

        let from_index = after - 1;
        let previous = if from_index > 0 {
            Some(self.get(from_index - 1))
        } else {
            None
        };
        let next = if after + 1 < self.len {
            Some(self.get(after + 1))
        } else {
            None
        };

        Some(Surrounding::Between {
            previous,
            from: self.get(from_index),
            to: self.get(after),
            next,
        })
    }

    /// Iterates records from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &FrameRecord<T>> + '_ {
        (0..self.len).map(move |index| self.get(index))
    }

    pub fn frame_ids(&self) -> Vec<FrameId> {
        self.iter().map(|record| record.frame_id()).collect()
    }

    pub fn advance_render_cursor(&mut self, frame_id: FrameId) {
        self.render_cursor = Some(self.render_cursor.map_or(frame_id, |c| c.max(frame_id)));
        self.release_passed();
    }

    pub fn advance_interpolation_cursor(&mut self, frame_id: FrameId) {
        self.interpolation_cursor =
            Some(self.interpolation_cursor.map_or(frame_id, |c| c.max(frame_id)));
        self.release_passed();
    }

    /// Drops every record. The stale-frame watermark survives, so replays of
    /// old frames are still refused.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
        self.slots.clear();
        self.render_cursor = None;
        self.interpolation_cursor = None;
    }

    // Releases records both cursors have moved past
    fn release_passed(&mut self) {
        let (Some(render), Some(interpolation)) = (self.render_cursor, self.interpolation_cursor)
        else {
            return;
        };
        let passed = render.min(interpolation);

        while self.len > 0 && self.get(0).frame_id() < passed {
            self.pop_oldest();
        }
    }

    fn pop_oldest(&mut self) {
        self.head = (self.head + 1) % self.capacity;
        self.len -= 1;
    }

    fn get(&self, logical_index: usize) -> &FrameRecord<T> {
        &self.slots[(self.head + logical_index) % self.capacity]
    }

    fn partition_point<P: Fn(&FrameRecord<T>) -> bool>(&self, predicate: P) -> usize {
        let mut low = 0;
        let mut high = self.len;
        while low < high {
            let mid = (low + high) / 2;
            if predicate(self.get(mid)) {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }
}
