use crate::{
    frame::FrameBuffer,
    stream::{Capabilities, StreamConfig, StreamHandler},
    value::SyncValue,
    EntityId, Realm, StreamId,
};

/// One synchronized value on one entity, together with its history and the
/// handler that owns the live value.
pub struct SyncStream {
    id: StreamId,
    entity: EntityId,
    config: StreamConfig,
    buffer: FrameBuffer<SyncValue>,
    handler: Box<dyn StreamHandler>,
    initialized: bool,
    idle_ticks: u32,
}

impl SyncStream {
    pub(crate) fn new(
        id: StreamId,
        entity: EntityId,
        config: StreamConfig,
        capacity: usize,
        handler: Box<dyn StreamHandler>,
    ) -> Self {
        Self {
            id,
            entity,
            config,
            buffer: FrameBuffer::new(capacity),
            handler,
            initialized: false,
            idle_ticks: 0,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn realm(&self) -> Realm {
        self.config.realm
    }

    pub fn apply_order(&self) -> i32 {
        self.config.apply_order
    }

    pub fn capabilities(&self) -> Capabilities {
        self.handler.capabilities()
    }

    pub fn buffer(&self) -> &FrameBuffer<SyncValue> {
        &self.buffer
    }

    /// Whether a snapshot has been applied to this stream yet
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut FrameBuffer<SyncValue> {
        &mut self.buffer
    }

    pub(crate) fn handler_mut(&mut self) -> &mut dyn StreamHandler {
        self.handler.as_mut()
    }

    /// Returns true only the first time it is called
    pub(crate) fn mark_initialized(&mut self) -> bool {
        let first = !self.initialized;
        self.initialized = true;
        first
    }

    pub(crate) fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    pub(crate) fn set_idle_ticks(&mut self, idle_ticks: u32) {
        self.idle_ticks = idle_ticks;
    }
}
